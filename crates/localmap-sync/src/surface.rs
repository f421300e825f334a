//! Abstraction over the mapping provider.
//!
//! The sync core is written against any provider that can render markers,
//! move the camera, and open a positioned overlay. A real binding adapts a
//! map SDK to this trait; [`InMemorySurface`] is the in-process stand-in
//! used by tests and the demo tooling.

use std::collections::HashMap;

use localmap_core::geo::LatLng;
use localmap_core::store::Store;

use crate::cluster::Cluster;

/// Opaque handle for a rendered marker, assigned by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Standard pin.
    Default,
    /// Larger, alternate-color pin for the selected store.
    Emphasized,
}

/// Capability set the sync core needs from a mapping provider.
pub trait MapSurface {
    fn add_marker(&mut self, key: &str, position: LatLng) -> MarkerHandle;
    fn remove_marker(&mut self, handle: MarkerHandle);
    fn set_marker_style(&mut self, handle: MarkerHandle, style: MarkerStyle);
    /// Replaces the cluster layer wholesale.
    fn set_clusters(&mut self, clusters: &[Cluster]);
    fn pan_to(&mut self, center: LatLng);
    fn set_zoom(&mut self, zoom: u8);
    /// Opens (or re-positions) the detail overlay for `store`.
    fn show_overlay(&mut self, store: &Store, position: LatLng);
    fn hide_overlay(&mut self);
}

/// Recorded state of one marker on the [`InMemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMarker {
    pub key: String,
    pub position: LatLng,
    pub style: MarkerStyle,
}

/// In-memory surface that records every call, for tests and headless runs.
#[derive(Debug, Default)]
pub struct InMemorySurface {
    next_handle: u64,
    pub markers: HashMap<MarkerHandle, SurfaceMarker>,
    pub clusters: Vec<Cluster>,
    pub center: Option<LatLng>,
    pub zoom: Option<u8>,
    pub overlay: Option<Store>,
    pub pan_count: usize,
}

impl InMemorySurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Styles keyed by marker key, for assertions.
    #[must_use]
    pub fn style_of(&self, key: &str) -> Option<MarkerStyle> {
        self.markers
            .values()
            .find(|m| m.key == key)
            .map(|m| m.style)
    }

    #[must_use]
    pub fn marker_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.markers.values().map(|m| m.key.clone()).collect();
        keys.sort();
        keys
    }
}

impl MapSurface for InMemorySurface {
    fn add_marker(&mut self, key: &str, position: LatLng) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.insert(
            handle,
            SurfaceMarker {
                key: key.to_owned(),
                position,
                style: MarkerStyle::Default,
            },
        );
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
    }

    fn set_marker_style(&mut self, handle: MarkerHandle, style: MarkerStyle) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.style = style;
        }
    }

    fn set_clusters(&mut self, clusters: &[Cluster]) {
        self.clusters = clusters.to_vec();
    }

    fn pan_to(&mut self, center: LatLng) {
        self.center = Some(center);
        self.pan_count += 1;
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = Some(zoom);
    }

    fn show_overlay(&mut self, store: &Store, _position: LatLng) {
        self.overlay = Some(store.clone());
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
    }
}
