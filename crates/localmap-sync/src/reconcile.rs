//! Marker reconciliation: add/remove-only diffing of the rendered set.
//!
//! Recreating every marker on each fetch causes visible flicker and tears
//! down in-flight interactions. Instead, a fetch result is diffed against
//! the rendered set by store key: handles for surviving keys are left
//! untouched, only the delta is created and destroyed, and the cluster
//! layer is rebuilt over the result.

use std::collections::{HashMap, HashSet};

use localmap_core::geo::LatLng;
use localmap_core::store::StoreMarker;

use crate::cluster::build_clusters;
use crate::surface::{MapSurface, MarkerHandle, MarkerStyle};
use crate::tuning::SyncTuning;

#[derive(Debug, Clone)]
struct Rendered {
    handle: MarkerHandle,
    position: LatLng,
}

/// Owns the mapping from store key to rendered marker handle.
///
/// Invariant: exactly one rendered marker per key in the active point set;
/// no stale handles survive a reconciliation pass.
#[derive(Debug, Default)]
pub struct MarkerReconciler {
    rendered: HashMap<String, Rendered>,
}

impl MarkerReconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the rendered set against a freshly fetched point set,
    /// restyles for the current selection, and rebuilds the cluster layer.
    ///
    /// The whole pass is synchronous; nothing may observe a torn state
    /// between removal and insertion.
    pub fn reconcile<S: MapSurface>(
        &mut self,
        surface: &mut S,
        fetched: &[StoreMarker],
        selected_key: Option<&str>,
        zoom: u8,
        tuning: &SyncTuning,
    ) {
        let fetched_keys: HashSet<&str> = fetched.iter().map(|m| m.key.as_str()).collect();

        let to_remove: Vec<String> = self
            .rendered
            .keys()
            .filter(|key| !fetched_keys.contains(key.as_str()))
            .cloned()
            .collect();
        for key in &to_remove {
            if let Some(rendered) = self.rendered.remove(key) {
                surface.remove_marker(rendered.handle);
            }
        }

        let mut added = 0usize;
        for marker in fetched {
            if self.rendered.contains_key(&marker.key) {
                continue;
            }
            let handle = surface.add_marker(&marker.key, marker.position());
            self.rendered.insert(
                marker.key.clone(),
                Rendered {
                    handle,
                    position: marker.position(),
                },
            );
            added += 1;
        }

        tracing::debug!(
            removed = to_remove.len(),
            added,
            total = self.rendered.len(),
            "reconciled marker set"
        );

        self.apply_styles(surface, selected_key);
        self.rebuild_clusters(surface, zoom, tuning);
    }

    /// Emphasizes the selected store's marker, default style for the rest.
    /// Runs whenever selection or the marker set changes.
    pub fn apply_styles<S: MapSurface>(&self, surface: &mut S, selected_key: Option<&str>) {
        for (key, rendered) in &self.rendered {
            let style = if Some(key.as_str()) == selected_key {
                MarkerStyle::Emphasized
            } else {
                MarkerStyle::Default
            };
            surface.set_marker_style(rendered.handle, style);
        }
    }

    /// Rebuilds the cluster layer over the current rendered set.
    pub fn rebuild_clusters<S: MapSurface>(&self, surface: &mut S, zoom: u8, tuning: &SyncTuning) {
        let markers: Vec<StoreMarker> = self
            .rendered
            .iter()
            .map(|(key, r)| StoreMarker {
                key: key.clone(),
                latitude: r.position.lat,
                longitude: r.position.lng,
            })
            .collect();
        let clusters = build_clusters(&markers, zoom, tuning);
        surface.set_clusters(&clusters);
    }

    /// Removes every rendered marker and clears the cluster layer. Used
    /// when zoom drops below the fetch threshold.
    pub fn clear<S: MapSurface>(&mut self, surface: &mut S) {
        for (_, rendered) in self.rendered.drain() {
            surface.remove_marker(rendered.handle);
        }
        surface.set_clusters(&[]);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    /// Handle currently rendered for `key`, if any. Handle identity is
    /// stable across reconciliations that keep the key.
    #[must_use]
    pub fn handle_of(&self, key: &str) -> Option<MarkerHandle> {
        self.rendered.get(key).map(|r| r.handle)
    }
}
