//! Geographic primitives shared by the API client and the sync core.
//!
//! Coordinates are plain WGS84 lat/lng degrees. The only projection in the
//! system is the Web Mercator world-pixel transform used for grid
//! clustering, where "world pixels" are pixels on the full map at a given
//! zoom level (256 * 2^zoom pixels per side).

use serde::{Deserialize, Serialize};

/// Tile size the world-pixel projection is based on, in pixels.
const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and inside the valid
    /// WGS84 ranges. Backend search results occasionally carry junk
    /// coordinates; callers skip those rather than abort.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Projects to Web Mercator world-pixel coordinates at `zoom`.
    ///
    /// Latitude is clamped to the Mercator limit (~85.05°) so poles do not
    /// produce infinities.
    #[must_use]
    pub fn world_pixel(&self, zoom: u8) -> (f64, f64) {
        let scale = TILE_SIZE * f64::from(1u32 << u32::from(zoom));
        let lat = self.lat.clamp(-85.051_128, 85.051_128).to_radians();
        let x = (self.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - ((lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI)) / 2.0 * scale;
        (x, y)
    }
}

/// Axis-aligned lat/lng rectangle: `south <= north`, `west <= east`.
///
/// Viewports that cross the antimeridian are not handled; the backend this
/// ships against serves a single region nowhere near it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    #[must_use]
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Insets the rectangle by a fraction of its span on each side.
    ///
    /// `margin` applies to the south, west and east sides; `top_margin`
    /// applies to the north side. The detail overlay extends upward from
    /// its marker, so the north side uses a smaller margin than the rest.
    #[must_use]
    pub fn inset(&self, margin: f64, top_margin: f64) -> Self {
        let lat_span = self.lat_span();
        let lng_span = self.lng_span();
        Self {
            south: self.south + lat_span * margin,
            west: self.west + lng_span * margin,
            north: self.north - lat_span * top_margin,
            east: self.east - lng_span * margin,
        }
    }
}

/// The map's current view: center, zoom, and visible bounds.
///
/// `bounds` is `None` until the underlying map surface has completed at
/// least one layout pass; consumers defer bounds-dependent work until then.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    pub bounds: Option<LatLngBounds>,
}

impl Viewport {
    /// Initial view over the default service area (Seoul city hall).
    #[must_use]
    pub fn initial() -> Self {
        Self {
            center: LatLng::new(37.5665, 126.978),
            zoom: 13,
            bounds: None,
        }
    }

    /// Programmatic recenter (search result, selection). Invalidates the
    /// bounds until the surface reports a fresh layout.
    pub fn recenter(&mut self, center: LatLng, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        self.bounds = None;
    }
}
