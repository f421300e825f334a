//! Tuning knobs for the synchronization core.

use std::time::Duration;

/// Fixed parameters governing debounce windows, zoom gating, clustering and
/// the overlay safe region. Defaults mirror the production behavior; tests
/// shrink the debounce windows to keep themselves fast.
#[derive(Debug, Clone)]
pub struct SyncTuning {
    /// Debounce window for search and pan-driven fetch channels.
    pub debounce: Duration,
    /// Shorter settle window applied to bounds changes after a drag.
    pub bounds_settle: Duration,
    /// Below this zoom, bounds-driven fetches are suppressed and the list
    /// and marker set are cleared.
    pub min_fetch_zoom: u8,
    /// Zoom applied after a successful search or selection.
    pub focus_zoom: u8,
    /// Page size for name/region searches.
    pub page_size: u32,
    /// Radius for the point-distance nearby fallback, in meters.
    pub nearby_distance_m: u32,
    /// Cluster grid cell size in world pixels.
    pub cluster_grid_px: f64,
    /// At or above this zoom, markers render unclustered.
    pub max_cluster_zoom: u8,
    /// Cluster tone escalates above these member counts.
    pub cluster_elevated_over: usize,
    pub cluster_hot_over: usize,
    /// Safe-region inset as a fraction of the viewport span (south, west,
    /// east sides).
    pub safe_margin: f64,
    /// Smaller inset on the north side, where the overlay extends.
    pub safe_margin_top: f64,
}

impl Default for SyncTuning {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            bounds_settle: Duration::from_millis(100),
            min_fetch_zoom: 14,
            focus_zoom: 16,
            page_size: 20,
            nearby_distance_m: 3000,
            cluster_grid_px: 60.0,
            max_cluster_zoom: 16,
            cluster_elevated_over: 5,
            cluster_hot_over: 10,
            safe_margin: 0.15,
            safe_margin_top: 0.10,
        }
    }
}
