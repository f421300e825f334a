//! Grid clustering over the rendered marker set.
//!
//! Markers within the same fixed-size world-pixel grid cell are grouped
//! into a cluster labeled with its member count. Above the max-cluster
//! zoom, markers render individually and no clusters are produced.

use std::collections::HashMap;

use localmap_core::geo::LatLng;
use localmap_core::store::StoreMarker;

use crate::tuning::SyncTuning;

/// Visual weight of a cluster, escalating with member count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterTone {
    Base,
    Elevated,
    Hot,
}

/// A cluster marker: centroid position and member count.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub position: LatLng,
    pub count: usize,
    pub tone: ClusterTone,
}

/// Groups markers into grid-cell clusters at the given zoom.
///
/// Cells with a single member stay individual markers and produce no
/// cluster. Returns an empty vec at or above the max-cluster zoom.
/// Output is sorted by descending count so the densest clusters draw last.
#[must_use]
pub fn build_clusters(markers: &[StoreMarker], zoom: u8, tuning: &SyncTuning) -> Vec<Cluster> {
    if zoom >= tuning.max_cluster_zoom {
        return Vec::new();
    }

    let mut cells: HashMap<(i64, i64), Vec<LatLng>> = HashMap::new();
    for marker in markers {
        let (x, y) = marker.position().world_pixel(zoom);
        let cell = (
            (x / tuning.cluster_grid_px).floor() as i64,
            (y / tuning.cluster_grid_px).floor() as i64,
        );
        cells.entry(cell).or_default().push(marker.position());
    }

    let mut clusters: Vec<Cluster> = cells
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|members| {
            let count = members.len();
            let lat = members.iter().map(|p| p.lat).sum::<f64>() / count as f64;
            let lng = members.iter().map(|p| p.lng).sum::<f64>() / count as f64;
            Cluster {
                position: LatLng::new(lat, lng),
                count,
                tone: tone_for(count, tuning),
            }
        })
        .collect();
    clusters.sort_by(|a, b| b.count.cmp(&a.count));
    clusters
}

fn tone_for(count: usize, tuning: &SyncTuning) -> ClusterTone {
    if count > tuning.cluster_hot_over {
        ClusterTone::Hot
    } else if count > tuning.cluster_elevated_over {
        ClusterTone::Elevated
    } else {
        ClusterTone::Base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(key: &str, lat: f64, lng: f64) -> StoreMarker {
        StoreMarker {
            key: key.to_owned(),
            latitude: lat,
            longitude: lng,
        }
    }

    fn tuning() -> SyncTuning {
        SyncTuning::default()
    }

    #[test]
    fn nearby_markers_share_a_cluster_at_low_zoom() {
        // ~100 m apart: same 60px cell at zoom 13, distinct cells at 16+.
        let markers = vec![
            marker("a", 37.5665, 126.9780),
            marker("b", 37.5670, 126.9785),
            marker("c", 37.5668, 126.9782),
        ];
        let clusters = build_clusters(&markers, 13, &tuning());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 3);
        assert_eq!(clusters[0].tone, ClusterTone::Base);
        // Centroid sits between the members.
        assert!(clusters[0].position.lat > 37.5665 && clusters[0].position.lat < 37.5670);
    }

    #[test]
    fn no_clusters_at_or_above_max_cluster_zoom() {
        let markers = vec![
            marker("a", 37.5665, 126.9780),
            marker("b", 37.5665, 126.9780),
        ];
        assert!(build_clusters(&markers, 16, &tuning()).is_empty());
        assert!(build_clusters(&markers, 18, &tuning()).is_empty());
    }

    #[test]
    fn singletons_do_not_cluster() {
        let markers = vec![
            marker("a", 37.5665, 126.9780),
            // ~1 degree away: a different cell at any urban zoom.
            marker("b", 38.5665, 127.9780),
        ];
        assert!(build_clusters(&markers, 13, &tuning()).is_empty());
    }

    #[test]
    fn tone_escalates_with_count() {
        let t = tuning();
        assert_eq!(tone_for(5, &t), ClusterTone::Base);
        assert_eq!(tone_for(6, &t), ClusterTone::Elevated);
        assert_eq!(tone_for(10, &t), ClusterTone::Elevated);
        assert_eq!(tone_for(11, &t), ClusterTone::Hot);
    }

    #[test]
    fn densest_cluster_sorts_first() {
        let mut markers = Vec::new();
        for i in 0..7 {
            markers.push(marker(&format!("dense{i}"), 37.5665, 126.9780));
        }
        markers.push(marker("pair1", 35.1796, 129.0756));
        markers.push(marker("pair2", 35.1796, 129.0756));
        let clusters = build_clusters(&markers, 12, &tuning());
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 7);
        assert_eq!(clusters[0].tone, ClusterTone::Elevated);
        assert_eq!(clusters[1].count, 2);
    }
}
