//! Search input state: name/region text and the institution filter.
//!
//! The three query kinds are mutually exclusive; activating one clears the
//! others. Institutions are resolved client-side against the cached
//! institution list, so selecting one recenters the map without a network
//! round trip.

use localmap_core::geo::LatLng;
use localmap_core::store::{Institution, Store};

/// The query state the last fetch was issued under.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveQuery {
    #[default]
    None,
    Name(String),
    Region(String),
    Institution(String),
}

#[derive(Debug, Default)]
pub struct SearchState {
    name_query: String,
    region_query: String,
    active: ActiveQuery,
    institutions: Vec<Institution>,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records name-search input, clearing the region query.
    pub fn set_name_query(&mut self, text: &str) {
        self.name_query = text.to_owned();
        self.region_query.clear();
        self.active = if text.trim().is_empty() {
            ActiveQuery::None
        } else {
            ActiveQuery::Name(text.to_owned())
        };
    }

    /// Records region-search input, clearing the name query.
    pub fn set_region_query(&mut self, text: &str) {
        self.region_query = text.to_owned();
        self.name_query.clear();
        self.active = if text.trim().is_empty() {
            ActiveQuery::None
        } else {
            ActiveQuery::Region(text.to_owned())
        };
    }

    /// Records an institution selection, clearing both text queries.
    pub fn set_institution(&mut self, name: &str) {
        self.name_query.clear();
        self.region_query.clear();
        self.active = ActiveQuery::Institution(name.to_owned());
    }

    /// Clears all query state (back to bounds-driven fetching).
    pub fn clear(&mut self) {
        self.name_query.clear();
        self.region_query.clear();
        self.active = ActiveQuery::None;
    }

    #[must_use]
    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    #[must_use]
    pub fn region_query(&self) -> &str {
        &self.region_query
    }

    #[must_use]
    pub fn active(&self) -> &ActiveQuery {
        &self.active
    }

    pub fn set_institutions(&mut self, institutions: Vec<Institution>) {
        self.institutions = institutions;
    }

    #[must_use]
    pub fn institutions(&self) -> &[Institution] {
        &self.institutions
    }

    /// Client-side institution lookup by exact region name.
    #[must_use]
    pub fn institution_position(&self, name: &str) -> Option<LatLng> {
        self.institutions
            .iter()
            .find(|i| i.region_name == name)
            .map(Institution::position)
    }
}

/// First result with a usable coordinate. Results with non-finite or
/// out-of-range coordinates are logged and skipped, not fatal.
#[must_use]
pub fn first_valid_position(stores: &[Store]) -> Option<LatLng> {
    for store in stores {
        let position = store.position();
        if position.is_valid() {
            return Some(position);
        }
        tracing::warn!(
            key = %store.key,
            lat = store.latitude,
            lng = store.longitude,
            "skipping search result with invalid coordinates"
        );
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(key: &str, lat: f64, lng: f64) -> Store {
        Store {
            key: key.to_owned(),
            name: "s".to_owned(),
            address: "a".to_owned(),
            local_bill: "b".to_owned(),
            region: "r".to_owned(),
            sector: None,
            phone: None,
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn name_and_region_queries_are_mutually_exclusive() {
        let mut search = SearchState::new();
        search.set_name_query("coffee");
        assert_eq!(search.active(), &ActiveQuery::Name("coffee".to_owned()));

        search.set_region_query("Seoul");
        assert_eq!(search.name_query(), "");
        assert_eq!(search.active(), &ActiveQuery::Region("Seoul".to_owned()));

        search.set_name_query("bakery");
        assert_eq!(search.region_query(), "");
        assert_eq!(search.active(), &ActiveQuery::Name("bakery".to_owned()));
    }

    #[test]
    fn institution_clears_text_queries() {
        let mut search = SearchState::new();
        search.set_name_query("coffee");
        search.set_institution("Seoul");
        assert_eq!(search.name_query(), "");
        assert_eq!(
            search.active(),
            &ActiveQuery::Institution("Seoul".to_owned())
        );
    }

    #[test]
    fn whitespace_query_counts_as_empty() {
        let mut search = SearchState::new();
        search.set_name_query("   ");
        assert_eq!(search.active(), &ActiveQuery::None);
    }

    #[test]
    fn institution_lookup_by_name() {
        let mut search = SearchState::new();
        search.set_institutions(vec![Institution {
            region_name: "Seoul".to_owned(),
            latitude: 37.5665,
            longitude: 126.978,
        }]);
        let position = search.institution_position("Seoul").unwrap();
        assert!((position.lat - 37.5665).abs() < 1e-9);
        assert!(search.institution_position("Busan").is_none());
    }

    #[test]
    fn invalid_coordinates_are_skipped() {
        let stores = vec![
            store("bad1", f64::NAN, 127.0),
            store("bad2", 95.0, 127.0),
            store("good", 37.5, 127.0),
        ];
        let position = first_valid_position(&stores).unwrap();
        assert!((position.lat - 37.5).abs() < 1e-9);
    }

    #[test]
    fn all_invalid_coordinates_yield_none() {
        let stores = vec![store("bad", f64::INFINITY, 127.0)];
        assert!(first_valid_position(&stores).is_none());
    }
}
