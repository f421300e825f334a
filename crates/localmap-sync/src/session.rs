//! The root controller: one `MapSession` per map view.
//!
//! The session is sans-IO and single-threaded. User gestures and surface
//! callbacks come in through the `on_*` methods; due backend work comes
//! out of [`MapSession::take_requests`] as [`FetchRequest`] values tagged
//! with a channel generation; responses go back in through the `apply_*`
//! methods, which drop anything whose generation has been superseded.
//! Every mutation completes without an intervening suspension point, so no
//! event can observe a torn state.
//!
//! Debounced work reads session state at fire time, not at schedule time:
//! a request snapshots the viewport and query text when it is emitted,
//! never when the event that armed the timer happened.

use std::time::Instant;

use localmap_api::ApiError;
use localmap_core::geo::{LatLng, LatLngBounds, Viewport};
use localmap_core::store::{Institution, Store, StoreMarker};

use crate::reconcile::MarkerReconciler;
use crate::scheduler::{Channel, QueryScheduler};
use crate::search::{first_valid_position, SearchState};
use crate::selection::{OverlayTransition, SelectionController};
use crate::surface::MapSurface;
use crate::tuning::SyncTuning;

/// A backend call the caller should perform, with the parameters
/// snapshotted at emission time.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    /// Marker projections for the visible rectangle.
    Markers {
        bounds: LatLngBounds,
        generation: u64,
    },
    /// Sidebar list for the visible rectangle.
    ListByRect {
        bounds: LatLngBounds,
        generation: u64,
    },
    /// Sidebar list by center distance, used before the first layout pass
    /// and as the empty-search fallback.
    ListByPoint {
        center: LatLng,
        distance_m: u32,
        generation: u64,
    },
    SearchName {
        query: String,
        page: u32,
        size: u32,
        generation: u64,
    },
    SearchRegion {
        query: String,
        page: u32,
        size: u32,
        generation: u64,
    },
    /// Full detail for a selection; issued immediately, never debounced.
    Detail { key: String, generation: u64 },
}

/// Why the sidebar list is empty, for user-facing messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Below the fetch-zoom threshold: "zoom in to search".
    ZoomedOut,
    /// At or above the threshold with zero matches: "no results".
    NoResults,
}

pub struct MapSession<S: MapSurface> {
    surface: S,
    tuning: SyncTuning,
    viewport: Viewport,
    scheduler: QueryScheduler,
    reconciler: MarkerReconciler,
    selection: SelectionController,
    search: SearchState,
    stores: Vec<Store>,
    empty_reason: Option<EmptyReason>,
    loading: bool,
    last_error: Option<String>,
    immediate: Vec<FetchRequest>,
}

impl<S: MapSurface> MapSession<S> {
    pub fn new(surface: S, tuning: SyncTuning) -> Self {
        Self {
            surface,
            tuning,
            viewport: Viewport::initial(),
            scheduler: QueryScheduler::new(),
            reconciler: MarkerReconciler::new(),
            selection: SelectionController::new(),
            search: SearchState::new(),
            stores: Vec::new(),
            empty_reason: None,
            loading: false,
            last_error: None,
            immediate: Vec::new(),
        }
    }

    // --- surface/gesture events -------------------------------------------

    /// The map center moved (drag settled or programmatic pan finished).
    pub fn on_center_changed(&mut self, center: LatLng, now: Instant) {
        self.viewport.center = center;
        if self.viewport.zoom >= self.tuning.min_fetch_zoom {
            self.scheduler.arm_nearby(now, &self.tuning);
        }
    }

    /// The zoom level changed. Crossing the fetch threshold downward
    /// clears the list and marker set immediately, not debounced, so stale
    /// data never lingers at wide zooms.
    pub fn on_zoom_changed(&mut self, zoom: u8, now: Instant) {
        self.viewport.zoom = zoom;
        if zoom < self.tuning.min_fetch_zoom {
            self.scheduler.cancel_bounds();
            self.stores.clear();
            self.reconciler.clear(&mut self.surface);
            self.empty_reason = Some(EmptyReason::ZoomedOut);
            self.loading = false;
        } else {
            self.scheduler.arm_nearby(now, &self.tuning);
        }
    }

    /// The visible bounds settled after a gesture or layout pass.
    pub fn on_bounds_changed(&mut self, bounds: LatLngBounds, now: Instant) {
        self.viewport.bounds = Some(bounds);
        if self.viewport.zoom >= self.tuning.min_fetch_zoom {
            self.scheduler.arm_bounds(now, &self.tuning);
        }
        match self.selection.update_for_bounds(&bounds, &self.tuning) {
            Some(OverlayTransition::Hide) => self.surface.hide_overlay(),
            Some(OverlayTransition::Show) => {
                if let Some(store) = self.selection.selected_store() {
                    let position = store.position();
                    let store = store.clone();
                    self.surface.show_overlay(&store, position);
                }
            }
            None => {}
        }
    }

    /// A marker was clicked. `None` is the map surface's "clicked
    /// elsewhere" signal and clears the selection.
    pub fn on_marker_clicked(&mut self, key: Option<&str>) {
        match key {
            Some(key) => {
                let generation = self.selection.begin(key);
                self.immediate.push(FetchRequest::Detail {
                    key: key.to_owned(),
                    generation,
                });
                self.reconciler
                    .apply_styles(&mut self.surface, self.selection.selected_key());
            }
            None => self.deselect(),
        }
    }

    /// A sidebar list item was clicked. Recenters toward the store and
    /// loads its full detail.
    pub fn on_store_selected(&mut self, store: &Store) {
        let position = store.position();
        self.viewport.center = position;
        self.surface.pan_to(position);
        let generation = self.selection.begin(&store.key);
        self.immediate.push(FetchRequest::Detail {
            key: store.key.clone(),
            generation,
        });
        self.reconciler
            .apply_styles(&mut self.surface, self.selection.selected_key());
    }

    /// The detail overlay's close control was clicked.
    pub fn on_overlay_closed(&mut self) {
        self.deselect();
    }

    /// Name-search input changed. The fetch itself is debounced; whether
    /// the text is empty (nearby fallback) is decided at fire time.
    pub fn on_name_input(&mut self, text: &str, now: Instant) {
        self.search.set_name_query(text);
        self.scheduler.arm_name_search(now, &self.tuning);
    }

    /// Region-search input changed.
    pub fn on_region_input(&mut self, text: &str, now: Instant) {
        self.search.set_region_query(text);
        self.scheduler.arm_region_search(now, &self.tuning);
    }

    /// An institution was picked from the filter. Resolved client-side
    /// against the cached institution list when possible; unknown names
    /// fall back to a server-side region search.
    pub fn on_institution_selected(&mut self, name: &str, now: Instant) {
        self.scheduler.cancel_searches();
        if let Some(position) = self.search.institution_position(name) {
            self.search.set_institution(name);
            let zoom = self.tuning.focus_zoom.max(self.tuning.min_fetch_zoom);
            self.viewport.recenter(position, zoom);
            self.surface.pan_to(position);
            self.surface.set_zoom(zoom);
        } else {
            tracing::debug!(name, "institution not in cached list; using region search");
            self.search.set_region_query(name);
            self.scheduler.arm_region_search(now, &self.tuning);
        }
    }

    // --- outbound work ----------------------------------------------------

    /// Drains every request that is due: immediate detail fetches plus any
    /// debounce channel whose deadline has passed. Parameters are read
    /// from current state here, at emission time.
    pub fn take_requests(&mut self, now: Instant) -> Vec<FetchRequest> {
        let mut requests = std::mem::take(&mut self.immediate);
        for (channel, generation) in self.scheduler.due(now) {
            match channel {
                Channel::Markers => {
                    if self.viewport.zoom < self.tuning.min_fetch_zoom {
                        tracing::debug!("marker fetch suppressed below zoom threshold");
                        continue;
                    }
                    // The marker endpoint is rectangle-only; without bounds
                    // there is nothing to ask for yet.
                    let Some(bounds) = self.viewport.bounds else {
                        continue;
                    };
                    self.loading = true;
                    requests.push(FetchRequest::Markers { bounds, generation });
                }
                Channel::List => {
                    if self.viewport.zoom < self.tuning.min_fetch_zoom {
                        continue;
                    }
                    requests.push(self.list_request(generation));
                }
                Channel::NameSearch => {
                    let query = self.search.name_query().trim().to_owned();
                    if query.is_empty() {
                        requests.extend(self.nearby_fallback());
                    } else {
                        requests.push(FetchRequest::SearchName {
                            query,
                            page: 0,
                            size: self.tuning.page_size,
                            generation,
                        });
                    }
                }
                Channel::RegionSearch => {
                    let query = self.search.region_query().trim().to_owned();
                    if query.is_empty() {
                        requests.extend(self.nearby_fallback());
                    } else {
                        requests.push(FetchRequest::SearchRegion {
                            query,
                            page: 0,
                            size: self.tuning.page_size,
                            generation,
                        });
                    }
                }
            }
        }
        requests
    }

    /// Earliest pending debounce deadline, for driving an external timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    fn list_request(&self, generation: u64) -> FetchRequest {
        match self.viewport.bounds {
            Some(bounds) => FetchRequest::ListByRect { bounds, generation },
            None => FetchRequest::ListByPoint {
                center: self.viewport.center,
                distance_m: self.tuning.nearby_distance_m,
                generation,
            },
        }
    }

    /// Empty search text falls back to the nearby fetch instead of a text
    /// search. Bypasses the bounds-gating rule: the user asked explicitly.
    fn nearby_fallback(&mut self) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        let generation = self.scheduler.issue(Channel::List);
        requests.push(self.list_request(generation));
        if let Some(bounds) = self.viewport.bounds {
            let generation = self.scheduler.issue(Channel::Markers);
            self.loading = true;
            requests.push(FetchRequest::Markers { bounds, generation });
        }
        requests
    }

    // --- response application --------------------------------------------

    /// Applies a sidebar list response. Stale generations are dropped.
    pub fn apply_list(&mut self, generation: u64, result: Result<Vec<Store>, ApiError>) {
        if !self.scheduler.is_current(Channel::List, generation) {
            tracing::debug!(generation, "dropping stale list response");
            return;
        }
        match result {
            Ok(stores) => {
                self.empty_reason = if stores.is_empty() {
                    Some(EmptyReason::NoResults)
                } else {
                    None
                };
                self.stores = stores;
                self.last_error = None;
            }
            Err(error) => {
                tracing::warn!(%error, "list fetch failed; clearing list");
                self.stores.clear();
                self.empty_reason = Some(EmptyReason::NoResults);
                self.last_error = Some(error.to_string());
            }
        }
    }

    /// Applies a marker-projection response and reconciles the rendered
    /// set. Stale generations are dropped.
    pub fn apply_markers(&mut self, generation: u64, result: Result<Vec<StoreMarker>, ApiError>) {
        if !self.scheduler.is_current(Channel::Markers, generation) {
            tracing::debug!(generation, "dropping stale marker response");
            return;
        }
        self.loading = false;
        match result {
            Ok(markers) => {
                self.reconciler.reconcile(
                    &mut self.surface,
                    &markers,
                    self.selection.selected_key(),
                    self.viewport.zoom,
                    &self.tuning,
                );
                self.last_error = None;
            }
            Err(error) => {
                tracing::warn!(%error, "marker fetch failed; clearing markers");
                self.reconciler.clear(&mut self.surface);
                self.last_error = Some(error.to_string());
            }
        }
    }

    /// Applies a name-search response.
    pub fn apply_name_search(&mut self, generation: u64, result: Result<Vec<Store>, ApiError>) {
        if !self.scheduler.is_current(Channel::NameSearch, generation) {
            tracing::debug!(generation, "dropping stale name-search response");
            return;
        }
        self.apply_search_result(result);
    }

    /// Applies a region-search response.
    pub fn apply_region_search(&mut self, generation: u64, result: Result<Vec<Store>, ApiError>) {
        if !self.scheduler.is_current(Channel::RegionSearch, generation) {
            tracing::debug!(generation, "dropping stale region-search response");
            return;
        }
        self.apply_search_result(result);
    }

    /// Applies a detail response for a selection.
    pub fn apply_detail(&mut self, generation: u64, result: Result<Store, ApiError>) {
        match result {
            Ok(store) => {
                if !self.selection.resolve(generation, store.clone()) {
                    return;
                }
                let position = store.position();
                self.viewport.recenter(position, self.tuning.focus_zoom);
                self.surface.pan_to(position);
                self.surface.set_zoom(self.tuning.focus_zoom);
                self.surface.show_overlay(&store, position);
                self.reconciler
                    .apply_styles(&mut self.surface, self.selection.selected_key());
            }
            Err(error) => {
                tracing::warn!(%error, "detail fetch failed; aborting selection");
                self.selection.fail(generation);
                self.last_error = Some(error.to_string());
                self.reconciler
                    .apply_styles(&mut self.surface, self.selection.selected_key());
            }
        }
    }

    /// Stores the institution list fetched at startup. A failed fetch is
    /// tolerated; institution selection then falls back to region search.
    pub fn apply_institutions(&mut self, result: Result<Vec<Institution>, ApiError>) {
        match result {
            Ok(institutions) => self.search.set_institutions(institutions),
            Err(error) => tracing::warn!(%error, "institution list fetch failed"),
        }
    }

    fn apply_search_result(&mut self, result: Result<Vec<Store>, ApiError>) {
        match result {
            Ok(results) => {
                let markers: Vec<StoreMarker> = results.iter().map(Store::to_marker).collect();
                if let Some(position) = first_valid_position(&results) {
                    self.viewport.recenter(position, self.tuning.focus_zoom);
                    self.surface.pan_to(position);
                    self.surface.set_zoom(self.tuning.focus_zoom);
                }
                self.empty_reason = if results.is_empty() {
                    Some(if self.viewport.zoom < self.tuning.min_fetch_zoom {
                        EmptyReason::ZoomedOut
                    } else {
                        EmptyReason::NoResults
                    })
                } else {
                    None
                };
                self.stores = results;
                self.reconciler.reconcile(
                    &mut self.surface,
                    &markers,
                    self.selection.selected_key(),
                    self.viewport.zoom,
                    &self.tuning,
                );
                self.last_error = None;
            }
            Err(error) => {
                tracing::warn!(%error, "search failed; clearing results");
                self.stores.clear();
                self.reconciler.clear(&mut self.surface);
                self.empty_reason = Some(EmptyReason::NoResults);
                self.last_error = Some(error.to_string());
            }
        }
    }

    fn deselect(&mut self) {
        self.selection.deselect();
        self.surface.hide_overlay();
        self.reconciler.apply_styles(&mut self.surface, None);
    }

    // --- read access ------------------------------------------------------

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    #[must_use]
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    #[must_use]
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        self.empty_reason
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.reconciler.len()
    }
}
