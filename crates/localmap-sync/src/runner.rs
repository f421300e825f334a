//! Glue between the sans-IO session and the HTTP client.
//!
//! The runner owns both halves: it drains due [`FetchRequest`]s from the
//! session, executes them against the backend, and feeds the responses
//! back through the matching `apply_*` method. Requests within one pump
//! run sequentially; generation checks in the session make any
//! interleaving with newer events safe.

use std::time::Instant;

use localmap_api::StoreClient;

use crate::session::{FetchRequest, MapSession};
use crate::surface::MapSurface;

pub struct SessionRunner<S: MapSurface> {
    client: StoreClient,
    session: MapSession<S>,
}

impl<S: MapSurface> SessionRunner<S> {
    pub fn new(client: StoreClient, session: MapSession<S>) -> Self {
        Self { client, session }
    }

    /// Fetches the institution list once at startup. A failure is logged
    /// and tolerated; institution selection then falls back to the
    /// server-side region search.
    pub async fn init_institutions(&mut self) {
        let result = self.client.institutions().await;
        self.session.apply_institutions(result);
    }

    /// Executes every request due at `now`. Call after each event batch
    /// and whenever [`MapSession::next_deadline`] elapses.
    pub async fn pump(&mut self, now: Instant) {
        for request in self.session.take_requests(now) {
            tracing::debug!(?request, "executing fetch");
            self.execute(request).await;
        }
    }

    async fn execute(&mut self, request: FetchRequest) {
        match request {
            FetchRequest::Markers { bounds, generation } => {
                let result = self.client.markers_by_rect(&bounds).await;
                self.session.apply_markers(generation, result);
            }
            FetchRequest::ListByRect { bounds, generation } => {
                let result = self.client.nearby_by_rect(&bounds).await;
                self.session.apply_list(generation, result);
            }
            FetchRequest::ListByPoint {
                center,
                distance_m,
                generation,
            } => {
                let result = self
                    .client
                    .nearby_by_point(center.lat, center.lng, distance_m)
                    .await;
                self.session.apply_list(generation, result);
            }
            FetchRequest::SearchName {
                query,
                page,
                size,
                generation,
            } => {
                let result = self.client.search_by_name(&query, page, size).await;
                self.session.apply_name_search(generation, result);
            }
            FetchRequest::SearchRegion {
                query,
                page,
                size,
                generation,
            } => {
                let result = self.client.search_by_region(&query, page, size).await;
                self.session.apply_region_search(generation, result);
            }
            FetchRequest::Detail { key, generation } => {
                let result = self.client.store_detail(&key).await;
                self.session.apply_detail(generation, result);
            }
        }
    }

    #[must_use]
    pub fn session(&self) -> &MapSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut MapSession<S> {
        &mut self.session
    }
}
