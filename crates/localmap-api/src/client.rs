//! HTTP client for the store-locator backend.
//!
//! Wraps `reqwest` with typed response deserialization for the
//! `local-stores` and `institutions` endpoint families. All responses are
//! JSON; a non-2xx status surfaces as [`ApiError::Http`]. No retry policy:
//! every failure is terminal for that request, and the next user-triggered
//! or debounced event retries implicitly.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use localmap_core::geo::LatLngBounds;
use localmap_core::store::{Institution, Store, StoreMarker};

use crate::error::ApiError;
use crate::types::Page;

/// Client for the store-locator backend.
///
/// Use [`StoreClient::new`] for production or point `base_url` at a mock
/// server in tests.
pub struct StoreClient {
    client: Client,
    base_url: Url,
}

impl StoreClient {
    /// Creates a new client for the given backend base URL, e.g.
    /// `http://localhost:8080/api/v1`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent.to_owned())
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends path segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self { client, base_url })
    }

    /// Stores within `distance_m` meters of a point.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] on network failure or non-2xx status,
    /// [`ApiError::Deserialize`] on an unexpected body shape.
    pub async fn nearby_by_point(
        &self,
        latitude: f64,
        longitude: f64,
        distance_m: u32,
    ) -> Result<Vec<Store>, ApiError> {
        let url = self.build_url(
            "local-stores/nearby",
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("distance", distance_m.to_string()),
            ],
        )?;
        self.get_json(url).await
    }

    /// Full store records inside a viewport rectangle.
    ///
    /// The backend names the rectangle corners `left` (southwest) and
    /// `right` (northeast).
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] on network failure or non-2xx status,
    /// [`ApiError::Deserialize`] on an unexpected body shape.
    pub async fn nearby_by_rect(&self, bounds: &LatLngBounds) -> Result<Vec<Store>, ApiError> {
        let url = self.build_url("local-stores/nearby/linestring", &rect_params(bounds))?;
        self.get_json(url).await
    }

    /// Marker projections (key + coordinate only) inside a viewport
    /// rectangle, for lightweight bulk rendering.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] on network failure or non-2xx status,
    /// [`ApiError::Deserialize`] on an unexpected body shape.
    pub async fn markers_by_rect(
        &self,
        bounds: &LatLngBounds,
    ) -> Result<Vec<StoreMarker>, ApiError> {
        let url = self.build_url("local-stores/nearby/marker", &rect_params(bounds))?;
        self.get_json(url).await
    }

    /// Paginated name search. Returns the page's `content` only.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] on network failure or non-2xx status,
    /// [`ApiError::Deserialize`] on an unexpected body shape.
    pub async fn search_by_name(
        &self,
        store_name: &str,
        page: u32,
        size: u32,
    ) -> Result<Vec<Store>, ApiError> {
        let url = self.build_url(
            "local-stores/search/name",
            &[
                ("storeName", store_name.to_owned()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )?;
        let envelope: Page<Store> = self.get_json(url).await?;
        Ok(envelope.content)
    }

    /// Paginated region search. Returns the page's `content` only.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] on network failure or non-2xx status,
    /// [`ApiError::Deserialize`] on an unexpected body shape.
    pub async fn search_by_region(
        &self,
        region: &str,
        page: u32,
        size: u32,
    ) -> Result<Vec<Store>, ApiError> {
        let url = self.build_url(
            "local-stores/search/region",
            &[
                ("region", region.to_owned()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )?;
        let envelope: Page<Store> = self.get_json(url).await?;
        Ok(envelope.content)
    }

    /// Full detail for a single store by its opaque key.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] on network failure or non-2xx status,
    /// [`ApiError::Deserialize`] on an unexpected body shape.
    pub async fn store_detail(&self, key: &str) -> Result<Store, ApiError> {
        let url = self.build_url(&format!("local-stores/{key}"), &[])?;
        self.get_json(url).await
    }

    /// Issuing institutions with their anchor coordinates.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] on network failure or non-2xx status,
    /// [`ApiError::Deserialize`] on an unexpected body shape.
    pub async fn institutions(&self) -> Result<Vec<Institution>, ApiError> {
        let url = self.build_url("institutions/v2/names", &[])?;
        self.get_json(url).await
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|_| ApiError::InvalidBaseUrl(format!("{}{path}", self.base_url)))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx status, and parses the body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

fn rect_params(bounds: &LatLngBounds) -> [(&'static str, String); 4] {
    [
        ("leftLatitude", bounds.south.to_string()),
        ("leftLongitude", bounds.west.to_string()),
        ("rightLatitude", bounds.north.to_string()),
        ("rightLongitude", bounds.east.to_string()),
    ]
}
