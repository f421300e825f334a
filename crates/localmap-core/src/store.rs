//! Domain types for storefront records.
//!
//! Field names map to the backend's camelCase wire shape via serde renames.
//! Store identity is an opaque string key (`uuid` on the wire); nothing may
//! assume numeric ordering or key reuse.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// Full storefront record ("Detail" form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Opaque stable identifier.
    #[serde(rename = "uuid")]
    pub key: String,
    #[serde(rename = "storeName")]
    pub name: String,
    /// Free-form address line. Older backend revisions sent `roadAddress`.
    #[serde(rename = "address", alias = "roadAddress")]
    pub address: String,
    /// Local-currency instrument accepted at this storefront.
    #[serde(rename = "localBill")]
    pub local_bill: String,
    pub region: String,
    #[serde(rename = "sectorName", default)]
    pub sector: Option<String>,
    #[serde(rename = "telNumber", default)]
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Store {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Reduced projection for bulk map rendering.
    #[must_use]
    pub fn to_marker(&self) -> StoreMarker {
        StoreMarker {
            key: self.key.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Lightweight marker projection: key and coordinate only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMarker {
    #[serde(rename = "uuid")]
    pub key: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl StoreMarker {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// Issuing institution with its own anchor coordinate (v2 endpoint shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    #[serde(rename = "regionName")]
    pub region_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Institution {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}
