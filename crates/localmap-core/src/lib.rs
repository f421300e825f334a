//! Shared domain types and configuration for the localmap workspace.

pub mod config;
pub mod error;
pub mod geo;
pub mod store;

pub use config::{load_app_config, load_app_config_from_env, AppConfig};
pub use error::ConfigError;
pub use geo::{LatLng, LatLngBounds, Viewport};
pub use store::{Institution, Store, StoreMarker};
