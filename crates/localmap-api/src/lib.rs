//! Typed HTTP client for the store-locator backend.

mod client;
mod error;
mod types;

pub use client::StoreClient;
pub use error::ApiError;
pub use types::Page;
