use thiserror::Error;

/// Errors returned by the store-locator API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network/TLS failure or non-2xx HTTP status from the backend.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
