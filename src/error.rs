//! Error types for the federated search library.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while configuring or running a search.
///
/// Transport and payload errors never escape a page fetch: the fetcher turns
/// them into [`PageOutcome::Failure`](crate::PageOutcome::Failure). Only
/// configuration and session setup errors reach callers.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Provider returned HTTP status {0}")]
    Status(u16),

    /// Page request timed out.
    #[error("Request timeout exceeded")]
    Timeout,

    /// Payload did not have the shape the provider expects.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Failed to decode a JSON payload.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No provider registered under the given id.
    #[error("Unknown provider '{0}'")]
    ProviderNotFound(String),

    /// Two providers registered under the same id.
    #[error("Provider '{0}' is already registered")]
    DuplicateProvider(String),

    /// No provider selected for a search.
    #[error("No search providers selected")]
    NoProviders,

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid provider configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SearchError {
    /// Returns true for errors raised while talking to a provider
    /// (network, timeout, or non-2xx status).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status(_) | Self::Timeout)
    }
}
