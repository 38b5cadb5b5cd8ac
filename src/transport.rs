//! HTTP transport abstraction for retrieving provider pages.

use async_trait::async_trait;
use url::Url;

use crate::Result;

/// Trait for issuing a GET request and returning the response body.
///
/// Implementations report network errors, timeouts and non-success
/// statuses as errors; deciding what those mean for a search is left to
/// the [`PageFetcher`](crate::PageFetcher).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the body of the given URL.
    async fn get(&self, url: &Url) -> Result<String>;
}
