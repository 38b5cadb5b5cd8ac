//! Single-page fetching for one provider.

use std::sync::Arc;

use serde_json::Value;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::transport::Transport;
use crate::transport_http::HttpTransport;
use crate::{RawItem, Result, SearchError, SearchProvider};

/// Outcome of fetching one page.
///
/// Consumed immediately by the aggregator; every variant counts as one
/// settlement.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Page carried results.
    Success {
        /// Raw items in payload order.
        items: Vec<RawItem>,
    },
    /// Provider signalled that no more results exist.
    Exhausted,
    /// Page could not be fetched or decoded.
    Failure {
        /// Human-readable cause.
        reason: String,
    },
}

impl PageOutcome {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Exhausted => "exhausted",
            Self::Failure { .. } => "failure",
        }
    }
}

/// Fetches and classifies single provider pages.
///
/// Transport errors, timeouts, undecodable bodies and unexpected payload
/// shapes all come back as [`PageOutcome::Failure`]; `fetch_page` never
/// returns an error.
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
}

impl PageFetcher {
    /// Creates a fetcher over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates a fetcher over a default [`HttpTransport`].
    pub fn http() -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new()?)))
    }

    /// Fetches the page of `provider` starting at `offset`.
    pub async fn fetch_page(
        &self,
        provider: &dyn SearchProvider,
        query: &str,
        offset: u32,
    ) -> PageOutcome {
        match self.try_fetch_page(provider, query, offset).await {
            Ok(outcome) => {
                debug!(
                    "Provider {} page at offset {} settled: {}",
                    provider.id(),
                    offset,
                    outcome.kind()
                );
                outcome
            }
            Err(e) => {
                warn!(
                    "Provider {} page at offset {} failed: {}",
                    provider.id(),
                    offset,
                    e
                );
                PageOutcome::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_fetch_page(
        &self,
        provider: &dyn SearchProvider,
        query: &str,
        offset: u32,
    ) -> Result<PageOutcome> {
        let config = provider.config();
        let url = config.page_url(query, offset)?;

        // A zero timeout disables the limit.
        let body = if config.timeout == 0 {
            self.transport.get(&url).await?
        } else {
            timeout(Duration::from_secs(config.timeout), self.transport.get(&url))
                .await
                .map_err(|_| SearchError::Timeout)??
        };

        let body: Value = serde_json::from_str(&body)?;
        provider.classify(body)
    }
}
