//! Per-provider page aggregation.

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info};

use crate::session::SessionToken;
use crate::{PageFetcher, ProviderResultSet, ResultItem, SearchProvider};

/// Drives all page fetches of one provider and collects the results.
///
/// Every configured page is requested at once and every request runs to
/// completion, including after a page reports that the provider is
/// exhausted. Items are appended in the order pages settle, so the final
/// order across pages is not deterministic.
#[derive(Clone)]
pub struct ProviderAggregator {
    fetcher: PageFetcher,
}

impl ProviderAggregator {
    /// Creates an aggregator using the given fetcher.
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetches every page of `provider` for `query` and returns all mapped
    /// items once each page has settled.
    pub async fn run(&self, provider: &dyn SearchProvider, query: &str) -> Vec<ResultItem> {
        self.run_while(provider, query, || true)
            .await
            .unwrap_or_default()
    }

    /// Like [`run`](Self::run), but owned by a search session.
    ///
    /// Settlements arriving after `token` went stale are discarded and the
    /// run yields `None`. Launched fetches are not cancelled.
    pub async fn run_in_session(
        &self,
        provider: &dyn SearchProvider,
        query: &str,
        token: &SessionToken,
    ) -> Option<Vec<ResultItem>> {
        self.run_while(provider, query, || token.is_current()).await
    }

    async fn run_while<F>(
        &self,
        provider: &dyn SearchProvider,
        query: &str,
        is_live: F,
    ) -> Option<Vec<ResultItem>>
    where
        F: Fn() -> bool,
    {
        let config = provider.config();
        let pages = config.max_pages_per_query;
        let mut results = ProviderResultSet::new(pages as usize);

        let mut pending: FuturesUnordered<_> = (0..pages)
            .map(|page_index| {
                self.fetcher
                    .fetch_page(provider, query, config.page_offset(page_index))
            })
            .collect();

        let mut live = is_live();
        while let Some(outcome) = pending.next().await {
            if live && !is_live() {
                debug!(
                    "Provider {} superseded after {} of {} pages",
                    provider.id(),
                    results.completed_pages(),
                    pages
                );
                live = false;
            }
            if live {
                results.settle(provider, outcome);
            }
        }

        if !live || !is_live() {
            return None;
        }

        debug_assert!(results.is_complete());
        info!(
            "Provider {} resolved with {} results from {} pages",
            provider.id(),
            results.items().len(),
            results.completed_pages()
        );
        Some(results.resolve())
    }
}
