//! Search result types.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PageOutcome, SearchProvider};

/// A single normalized search result.
///
/// Built by a provider's result mapper from its raw payload and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Result description/snippet.
    pub snippet: String,
    /// Cover or thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Primary author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl ResultItem {
    /// Creates a new result item.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            image_url: None,
            author: None,
        }
    }

    /// Sets the image URL.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Sets the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Accumulator for one provider run.
///
/// Owned by a single aggregator run; items are appended in settlement order
/// and the set is consumed by [`ProviderResultSet::resolve`], so a run can
/// only hand out its results once.
#[derive(Debug)]
pub struct ProviderResultSet {
    items: Vec<ResultItem>,
    completed_pages: usize,
    expected_pages: usize,
}

impl ProviderResultSet {
    /// Creates an empty set expecting `expected_pages` settlements.
    pub fn new(expected_pages: usize) -> Self {
        Self {
            items: Vec::new(),
            completed_pages: 0,
            expected_pages,
        }
    }

    /// Records one page settlement.
    ///
    /// Successful pages have each raw item passed through the provider's
    /// mapper; exhausted and failed pages only count toward completion.
    pub fn settle(&mut self, provider: &dyn SearchProvider, outcome: PageOutcome) {
        self.completed_pages += 1;
        if let PageOutcome::Success { items } = outcome {
            let before = self.items.len();
            self.items
                .extend(items.iter().filter_map(|raw| provider.map_result(raw)));
            let skipped = items.len() - (self.items.len() - before);
            if skipped > 0 {
                debug!("{}: skipped {} unmappable items", provider.id(), skipped);
            }
        }
    }

    /// Number of pages settled so far.
    pub fn completed_pages(&self) -> usize {
        self.completed_pages
    }

    /// Returns true once every expected page has settled.
    pub fn is_complete(&self) -> bool {
        self.completed_pages >= self.expected_pages
    }

    /// Items accumulated so far.
    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    /// Consumes the set, yielding the accumulated items.
    pub fn resolve(self) -> Vec<ResultItem> {
        self.items
    }
}

/// Final results of one provider, as handed to a rendering surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResults {
    /// Provider id.
    pub provider: String,
    /// Display label.
    pub label: String,
    /// Number of results.
    pub count: usize,
    /// The results, in settlement order.
    pub items: Vec<ResultItem>,
}

impl ProviderResults {
    /// Creates a provider result bundle.
    pub fn new(
        provider: impl Into<String>,
        label: impl Into<String>,
        items: Vec<ResultItem>,
    ) -> Self {
        Self {
            provider: provider.into(),
            label: label.into(),
            count: items.len(),
            items,
        }
    }
}
