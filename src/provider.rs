//! Search provider trait and configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{PageOutcome, Result, ResultItem, SearchError};

/// One item of a provider payload, before normalization.
pub type RawItem = Value;

/// Payload format of a provider, resolved when the registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Web search; a page without `responseData` means no more results.
    WebSearch,
    /// Book search; a page without volumes means no more results.
    BookSearch,
}

/// Configuration for a search provider.
///
/// `endpoint_template` may contain the placeholders `{query}`, `{offset}`
/// and `{page_size}`. The query is URL-encoded on substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Identifier, unique within a registry (e.g. "webSearch").
    pub id: String,
    /// Display label; falls back to the id when empty.
    #[serde(default)]
    pub label: String,
    /// Payload format.
    pub kind: ProviderKind,
    /// Whether the provider takes part in searches that name no providers.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Request URL template.
    pub endpoint_template: String,
    /// Results per page; also the offset stride between pages.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Number of pages requested for every query.
    #[serde(default = "default_max_pages")]
    pub max_pages_per_query: u32,
    /// Offset of the first page.
    #[serde(default = "default_first_offset")]
    pub first_offset: u32,
    /// Per-page request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Image used when a result carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_image: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_page_size() -> u32 {
    10
}

fn default_max_pages() -> u32 {
    1
}

fn default_first_offset() -> u32 {
    1
}

fn default_timeout() -> u64 {
    5
}

impl ProviderConfig {
    /// Creates a configuration with default pagination.
    pub fn new(
        id: impl Into<String>,
        kind: ProviderKind,
        endpoint_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            kind,
            enabled: true,
            endpoint_template: endpoint_template.into(),
            page_size: default_page_size(),
            max_pages_per_query: default_max_pages(),
            first_offset: default_first_offset(),
            timeout: default_timeout(),
            fallback_image: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets page size and page count.
    pub fn with_paging(mut self, page_size: u32, max_pages_per_query: u32) -> Self {
        self.page_size = page_size;
        self.max_pages_per_query = max_pages_per_query;
        self
    }

    /// Sets the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the per-page timeout in seconds.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the fallback image.
    pub fn with_fallback_image(mut self, image: impl Into<String>) -> Self {
        self.fallback_image = Some(image.into());
        self
    }

    /// Display label, or the id when no label is set.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    /// Offset of the page at `page_index` (0-based).
    pub fn page_offset(&self, page_index: u32) -> u32 {
        self.first_offset
            .saturating_add(page_index.saturating_mul(self.page_size))
    }

    /// Builds the request URL for one page.
    pub fn page_url(&self, query: &str, offset: u32) -> Result<Url> {
        let url = self
            .endpoint_template
            .replace("{query}", &urlencoding::encode(query))
            .replace("{offset}", &offset.to_string())
            .replace("{page_size}", &self.page_size.to_string());
        Ok(Url::parse(&url)?)
    }

    /// Checks the configuration for values that cannot produce requests.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(SearchError::Config("provider id cannot be empty".into()));
        }
        if !self.endpoint_template.contains("{query}") {
            return Err(SearchError::Config(format!(
                "provider '{}': endpoint_template has no {{query}} placeholder",
                self.id
            )));
        }
        if self.page_size == 0 && self.max_pages_per_query > 0 {
            return Err(SearchError::Config(format!(
                "provider '{}': page_size must be positive",
                self.id
            )));
        }
        // Placeholders substituted with sample values must yield a valid URL.
        self.page_url("probe", self.first_offset).map_err(|e| {
            SearchError::Config(format!("provider '{}': {}", self.id, e))
        })?;
        Ok(())
    }
}

/// Trait for implementing search providers.
///
/// A provider knows its payload format: how to tell an exhausted page from
/// one with results, where the raw items live, and how to turn one raw item
/// into a [`ResultItem`]. The HTTP side is handled by the
/// [`PageFetcher`](crate::PageFetcher).
pub trait SearchProvider: Send + Sync {
    /// Returns the provider configuration.
    fn config(&self) -> &ProviderConfig;

    /// Returns true when a decoded page signals that no more results exist.
    fn is_exhausted(&self, body: &Value) -> bool;

    /// Extracts the raw items of a non-exhausted page.
    fn raw_items(&self, body: Value) -> Result<Vec<RawItem>>;

    /// Normalizes one raw item; `None` drops it.
    fn map_result(&self, raw: &RawItem) -> Option<ResultItem>;

    /// Classifies a decoded page.
    fn classify(&self, body: Value) -> Result<PageOutcome> {
        if self.is_exhausted(&body) {
            return Ok(PageOutcome::Exhausted);
        }
        Ok(PageOutcome::Success {
            items: self.raw_items(body)?,
        })
    }

    /// Returns the provider id.
    fn id(&self) -> &str {
        &self.config().id
    }

    /// Returns the display label.
    fn label(&self) -> &str {
        self.config().display_label()
    }

    /// Returns whether the provider is enabled by default.
    fn is_enabled(&self) -> bool {
        self.config().enabled
    }
}
