//! Web search provider (AJAX search API payloads).

use serde::Deserialize;
use serde_json::Value;

use super::html_to_text;
use crate::{ProviderConfig, ProviderKind, RawItem, Result, ResultItem, SearchError, SearchProvider};

const DEFAULT_ENDPOINT: &str =
    "https://ajax.googleapis.com/ajax/services/search/web?v=1.0&q={query}&start={offset}";

/// Web search provider.
///
/// Pages look like `{"responseData": {"results": [...]}}`. A page whose
/// `responseData` is `null` or absent means the result list is exhausted.
pub struct WebSearch {
    config: ProviderConfig,
}

impl WebSearch {
    /// Creates a new web search provider with the default endpoint.
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    /// Creates with custom configuration.
    pub fn with_config(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// Default configuration: 20 pages of 4 results.
    pub fn default_config() -> ProviderConfig {
        ProviderConfig::new("webSearch", ProviderKind::WebSearch, DEFAULT_ENDPOINT)
            .with_label("Web Search")
            .with_paging(4, 20)
    }
}

impl Default for WebSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebHit {
    #[serde(default)]
    url: String,
    #[serde(default)]
    unescaped_url: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    title_no_formatting: Option<String>,
    #[serde(default)]
    content: String,
}

impl SearchProvider for WebSearch {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn is_exhausted(&self, body: &Value) -> bool {
        body.get("responseData").map_or(true, Value::is_null)
    }

    fn raw_items(&self, mut body: Value) -> Result<Vec<RawItem>> {
        let results = body
            .get_mut("responseData")
            .and_then(|data| data.get_mut("results"))
            .map(Value::take);
        match results {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) => Ok(Vec::new()),
            Some(other) => Err(SearchError::MalformedResponse(format!(
                "responseData.results is not an array: {other}"
            ))),
            None => Err(SearchError::MalformedResponse(
                "responseData has no results".into(),
            )),
        }
    }

    fn map_result(&self, raw: &RawItem) -> Option<ResultItem> {
        let hit = WebHit::deserialize(raw).ok()?;

        let url = hit
            .unescaped_url
            .filter(|u| !u.is_empty())
            .unwrap_or(hit.url);
        let title = hit
            .title_no_formatting
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| html_to_text(&hit.title));

        if url.is_empty() || title.is_empty() {
            return None;
        }

        Some(ResultItem::new(title, url, html_to_text(&hit.content)))
    }
}
