//! Book search provider (volumes API payloads).

use serde::Deserialize;
use serde_json::Value;

use super::html_to_text;
use crate::{ProviderConfig, ProviderKind, RawItem, Result, ResultItem, SearchError, SearchProvider};

const DEFAULT_ENDPOINT: &str =
    "https://www.googleapis.com/books/v1/volumes?q={query}&startIndex={offset}&maxResults={page_size}";

/// Book search provider.
///
/// Pages look like `{"totalItems": n, "items": [...]}`. An empty `items`
/// array means the result list is exhausted; the API also drops the field
/// entirely past the last volume, which is treated the same way.
pub struct BookSearch {
    config: ProviderConfig,
}

impl BookSearch {
    /// Creates a new book search provider with the default endpoint.
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    /// Creates with custom configuration.
    pub fn with_config(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// Default configuration: 2 pages of 40 volumes.
    pub fn default_config() -> ProviderConfig {
        ProviderConfig::new("bookSearch", ProviderKind::BookSearch, DEFAULT_ENDPOINT)
            .with_label("Book Search")
            .with_paging(40, 2)
    }
}

impl Default for BookSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: VolumeInfo,
    #[serde(default)]
    search_info: Option<SearchInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    info_link: Option<String>,
    #[serde(default)]
    canonical_volume_link: Option<String>,
    #[serde(default)]
    image_links: Option<ImageLinks>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    #[serde(default)]
    small_thumbnail: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInfo {
    #[serde(default)]
    text_snippet: Option<String>,
}

impl SearchProvider for BookSearch {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn is_exhausted(&self, body: &Value) -> bool {
        match body.get("items") {
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::Null) | None => true,
            Some(_) => false,
        }
    }

    fn raw_items(&self, mut body: Value) -> Result<Vec<RawItem>> {
        match body.get_mut("items").map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            other => Err(SearchError::MalformedResponse(format!(
                "items is not an array: {}",
                other.unwrap_or(Value::Null)
            ))),
        }
    }

    fn map_result(&self, raw: &RawItem) -> Option<ResultItem> {
        let volume = Volume::deserialize(raw).ok()?;
        let info = volume.volume_info;
        if info.title.is_empty() {
            return None;
        }

        let url = info
            .info_link
            .or(info.canonical_volume_link)
            .unwrap_or_default();
        let snippet = volume
            .search_info
            .and_then(|s| s.text_snippet)
            .or(info.description)
            .map(|s| html_to_text(&s))
            .unwrap_or_default();

        let mut item = ResultItem::new(info.title, url, snippet);
        let image = info
            .image_links
            .and_then(|links| links.small_thumbnail.or(links.thumbnail))
            .or_else(|| self.config.fallback_image.clone());
        if let Some(image) = image {
            item = item.with_image(image);
        }
        if let Some(author) = info.authors.into_iter().next() {
            item = item.with_author(author);
        }
        Some(item)
    }
}
