//! Test doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use crate::render::RenderSurface;
use crate::transport::Transport;
use crate::{ProviderConfig, ProviderKind, ProviderResults, Result, SearchError};

/// Scripted reply for one page URL.
#[derive(Clone)]
pub(crate) enum Reply {
    Json(Value),
    Body(String),
    Status(u16),
}

/// In-memory transport answering exact URLs, optionally after a delay.
/// Unscripted URLs answer 404.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: HashMap<String, (Reply, Duration)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(
        self,
        config: &ProviderConfig,
        query: &str,
        page_index: u32,
        reply: Reply,
    ) -> Self {
        self.page_after(config, query, page_index, 0, reply)
    }

    pub(crate) fn page_after(
        mut self,
        config: &ProviderConfig,
        query: &str,
        page_index: u32,
        delay_ms: u64,
        reply: Reply,
    ) -> Self {
        let url = config
            .page_url(query, config.page_offset(page_index))
            .unwrap()
            .to_string();
        self.routes.insert(url, (reply, Duration::from_millis(delay_ms)));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        let Some((reply, delay)) = self.routes.get(url.as_str()).cloned() else {
            return Err(SearchError::Status(404));
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Json(value) => Ok(value.to_string()),
            Reply::Body(body) => Ok(body),
            Reply::Status(code) => Err(SearchError::Status(code)),
        }
    }
}

/// Surface that records every render call.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    renders: Mutex<Vec<ProviderResults>>,
}

impl RecordingSurface {
    pub(crate) fn renders(&self) -> Vec<ProviderResults> {
        self.renders.lock().unwrap().clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn render(&self, results: ProviderResults) {
        self.renders.lock().unwrap().push(results);
    }
}

pub(crate) fn web_config(id: &str, page_size: u32, pages: u32) -> ProviderConfig {
    ProviderConfig::new(
        id,
        ProviderKind::WebSearch,
        format!("https://{}.test/search?q={{query}}&start={{offset}}", id.to_lowercase()),
    )
    .with_paging(page_size, pages)
}

pub(crate) fn book_config(id: &str, page_size: u32, pages: u32) -> ProviderConfig {
    ProviderConfig::new(
        id,
        ProviderKind::BookSearch,
        format!(
            "https://{}.test/volumes?q={{query}}&startIndex={{offset}}&maxResults={{page_size}}",
            id.to_lowercase()
        ),
    )
    .with_paging(page_size, pages)
}

/// Web page payload whose results are titled `{prefix} {n}`.
pub(crate) fn web_page(prefix: &str, range: std::ops::Range<usize>) -> Reply {
    let results: Vec<Value> = range
        .map(|n| {
            json!({
                "url": format!("https://example.com/{}/{n}", prefix.to_lowercase()),
                "titleNoFormatting": format!("{prefix} {n}"),
                "content": "snippet"
            })
        })
        .collect();
    Reply::Json(json!({"responseData": {"results": results}, "responseStatus": 200}))
}

pub(crate) fn web_exhausted() -> Reply {
    Reply::Json(json!({"responseData": null, "responseStatus": 400}))
}

/// Book page payload with `count` volumes titled `{prefix} {n}`.
pub(crate) fn book_page(prefix: &str, count: usize) -> Reply {
    let items: Vec<Value> = (0..count)
        .map(|n| {
            json!({
                "volumeInfo": {
                    "title": format!("{prefix} {n}"),
                    "authors": ["A. Author"],
                    "infoLink": format!("https://books.example.com/{n}")
                }
            })
        })
        .collect();
    Reply::Json(json!({"totalItems": count, "items": items}))
}

pub(crate) fn book_exhausted() -> Reply {
    Reply::Json(json!({"totalItems": 0, "items": []}))
}

pub(crate) fn titles(items: &[crate::ResultItem]) -> Vec<String> {
    items.iter().map(|i| i.title.clone()).collect()
}
