//! Built-in search provider implementations.

mod books;
mod web;

use std::sync::Arc;

use scraper::Html;

use crate::{ProviderConfig, ProviderKind, SearchProvider};

pub use books::BookSearch;
pub use web::WebSearch;

/// Builds the provider implementation matching `config.kind`.
pub fn from_config(config: ProviderConfig) -> Arc<dyn SearchProvider> {
    match config.kind {
        ProviderKind::WebSearch => Arc::new(WebSearch::with_config(config)),
        ProviderKind::BookSearch => Arc::new(BookSearch::with_config(config)),
    }
}

/// Reduces an HTML fragment to its text content.
pub(crate) fn html_to_text(fragment: &str) -> String {
    if !fragment.contains('<') && !fragment.contains('&') {
        return fragment.trim().to_string();
    }
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}
