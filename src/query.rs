//! Search request as entered by the user.

use serde::{Deserialize, Serialize};

use crate::{Result, SearchError};

/// A search request: the query text and the providers selected for it.
///
/// Read once when a session starts; later edits do not affect a running
/// session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search terms.
    pub query: String,
    /// Selected provider ids. Empty selects every enabled provider.
    #[serde(default)]
    pub providers: Vec<String>,
}

impl SearchQuery {
    /// Creates a new search query with the given terms.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            providers: Vec::new(),
        }
    }

    /// Sets the selected providers.
    pub fn with_providers(mut self, providers: Vec<String>) -> Self {
        self.providers = providers;
        self
    }

    /// Returns the trimmed search terms.
    pub fn terms(&self) -> &str {
        self.query.trim()
    }

    /// Rejects queries with no search terms.
    pub fn validate(&self) -> Result<()> {
        if self.terms().is_empty() {
            return Err(SearchError::InvalidQuery("Query cannot be empty".into()));
        }
        Ok(())
    }
}
