//! Provider registry and its configuration file.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::{self, BookSearch, WebSearch};
use crate::{ProviderConfig, Result, SearchError, SearchProvider};

/// Contents of a provider configuration file.
///
/// ```toml
/// [[providers]]
/// id = "bookSearch"
/// label = "Book Search"
/// kind = "book_search"
/// endpoint_template = "https://www.googleapis.com/books/v1/volumes?q={query}&startIndex={offset}&maxResults={page_size}"
/// page_size = 40
/// max_pages_per_query = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Providers in registration order.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Registered providers, keyed by id, in registration order.
///
/// Populated once at startup and read-only afterwards; share it behind an
/// `Arc`.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SearchProvider>>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.id()))
            .finish()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in web and book providers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(Arc::new(WebSearch::new()));
        registry.insert(Arc::new(BookSearch::new()));
        registry
    }

    /// Builds a registry from configuration.
    pub fn from_config(config: RegistryConfig) -> Result<Self> {
        if config.providers.is_empty() {
            return Err(SearchError::Config("no providers configured".into()));
        }
        let mut registry = Self::new();
        for provider in config.providers {
            registry.register_arc(providers::from_config(provider))?;
        }
        Ok(registry)
    }

    /// Parses a TOML configuration and builds a registry from it.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: RegistryConfig = toml::from_str(raw)
            .map_err(|e| SearchError::Config(format!("invalid provider file: {e}")))?;
        Self::from_config(config)
    }

    /// Loads a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        debug!("Loading providers from {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Registers a provider.
    pub fn register<P: SearchProvider + 'static>(&mut self, provider: P) -> Result<()> {
        self.register_arc(Arc::new(provider))
    }

    /// Registers a shared provider, validating its configuration.
    pub fn register_arc(&mut self, provider: Arc<dyn SearchProvider>) -> Result<()> {
        provider.config().validate()?;
        if self.index.contains_key(provider.id()) {
            return Err(SearchError::DuplicateProvider(provider.id().to_string()));
        }
        self.insert(provider);
        Ok(())
    }

    fn insert(&mut self, provider: Arc<dyn SearchProvider>) {
        self.index
            .insert(provider.id().to_string(), self.providers.len());
        self.providers.push(provider);
    }

    /// Looks up a provider by id.
    pub fn get(&self, id: &str) -> Result<Arc<dyn SearchProvider>> {
        self.index
            .get(id)
            .map(|&i| Arc::clone(&self.providers[i]))
            .ok_or_else(|| SearchError::ProviderNotFound(id.to_string()))
    }

    /// Returns the enabled providers in registration order.
    pub fn list_enabled(&self) -> Vec<Arc<dyn SearchProvider>> {
        self.providers
            .iter()
            .filter(|p| p.is_enabled())
            .cloned()
            .collect()
    }

    /// Resolves a provider selection.
    ///
    /// An empty selection means every enabled provider. Otherwise the named
    /// providers are returned in registration order, whether or not they are
    /// enabled by default; an unknown id is an error.
    pub fn select(&self, ids: &[String]) -> Result<Vec<Arc<dyn SearchProvider>>> {
        if ids.is_empty() {
            return Ok(self.list_enabled());
        }
        let mut positions = ids
            .iter()
            .map(|id| {
                self.index
                    .get(id.as_str())
                    .copied()
                    .ok_or_else(|| SearchError::ProviderNotFound(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        positions.sort_unstable();
        positions.dedup();
        Ok(positions
            .into_iter()
            .map(|i| Arc::clone(&self.providers[i]))
            .collect())
    }

    /// Iterates over all providers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SearchProvider>> {
        self.providers.iter()
    }

    /// Returns the number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{book_config, web_config};
    use crate::ProviderKind;
    use std::io::Write;

    fn ids(providers: &[Arc<dyn SearchProvider>]) -> Vec<&str> {
        providers.iter().map(|p| p.id()).collect()
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.len(), 2);
        assert_eq!(ids(&registry.list_enabled()), vec!["webSearch", "bookSearch"]);
    }

    #[test]
    fn test_get_known_and_unknown() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.get("bookSearch").unwrap().label(), "Book Search");
        assert!(matches!(
            registry.get("news"),
            Err(SearchError::ProviderNotFound(id)) if id == "news"
        ));
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut registry = ProviderRegistry::with_defaults();
        let err = registry.register(WebSearch::new()).unwrap_err();
        assert!(matches!(err, SearchError::DuplicateProvider(_)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_rejects_invalid_config() {
        let mut registry = ProviderRegistry::new();
        let config = ProviderConfig::new("bad", ProviderKind::WebSearch, "https://x.test/");
        assert!(registry.register(WebSearch::with_config(config)).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_enabled_skips_disabled_in_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(WebSearch::with_config(web_config("a", 4, 1))).unwrap();
        registry
            .register(BookSearch::with_config(book_config("b", 40, 1).with_enabled(false)))
            .unwrap();
        registry.register(WebSearch::with_config(web_config("c", 4, 1))).unwrap();
        assert_eq!(ids(&registry.list_enabled()), vec!["a", "c"]);
        assert_eq!(registry.iter().count(), 3);
    }

    #[test]
    fn test_select_empty_uses_enabled() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(ids(&registry.select(&[]).unwrap()), vec!["webSearch", "bookSearch"]);
    }

    #[test]
    fn test_select_keeps_registration_order_and_dedups() {
        let registry = ProviderRegistry::with_defaults();
        let selection = vec![
            "bookSearch".to_string(),
            "webSearch".to_string(),
            "bookSearch".to_string(),
        ];
        assert_eq!(ids(&registry.select(&selection).unwrap()), vec!["webSearch", "bookSearch"]);
    }

    #[test]
    fn test_select_includes_disabled_when_named() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(BookSearch::with_config(book_config("b", 40, 1).with_enabled(false)))
            .unwrap();
        assert!(registry.select(&[]).unwrap().is_empty());
        assert_eq!(ids(&registry.select(&["b".to_string()]).unwrap()), vec!["b"]);
    }

    #[test]
    fn test_select_unknown_fails() {
        let registry = ProviderRegistry::with_defaults();
        let selection = vec!["webSearch".to_string(), "images".to_string()];
        assert!(matches!(
            registry.select(&selection),
            Err(SearchError::ProviderNotFound(id)) if id == "images"
        ));
    }

    #[test]
    fn test_from_toml_str() {
        let raw = r#"
            [[providers]]
            id = "web"
            label = "The Web"
            kind = "web_search"
            endpoint_template = "https://web.test/search?q={query}&start={offset}"
            page_size = 4
            max_pages_per_query = 20

            [[providers]]
            id = "books"
            kind = "book_search"
            enabled = false
            endpoint_template = "https://books.test/v?q={query}&startIndex={offset}&maxResults={page_size}"
            page_size = 40
            max_pages_per_query = 2
            timeout = 10
            fallback_image = "https://img.test/none.png"
        "#;
        let registry = ProviderRegistry::from_toml_str(raw).unwrap();
        assert_eq!(registry.len(), 2);

        let web = registry.get("web").unwrap();
        assert_eq!(web.label(), "The Web");
        assert_eq!(web.config().max_pages_per_query, 20);

        let books = registry.get("books").unwrap();
        assert_eq!(books.label(), "books");
        assert!(!books.is_enabled());
        assert_eq!(books.config().timeout, 10);
        assert_eq!(books.config().kind, ProviderKind::BookSearch);
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_kind() {
        let raw = r#"
            [[providers]]
            id = "x"
            kind = "image_search"
            endpoint_template = "https://x.test/?q={query}"
        "#;
        assert!(matches!(
            ProviderRegistry::from_toml_str(raw),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn test_from_toml_str_rejects_duplicates() {
        let raw = r#"
            [[providers]]
            id = "x"
            kind = "web_search"
            endpoint_template = "https://x.test/?q={query}"

            [[providers]]
            id = "x"
            kind = "book_search"
            endpoint_template = "https://y.test/?q={query}"
        "#;
        assert!(matches!(
            ProviderRegistry::from_toml_str(raw),
            Err(SearchError::DuplicateProvider(_))
        ));
    }

    #[test]
    fn test_from_config_rejects_empty() {
        assert!(matches!(
            ProviderRegistry::from_config(RegistryConfig::default()),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[[providers]]
id = "web"
kind = "web_search"
endpoint_template = "https://web.test/search?q={{query}}&start={{offset}}"
"#
        )
        .unwrap();

        let registry = ProviderRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("web").is_ok());
    }

    #[test]
    fn test_registry_debug_lists_ids() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(format!("{:?}", registry), r#"["webSearch", "bookSearch"]"#);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProviderRegistry::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
