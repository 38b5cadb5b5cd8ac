//! Search sessions and the controller that starts them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::coordinator::{FanOutCoordinator, FanOutHandle};
use crate::render::RenderSurface;
use crate::{
    PageFetcher, ProviderAggregator, ProviderRegistry, Result, SearchError, SearchProvider,
    SearchQuery,
};

/// Issues session tokens. Issuing a token makes every earlier one stale.
#[derive(Debug, Clone, Default)]
pub struct SessionTokens {
    current: Arc<AtomicU64>,
}

impl SessionTokens {
    /// Creates a new token source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for a new session.
    pub fn issue(&self) -> SessionToken {
        let generation = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        SessionToken {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    /// Makes every issued token stale without starting a session.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::AcqRel);
    }
}

/// Identity of one search session.
#[derive(Debug, Clone)]
pub struct SessionToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl SessionToken {
    /// Generation number of this session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true while no newer session has been issued.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.generation
    }
}

/// One user-initiated search across the selected providers.
pub struct SearchSession {
    token: SessionToken,
    query: String,
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl SearchSession {
    /// Creates a session.
    pub fn new(
        token: SessionToken,
        query: impl Into<String>,
        providers: Vec<Arc<dyn SearchProvider>>,
    ) -> Self {
        Self {
            token,
            query: query.into(),
            providers,
        }
    }

    /// The session token.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// The search terms.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Providers taking part, in registration order.
    pub fn providers(&self) -> &[Arc<dyn SearchProvider>] {
        &self.providers
    }

    /// Ids of the providers taking part.
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }
}

/// Starts search sessions and keeps only the latest one live.
///
/// Starting a search makes results of any earlier session stale; their
/// fetches finish in the background but nothing more is rendered for them.
pub struct SessionController {
    registry: Arc<ProviderRegistry>,
    coordinator: FanOutCoordinator,
    tokens: SessionTokens,
}

impl SessionController {
    /// Creates a controller over a registry, fetching with `fetcher`.
    pub fn new(registry: Arc<ProviderRegistry>, fetcher: PageFetcher) -> Self {
        let aggregator = Arc::new(ProviderAggregator::new(fetcher));
        Self {
            registry,
            coordinator: FanOutCoordinator::new(aggregator),
            tokens: SessionTokens::new(),
        }
    }

    /// Returns the provider registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Sets up a session for `query`.
    ///
    /// Fails without touching the current session when the query is blank,
    /// names an unknown provider, or selects no provider.
    pub fn open_session(&self, query: &SearchQuery) -> Result<SearchSession> {
        query.validate()?;
        let providers = self.registry.select(&query.providers)?;
        if providers.is_empty() {
            return Err(SearchError::NoProviders);
        }

        let token = self.tokens.issue();
        let session = SearchSession::new(token, query.terms(), providers);
        info!(
            "Session {} searching {:?} for '{}'",
            session.token().generation(),
            session.provider_ids(),
            session.query()
        );
        Ok(session)
    }

    /// Starts a search, rendering each provider's results on `surface`.
    ///
    /// Must be called from within a Tokio runtime. Earlier sessions stop
    /// rendering once this returns, provided the runtime is current-thread;
    /// see [`FanOutCoordinator::start_all`].
    pub fn start_search(
        &self,
        query: &SearchQuery,
        surface: Arc<dyn RenderSurface>,
    ) -> Result<FanOutHandle> {
        let session = self.open_session(query)?;
        Ok(self.coordinator.start_all(session, surface))
    }

    /// Makes the running session stale, e.g. when the results panel closes.
    pub fn cancel(&self) {
        self.tokens.invalidate();
    }
}
