//! Fan-out of one session across its providers.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::render::RenderSurface;
use crate::session::SearchSession;
use crate::{ProviderAggregator, ProviderResults};

/// Starts one aggregator run per provider of a session.
///
/// Each provider renders as soon as its own pages have settled; there is no
/// barrier across providers.
#[derive(Clone)]
pub struct FanOutCoordinator {
    aggregator: Arc<ProviderAggregator>,
}

impl FanOutCoordinator {
    /// Creates a coordinator sharing `aggregator` across runs.
    pub fn new(aggregator: Arc<ProviderAggregator>) -> Self {
        Self { aggregator }
    }

    /// Spawns a run for every provider of `session`.
    ///
    /// Results are rendered on `surface` only while the session token is
    /// current. Must be called from within a Tokio runtime.
    ///
    /// A stale session never renders on a current-thread runtime. On a
    /// multi-thread runtime the staleness check and the render are not
    /// atomic, so a session superseded between the two can still render once.
    pub fn start_all(
        &self,
        session: SearchSession,
        surface: Arc<dyn RenderSurface>,
    ) -> FanOutHandle {
        let query: Arc<str> = Arc::from(session.query());
        let tasks = session
            .providers()
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let aggregator = Arc::clone(&self.aggregator);
                let surface = Arc::clone(&surface);
                let token = session.token().clone();
                let query = Arc::clone(&query);

                tokio::spawn(async move {
                    let id = provider.id();
                    let Some(items) = aggregator
                        .run_in_session(provider.as_ref(), &query, &token)
                        .await
                    else {
                        debug!(
                            "Provider {} results discarded: session {} is stale",
                            id,
                            token.generation()
                        );
                        return;
                    };
                    if !token.is_current() {
                        debug!(
                            "Provider {} results discarded: session {} is stale",
                            id,
                            token.generation()
                        );
                        return;
                    }
                    surface.render(ProviderResults::new(id, provider.label(), items));
                })
            })
            .collect();

        FanOutHandle { tasks }
    }
}

/// Handles of the provider runs of one session.
///
/// Dropping it leaves the runs going; [`wait`](Self::wait) lets a host
/// process stay alive until every provider has settled.
#[derive(Debug)]
pub struct FanOutHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl FanOutHandle {
    /// Number of provider runs.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the session had no providers.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits until every provider run has finished.
    pub async fn wait(self) {
        for outcome in join_all(self.tasks).await {
            if let Err(e) = outcome {
                warn!("Provider task failed: {}", e);
            }
        }
    }
}
