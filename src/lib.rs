//! # fearch
//!
//! A federated search library: one query fans out to several independent
//! search providers, each queried for several pages at once, and each
//! provider's results are delivered on their own as soon as its pages have
//! settled.
//!
//! - Concurrent page fetches per provider, collected in settlement order
//! - Provider-specific "no more results" detection
//! - Failed pages are dropped without affecting other pages or providers
//! - Exactly one result delivery per provider and session
//! - Starting a new search silences the previous one
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fearch::{PageFetcher, ProviderRegistry, ProviderResults, SearchQuery, SessionController};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = Arc::new(ProviderRegistry::with_defaults());
//!     let controller = SessionController::new(registry, PageFetcher::http()?);
//!
//!     let (tx, mut rx) = mpsc::unbounded_channel::<ProviderResults>();
//!     controller.start_search(&SearchQuery::new("rust programming"), Arc::new(tx))?;
//!
//!     while let Some(results) = rx.recv().await {
//!         println!("{}: {} results", results.label, results.count);
//!     }
//!     Ok(())
//! }
//! ```

mod aggregator;
mod coordinator;
mod error;
mod fetcher;
mod provider;
mod query;
mod registry;
mod result;
mod session;
mod transport;
mod transport_http;

pub mod providers;
pub mod render;

#[cfg(test)]
mod testing;

pub use aggregator::ProviderAggregator;
pub use coordinator::{FanOutCoordinator, FanOutHandle};
pub use error::{Result, SearchError};
pub use fetcher::{PageFetcher, PageOutcome};
pub use provider::{ProviderConfig, ProviderKind, RawItem, SearchProvider};
pub use query::SearchQuery;
pub use registry::{ProviderRegistry, RegistryConfig};
pub use render::RenderSurface;
pub use result::{ProviderResultSet, ProviderResults, ResultItem};
pub use session::{SearchSession, SessionController, SessionToken, SessionTokens};
pub use transport::Transport;
pub use transport_http::HttpTransport;
