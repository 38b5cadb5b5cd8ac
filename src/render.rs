//! Rendering surface for per-provider results.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::ProviderResults;

/// Receives the final results of each provider.
///
/// Called once per provider per session, from whichever task finished that
/// provider, in no particular order relative to other providers.
pub trait RenderSurface: Send + Sync {
    /// Displays the results of one provider.
    fn render(&self, results: ProviderResults);
}

/// Forwards results into a channel, for hosts that consume them as a stream.
impl RenderSurface for UnboundedSender<ProviderResults> {
    fn render(&self, results: ProviderResults) {
        if let Err(e) = self.send(results) {
            debug!("Dropping results for {}: receiver closed", e.0.provider);
        }
    }
}
