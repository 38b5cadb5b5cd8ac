//! Example: Federated search across the built-in providers.

use std::sync::Arc;

use fearch::{PageFetcher, ProviderRegistry, ProviderResults, SearchQuery, SessionController};
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let registry = Arc::new(ProviderRegistry::with_defaults());
    println!("Configured {} search providers", registry.len());

    let controller = SessionController::new(registry, PageFetcher::http()?);

    let query = SearchQuery::new("dune frank herbert");
    println!("Searching for: {}", query.query);

    // Each provider arrives on the channel as soon as all of its pages settle.
    let (tx, mut rx) = mpsc::unbounded_channel::<ProviderResults>();
    controller.start_search(&query, Arc::new(tx))?;

    while let Some(results) = rx.recv().await {
        println!();
        println!("{} ({} results)", results.label, results.count);
        for (i, item) in results.items.iter().take(5).enumerate() {
            println!("{}. {}", i + 1, item.title);
            println!("   URL: {}", item.url);
            if let Some(author) = &item.author {
                println!("   Author: {}", author);
            }
        }
    }

    Ok(())
}
