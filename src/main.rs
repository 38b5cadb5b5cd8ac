//! Fearch CLI - federated search from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use fearch::{
    PageFetcher, ProviderRegistry, ProviderResults, RenderSurface, SearchQuery, SessionController,
};

/// Fearch - search several providers with one query
#[derive(Parser)]
#[command(name = "fearch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Provider configuration file (TOML); built-in providers when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the selected providers
    Search(SearchArgs),

    /// List configured providers
    Providers,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Providers to use (comma-separated ids); all enabled when omitted
    #[arg(short, long, value_delimiter = ',')]
    providers: Option<Vec<String>>,

    /// Maximum number of results to display per provider
    #[arg(short, long, default_value = "10")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// One JSON object per provider
    Json,
    /// Compact single-line output
    Compact,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "fearch=debug" } else { "fearch=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let registry = match &cli.config {
        Some(path) => ProviderRegistry::load(path)?,
        None => ProviderRegistry::with_defaults(),
    };

    match cli.command {
        Commands::Search(args) => run_search(registry, args).await,
        Commands::Providers => list_providers(&registry),
    }
}

fn list_providers(registry: &ProviderRegistry) -> Result<()> {
    println!("Configured providers:\n");
    for provider in registry.iter() {
        let config = provider.config();
        println!(
            "  {:<12} {:<16} {} pages x {}{}",
            provider.id(),
            provider.label(),
            config.max_pages_per_query,
            config.page_size,
            if provider.is_enabled() { "" } else { "  (disabled)" }
        );
    }
    println!();
    println!("Usage: fearch search \"query\" -p webSearch,bookSearch");
    Ok(())
}

async fn run_search(registry: ProviderRegistry, args: SearchArgs) -> Result<()> {
    let controller = SessionController::new(Arc::new(registry), PageFetcher::http()?);

    let query = SearchQuery::new(&args.query).with_providers(args.providers.unwrap_or_default());
    let surface = Arc::new(StdoutSurface {
        format: args.format,
        limit: args.limit,
    });

    let handle = controller.start_search(&query, surface)?;
    if matches!(args.format, OutputFormat::Text) {
        println!("\nSearch results for \"{}\":", query.terms());
    }
    handle.wait().await;
    Ok(())
}

/// Prints each provider's results as they arrive.
struct StdoutSurface {
    format: OutputFormat,
    limit: usize,
}

impl RenderSurface for StdoutSurface {
    fn render(&self, mut results: ProviderResults) {
        // The count keeps reporting the full set.
        results.items.truncate(self.limit);
        let mut out = String::new();

        match self.format {
            OutputFormat::Text => {
                out.push_str(&format!("\n== {} ({} results) ==\n\n", results.label, results.count));
                for (i, item) in results.items.iter().enumerate() {
                    out.push_str(&format!("{}. {}\n", i + 1, item.title));
                    out.push_str(&format!("   URL: {}\n", item.url));
                    if let Some(author) = &item.author {
                        out.push_str(&format!("   Author: {}\n", author));
                    }
                    if !item.snippet.is_empty() {
                        out.push_str(&format!("   {}\n", truncate(&item.snippet, 150)));
                    }
                    out.push('\n');
                }
            }
            OutputFormat::Json => {
                match serde_json::to_string(&results) {
                    Ok(json) => out.push_str(&format!("{}\n", json)),
                    Err(e) => tracing::warn!("Cannot encode {} results: {}", results.provider, e),
                }
            }
            OutputFormat::Compact => {
                for item in &results.items {
                    out.push_str(&format!("{}\t{}\t{}\n", results.provider, item.title, item.url));
                }
            }
        }

        print!("{}", out);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
