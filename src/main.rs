//! gif-search CLI - browse GIPHY results from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use gif_search::{Aggregator, GiphyClient, ProviderConfig, SessionState, Severity};

/// gif-search - paginated GIPHY search
#[derive(Parser)]
#[command(name = "gif-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GIPHY API key (defaults to $GIPHY_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Search GIFs by keyword
    Search(SearchArgs),

    /// Show the trending feed
    Trending(PageArgs),

    /// Show a small random sample (falls back to trending)
    Sample,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    #[command(flatten)]
    pages: PageArgs,
}

#[derive(Parser)]
struct PageArgs {
    /// Number of pages to load
    #[arg(short, long, default_value = "1")]
    pages: usize,

    /// Maximum number of results to display
    #[arg(short, long)]
    limit: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let mut config = ProviderConfig::from_env();
    if let Some(key) = cli.api_key {
        config = config.with_api_key(key);
    }
    if config.api_key().is_none() {
        anyhow::bail!("Missing GIPHY API key (pass --api-key or set GIPHY_API_KEY)");
    }
    let aggregator = Aggregator::new(GiphyClient::new(config)?);
    tracing::debug!(
        "Page width {}, up to {} attempts per continuation",
        aggregator.config().page_size,
        aggregator.config().max_attempts
    );

    let (state, limit) = match cli.command {
        Commands::Search(args) => (
            run_search(&aggregator, &args.query, args.pages.pages).await,
            args.pages.limit,
        ),
        Commands::Trending(args) => (run_search(&aggregator, "", args.pages).await, args.limit),
        Commands::Sample => (aggregator.load_initial().await, None),
    };

    print_state(&state, limit, cli.format)?;

    match &state.error {
        Some(error) if error.severity == Severity::Error => anyhow::bail!("{}", error.message),
        _ => Ok(()),
    }
}

async fn run_search(aggregator: &Aggregator, query: &str, pages: usize) -> SessionState {
    let mut state = aggregator.search(query, true).await;
    for _ in 1..pages {
        if !state.has_more {
            break;
        }
        state = aggregator.load_more().await;
    }
    state
}

fn print_state(state: &SessionState, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    let limit = limit.unwrap_or(state.len());
    match format {
        OutputFormat::Text => {
            let label = if state.active_query.is_trending() {
                "trending".to_string()
            } else {
                format!("\"{}\"", state.active_query)
            };
            println!(
                "\nResults for {} ({} shown of {} reported{}):\n",
                label,
                state.len(),
                state.total_count,
                if state.has_more { ", more available" } else { "" }
            );

            for (i, gif) in state.gifs.iter().take(limit).enumerate() {
                println!("{}. {}", i + 1, gif.title);
                println!("   URL: {}", gif.url);
                if let Some(preview) = gif.fixed_height() {
                    println!("   Preview: {} ({}x{})", preview.url, preview.width, preview.height);
                }
                println!();
            }

            if let Some(error) = &state.error {
                if error.severity == Severity::Info {
                    eprintln!("Note: {}", error.message);
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = state.gifs.iter().take(limit).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Compact => {
            for gif in state.gifs.iter().take(limit) {
                println!("{}\t{}\t{}", gif.id, gif.title, gif.url);
            }
        }
    }
    Ok(())
}
