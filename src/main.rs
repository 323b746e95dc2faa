//! FlickFinder CLI - show a random Flickr photo for a phrase or a place.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use flickfinder::{
    CancellationToken, FlickrConfig, FlickrSearch, PhotoResult, SearchCriteria, SearchOutcome,
    API_KEY_ENV,
};

/// FlickFinder - random Flickr photo search
#[derive(Parser)]
#[command(name = "flickfinder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: Options,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search photos by free-text phrase
    Phrase {
        /// Text to search for
        text: String,
    },

    /// Search photos taken near a latitude/longitude
    Location {
        /// Latitude in [-90, 90]
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in [-180, 180]
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
    },
}

#[derive(Args)]
struct Options {
    /// Flickr API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Write the image to this file
    #[arg(short, long, global = true, conflicts_with = "url_only")]
    output: Option<PathBuf>,

    /// Only resolve the image URL, do not download it
    #[arg(long, global = true)]
    url_only: bool,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "30", global = true)]
    timeout: u64,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose || std::env::var_os("RUST_LOG").is_some() {
        let filter = if cli.verbose {
            EnvFilter::new("flickfinder=debug")
        } else {
            EnvFilter::from_default_env()
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let criteria = match &cli.command {
        Commands::Phrase { text } => SearchCriteria::phrase(text.as_str()),
        Commands::Location { lat, lon } => match SearchCriteria::location_from_text(lat, lon) {
            Ok(criteria) => criteria,
            Err(e) => anyhow::bail!("{}", e.user_message()),
        },
    };

    run_search(criteria, cli.options).await
}

async fn run_search(criteria: SearchCriteria, options: Options) -> Result<()> {
    let api_key = options
        .api_key
        .clone()
        .with_context(|| format!("No API key given; pass --api-key or set {}", API_KEY_ENV))?;

    let config = FlickrConfig::new(api_key)
        .with_timeout(options.timeout)
        .with_fetch_image(!options.url_only);
    let search = FlickrSearch::new(config)?;

    let (tx, mut rx) = mpsc::channel(4);
    let cancel = CancellationToken::new();

    let worker = {
        let cancel = cancel.clone();
        tokio::spawn(async move { search.run(criteria, cancel, tx).await })
    };

    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut outcome = Ok(());
    while let Some(event) = rx.recv().await {
        match event {
            SearchOutcome::Started => {
                if matches!(options.format, OutputFormat::Text) {
                    eprintln!("Searching...");
                }
            }
            SearchOutcome::Completed(photo) => {
                outcome = render_photo(&photo, &options);
            }
            SearchOutcome::Failed { message, error } => {
                tracing::debug!("Search failed: {}", error);
                outcome = Err(anyhow::anyhow!(message));
            }
        }
    }

    ctrl_c.abort();
    worker.await?;
    outcome
}

fn render_photo(photo: &PhotoResult, options: &Options) -> Result<()> {
    if let (Some(path), Some(bytes)) = (&options.output, photo.image_bytes()) {
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write image to {}", path.display()))?;
    }

    match options.format {
        OutputFormat::Text => {
            let title = if photo.title.is_empty() {
                "(untitled)"
            } else {
                photo.title.as_str()
            };
            println!("{}", title);
            println!("   URL: {}", photo.image_url);
            println!("   Page: {}", photo.page);
            if let Some(bytes) = photo.image_bytes() {
                println!("   Image: {} bytes", bytes.len());
            }
            if let Some(path) = &options.output {
                if photo.image_bytes().is_some() {
                    println!("   Saved to: {}", path.display());
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(photo)?);
        }
    }

    Ok(())
}
