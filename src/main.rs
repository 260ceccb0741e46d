use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use genius_artists::config::{GeniusConfig, ACCESS_TOKEN_ENV, DEFAULT_BASE_URL};
use genius_artists::progress::ProgressMode;
use genius_artists::resolver::DEFAULT_PAGE_SIZE;
use genius_artists::{resolve_batch, ArtistResolver, GeniusClient};

/// Terms resolved when none are given on the command line.
const DEMO_TERMS: [&str; 4] = ["Rihanna", "Seal", "U2", "Fall Out Boy"];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "genius-artists")]
#[command(about = "Resolve artist names against the Genius API and print a summary table")]
struct Args {
    /// Artist names to resolve (defaults to a small demo list)
    terms: Vec<String>,

    /// Genius API access token
    #[arg(long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Search hits considered per term
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    per_page: u32,

    #[arg(long, value_enum, default_value = "table")]
    format: Format,

    /// Also write the table as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Hide the progress bar and log progress lines instead
    #[arg(long)]
    log_only: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut clog = colog::default_builder();
    clog.filter(
        None,
        if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
    );
    clog.init();

    let config = GeniusConfig::from_env(args.token.clone())
        .and_then(|c| c.with_base_url(&args.base_url))
        .context("Failed to configure Genius client")?
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let client = GeniusClient::new(config).context("Failed to create Genius client")?;
    let resolver = ArtistResolver::new(client).with_page_size(args.per_page);

    let terms: Vec<String> = if args.terms.is_empty() {
        info!("No terms given, resolving demo list");
        DEMO_TERMS.iter().map(|t| t.to_string()).collect()
    } else {
        args.terms.clone()
    };

    let table = resolve_batch(&resolver, &terms, ProgressMode::from_log_only(args.log_only));

    match args.format {
        Format::Table => println!("{}", table),
        Format::Json => println!("{}", table.to_json()?),
    }

    if let Some(path) = &args.output {
        table
            .write_json(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} rows to {}", table.len(), path.display());
    }

    Ok(())
}
