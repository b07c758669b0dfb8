//! Map Review Crawler main entry point
//!
//! This is the command-line interface for the place review crawler.

use anyhow::Context;
use clap::Parser;
use map_review_crawler::browser::BrowserSession;
use map_review_crawler::config::{load_config_with_hash, resolve_api_key, Config};
use map_review_crawler::crawler::Coordinator;
use map_review_crawler::export::build_sinks;
use map_review_crawler::input::{load_source_csv, SourceQueue};
use map_review_crawler::output::{print_summary, RunSummary};
use map_review_crawler::search::{Coordinate, PlacesClient};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Map Review Crawler: place metadata and review extraction
///
/// Reads places from a CSV file (default) or discovers them around a
/// coordinate, opens each place page in a headless browser and exports the
/// rating breakdown, location summary, suggested activities and reviews.
#[derive(Parser, Debug)]
#[command(name = "map-review-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Crawls place pages for ratings and reviews", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// CSV file of places to crawl (overrides [input] csv-path)
    #[arg(long, value_name = "CSV", conflicts_with = "nearby")]
    input: Option<PathBuf>,

    /// Discover places around LAT,LNG with the place search API instead of reading CSV
    #[arg(long, value_name = "LAT,LNG")]
    nearby: Option<Coordinate>,

    /// Validate config and show what would be crawled without launching a browser
    #[arg(long)]
    dry_run: bool,
}

/// Where the places of a run come from
enum Source {
    Csv(SourceQueue),
    Nearby(Coordinate),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to read .env: {}", e),
    }

    match run(&cli).await {
        Ok(Some(summary)) => {
            print_summary(&summary);
            ExitCode::from(summary.exit_status())
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("map_review_crawler=info,warn"),
            1 => EnvFilter::new("map_review_crawler=debug,info"),
            2 => EnvFilter::new("map_review_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the pipeline; `None` means a dry run
async fn run(cli: &Cli) -> anyhow::Result<Option<RunSummary>> {
    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    let config = Arc::new(config);

    let input_path = cli
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.input.csv_path));

    let source = match cli.nearby {
        Some(coordinate) => Source::Nearby(coordinate),
        None => Source::Csv(
            load_source_csv(&input_path)
                .with_context(|| format!("failed to read {}", input_path.display()))?,
        ),
    };

    if cli.dry_run {
        handle_dry_run(&config, &source, &input_path);
        return Ok(None);
    }

    let api_key = resolve_api_key(&config.search)?;
    let client = PlacesClient::new(&config.search, api_key)?;
    let sinks = build_sinks(&config.output).context("failed to open export sinks")?;

    let session = BrowserSession::launch(&config.crawler).await?;
    let page = match session.new_page().await {
        Ok(page) => page,
        Err(e) => {
            if let Err(close_err) = session.close().await {
                tracing::warn!("Failed to close browser: {}", close_err);
            }
            return Err(e.into());
        }
    };

    let mut coordinator = Coordinator::new(Arc::clone(&config), page, sinks);
    let outcome = match &source {
        Source::Csv(queue) => {
            coordinator.run_csv(queue, &client).await;
            Ok(())
        }
        Source::Nearby(coordinate) => {
            coordinator
                .run_nearby(&client, coordinate.lat, coordinate.lng)
                .await
        }
    };
    let (_page, summary) = coordinator.finish();

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }

    outcome?;
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed(),
        "Run completed"
    );
    Ok(Some(summary))
}

/// Handles the --dry-run mode: shows the configuration and the queue
fn handle_dry_run(config: &Config, source: &Source, input_path: &Path) {
    println!("=== Map Review Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max reviews per place: {}", config.crawler.max_reviews);
    println!("  Settle delay: {}ms", config.crawler.settle_delay_ms);
    println!("  Wait timeout: {}ms", config.crawler.wait_timeout_ms);
    println!("  Growth timeout: {}ms", config.crawler.growth_timeout_ms);
    println!(
        "  Stage policy: location-summary={:?}, activities={:?}",
        config.crawler.stage_policy.location_summary, config.crawler.stage_policy.activities
    );

    println!("\nOutput:");
    println!("  Results directory: {}", config.output.results_dir);
    println!("  Sinks: {:?}", config.output.sinks);

    match source {
        Source::Csv(queue) => {
            println!(
                "\nQueue from {} ({} places, {} rows skipped):",
                input_path.display(),
                queue.rows.len(),
                queue.skipped
            );
            for row in &queue.rows {
                match row.coordinate() {
                    Some((lat, lng)) => {
                        println!("  - [{}] {} ({}, {})", row.source_id, row.bnb_name, lat, lng)
                    }
                    None => println!("  - [{}] {} (no coordinates)", row.source_id, row.bnb_name),
                }
            }
        }
        Source::Nearby(coordinate) => {
            println!("\nNearby search:");
            println!("  Center: {},{}", coordinate.lat, coordinate.lng);
            println!("  Radius: {}m", config.search.radius_meters);
            println!("  Place type: {}", config.search.place_type);
        }
    }

    println!("\n✓ Configuration is valid");
}
