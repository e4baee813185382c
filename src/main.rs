//! Site-Ingest main entry point
//!
//! This is the command-line interface for the Site-Ingest crawler.

use clap::Parser;
use site_ingest::config::{load_config_with_hash, Config};
use site_ingest::crawler::crawl;
use site_ingest::url::UrlClassifier;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Ingest: a section-aware website ingester
///
/// Site-Ingest crawls one site breadth-first, splits HTML pages into
/// heading-bounded sections, extracts PDF and DOCX text, and stores the
/// results for semantic search.
#[derive(Parser, Debug)]
#[command(name = "site-ingest")]
#[command(version)]
#[command(about = "A section-aware website ingester", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_chunks"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_chunks"])]
    stats: bool,

    /// Write index chunks of all stored records to PATH (JSON Lines) and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_chunks: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(path) = &cli.export_chunks {
        handle_export_chunks(&config, path)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_ingest=info,warn"),
            1 => EnvFilter::new("site_ingest=debug,info"),
            2 => EnvFilter::new("site_ingest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let classifier = UrlClassifier::from_config(&config.crawler)?;

    println!("=== Site-Ingest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Root domain: {}", classifier.root_domain());
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay);
    println!("  Workers: {}", config.crawler.workers);

    println!(
        "\nExcluded Paths ({}):",
        config.crawler.excluded_paths.len()
    );
    for path in &config.crawler.excluded_paths {
        println!("  - {}", path);
    }

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!(
        "  Timeouts: HEAD {}s, page {}s, document {}s",
        config.fetch.head_timeout, config.fetch.page_timeout, config.fetch.document_timeout
    );
    println!("  Max document size: {} bytes", config.fetch.max_document_size);

    println!("\nExtraction:");
    println!(
        "  Minimum section length: {} chars",
        config.extract.min_section_length
    );
    println!(
        "  Minimum document length: {} chars",
        config.extract.min_document_length
    );
    println!(
        "  Download dir: {}",
        config
            .extract
            .download_dir
            .as_deref()
            .unwrap_or("(system temp dir)")
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling from {}", config.crawler.base_url);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use site_ingest::output::{load_statistics, print_statistics};
    use site_ingest::storage::open_storage;

    println!("Database: {}\n", config.output.database_path);

    // Open the database
    let storage = open_storage(Path::new(&config.output.database_path))?;

    // Load statistics
    let stats = load_statistics(&storage)?;

    // Print statistics
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-chunks mode: writes the index-building input
fn handle_export_chunks(config: &Config, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    use site_ingest::output::export_chunks;
    use site_ingest::storage::open_storage;

    println!("=== Exporting Index Chunks ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", path.display());
    println!();

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let count = export_chunks(&storage, path)?;

    println!("✓ {} chunks exported to: {}", count, path.display());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} ({} excluded paths, {} workers)",
        config.crawler.base_url,
        config.crawler.excluded_paths.len(),
        config.crawler.workers
    );

    // Run the crawler
    match crawl(config, config_hash).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl completed successfully: {} pages visited, {} records written",
                summary.pages_visited,
                summary.records_written
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
