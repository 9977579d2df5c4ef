//! Batowners - ownership statistics for Doginal inscription pages
//!
//! A CLI tool that scans a directory of downloaded inscription HTML pages,
//! extracts each page's owner address and writes ownership reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, unreadable directory, failed write)

mod analysis;
mod cli;
mod config;
mod error;
mod extract;
mod models;
mod report;
mod scanner;

use analysis::{DirectoryProcessor, ProcessOptions};
use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use extract::OwnerExtractor;
use scanner::{DocumentScanner, ScanConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config decides the log level, so it is loaded before logging starts
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("Batowners v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    if let Err(e) = run(args, config).await {
        error!("Processing failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .batowners.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the filename convention, label and report names.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Scan, aggregate and write reports for the target directory.
async fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let scanner = DocumentScanner::new(args.dir.clone(), ScanConfig::from(&config.scanner));

    if args.dry_run {
        return handle_dry_run(&scanner);
    }

    let extractor = OwnerExtractor::new(&config.extract).context("Invalid extract configuration")?;

    let options = ProcessOptions {
        top_owners: config.report.top_owners,
        progress_interval: config.general.progress_interval,
        show_progress: !args.quiet,
    };

    if !args.quiet {
        println!("🔍 Reading from directory: {}", args.dir.display());
    }
    let processor = DirectoryProcessor::new(scanner, extractor, options);
    let ownership = processor.process().await?;

    if !args.quiet {
        println!("\n📝 Writing reports...");
    }
    let paths = report::write_reports(&args.dir, &config.report, &ownership).await?;

    if !args.quiet {
        println!("\n📊 Processing complete!");
        println!("{}", report::generate_console_summary(&ownership));
        println!("\n   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
        println!("\n✅ Reports saved to:");
        println!("   {}", paths.owners.display());
        println!("   {}", paths.statistics.display());
        println!("   {}", paths.counts.display());
    }

    Ok(())
}

/// Handle --dry-run: list the matching documents in scan order, write nothing.
fn handle_dry_run(scanner: &DocumentScanner) -> Result<()> {
    println!("\n🔍 Dry run: scanning {} (no reports written)...\n", scanner.root().display());

    let scan = scanner.scan()?;

    if scan.documents.is_empty() {
        println!("   No matching HTML files found.");
    } else {
        println!("   Found {} files that would be processed:\n", scan.documents.len());
        for doc in &scan.documents {
            println!("     📄 {} ({})", doc.file_name, doc.id);
        }
    }

    for e in &scan.malformed {
        println!("     ⚠️  {}", e);
    }

    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
/// Returns the path the config came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, Some(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, Some(PathBuf::from(CONFIG_FILE)))),
        Ok(None) => Ok((Config::default(), None)),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}", e);
            Ok((Config::default(), None))
        }
    }
}
