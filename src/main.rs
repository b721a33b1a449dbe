//! Manga Fetcher CLI application
//!
//! Interactive command-line tool that searches MangaDex and downloads every
//! chapter of the chosen manga with bounded parallelism.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use manga_fetcher::cli::{handle_run, Cli};
use manga_fetcher::config::AppConfig;
use manga_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    // Loaded before logging so `logging.level` can set the default
    let config = AppConfig::load(cli.global.config.clone()).await?;
    init_logging(&cli, config.logging.default_level()?);

    info!("Manga Fetcher v{} starting", env!("CARGO_PKG_VERSION"));
    handle_run(cli, config).await
}

/// Initialize logging from the verbosity flags, falling back to the config
fn init_logging(cli: &Cli, configured: tracing::Level) {
    let log_level = cli.log_level(configured);

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("manga_fetcher={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
