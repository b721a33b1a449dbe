//! Command-line argument parsing for Manga Fetcher
//!
//! There is a single interactive flow, so there are no subcommands. Flags can
//! pre-answer the two prompts and override configuration values.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};

use crate::config::ConfigOverrides;
use crate::constants::workers;

/// Manga Fetcher - Download manga chapters from MangaDex
#[derive(Parser, Debug)]
#[command(
    name = "manga_fetcher",
    version,
    about = "Search MangaDex and download every chapter of a manga",
    long_about = "Search the MangaDex catalog for a title, pick one of the results and download
all of its chapters as numbered page images. Pages already on disk are skipped, so an
interrupted run can simply be started again."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Run options
    #[command(flatten)]
    pub run: RunArgs,
}

/// Logging and configuration options
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, conflicts_with_all = ["verbose", "very_verbose"])]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Options for the download run
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Title to search for instead of prompting
    #[arg(long, value_name = "TITLE")]
    pub query: Option<String>,

    /// Result number to download instead of prompting (0 skips)
    #[arg(long, value_name = "N")]
    pub select: Option<i64>,

    /// Root directory for downloads
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of concurrent page downloads
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Minimum delay between chapter handshakes (e.g. "2s", "1500ms")
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub handshake_delay: Option<Duration>,

    /// Translated language to download chapters in
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Show what would be downloaded without downloading
    #[arg(long)]
    pub dry_run: bool,

    /// Skip authentication even if credentials are configured
    #[arg(long)]
    pub no_auth: bool,
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level from the verbosity flags, `default` when none is given
    pub fn log_level(&self, default: tracing::Level) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            default
        }
    }
}

impl RunArgs {
    /// Reject values clap cannot check on its own
    pub fn validate(&self) -> Result<(), String> {
        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > workers::MAX_CONCURRENCY_LIMIT {
                return Err(format!(
                    "Worker count cannot exceed {}",
                    workers::MAX_CONCURRENCY_LIMIT
                ));
            }
        }

        if matches!(&self.language, Some(language) if language.trim().is_empty()) {
            return Err("Language must not be empty".to_string());
        }

        Ok(())
    }

    /// Configuration values set on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output_dir: self.output_dir.clone(),
            max_concurrency: self.workers,
            handshake_delay: self.handshake_delay,
            language: self.language.clone(),
        }
    }
}
