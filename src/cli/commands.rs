//! Command handler for the interactive download run

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::args::Cli;
use super::progress::{ProgressConfig, ProgressDisplay};
use super::prompt::{PresetPrompt, StdinPrompt};
use crate::app::{
    HttpPageFetcher, MangaDexClient, Pipeline, PipelineOutcome, PipelineReport, ShutdownSignal,
    SignalHandler,
};
use crate::auth::authenticate_best_effort;
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Run one search-select-download session with an already loaded config
pub async fn handle_run(cli: Cli, mut config: AppConfig) -> Result<()> {
    cli.run.validate().map_err(AppError::generic)?;

    config.apply_overrides(&cli.run.overrides());
    let client_config = config.client_config()?;
    debug!("Using catalog at {}", client_config.api_base_url);

    let mut client = MangaDexClient::new(&client_config)?;
    if cli.run.no_auth {
        debug!("Authentication disabled by --no-auth");
    } else {
        authenticate_best_effort(&mut client, &client_config.auth_url).await;
    }

    let fetcher = Arc::new(HttpPageFetcher::new(client.http_client().clone()));

    // Prompts poll this signal, so Ctrl+C also ends a pending question
    let shutdown = ShutdownSignal::new();
    let signal_task = SignalHandler::new(shutdown.clone()).setup();

    let pipeline = Pipeline::new(client, fetcher, config.pipeline_config(cli.run.dry_run))
        .with_shutdown(shutdown.clone());
    let display = ProgressDisplay::new(ProgressConfig::detect(cli.global.quiet));
    let mut prompt = PresetPrompt::new(
        cli.run.query.clone(),
        cli.run.select,
        StdinPrompt::new(shutdown.clone()),
    );

    let result = pipeline.run(&mut prompt, &display).await;
    signal_task.abort();
    let outcome = result?;

    if shutdown.is_requested() {
        warn!("Run was interrupted; start it again to fetch the remaining pages");
    }

    print_outcome(&outcome, cli.global.quiet)
}

fn print_outcome(outcome: &PipelineOutcome, quiet: bool) -> Result<()> {
    match outcome {
        PipelineOutcome::Planned { tasks, .. } => {
            let json = serde_json::to_string_pretty(tasks)
                .map_err(|e| AppError::generic(format!("Failed to encode planned tasks: {}", e)))?;
            println!("{}", json);
        }
        PipelineOutcome::Completed(report) => {
            info!("Run took {}s", report.duration().num_seconds());
            if !quiet {
                print_report(report);
            }
        }
        PipelineOutcome::NoResults { .. }
        | PipelineOutcome::NoSelection
        | PipelineOutcome::Interrupted { .. } => {
            if !quiet {
                println!("{}", outcome.message());
            }
        }
    }
    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!();
    println!("{}", report.manga.display_title);
    println!(
        "  Chapters:   {} ({} without images)",
        report.chapters_total,
        report.chapter_warnings.len()
    );
    println!("  Pages:      {}", report.tasks_total);
    println!("  Downloaded: {}", report.downloads.downloaded);
    println!("  Present:    {}", report.downloads.skipped);
    println!("  Failed:     {}", report.downloads.failed);

    if !report.chapter_warnings.is_empty() {
        println!(
            "  Chapters skipped: {}",
            report.chapter_warnings.join(", ")
        );
    }
    if report.is_partial() {
        println!("Some pages are missing; run again to retry them.");
    }
}
