//! Terminal rendering of pipeline events
//!
//! Search results are always printed to stdout since the user has to pick
//! from them. Handshakes and downloads get an indicatif bar on stderr when it
//! is a terminal and the user didn't ask for quiet output. Failures are
//! printed above an active bar; everything else goes to the log, with the
//! bar suspended while the line is written.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::events::{PipelineEvent, PipelineStage, ProgressSink, TracingSink};
use crate::app::models::{DownloadStatus, SearchResult};

/// Configuration for progress display
#[derive(Debug, Clone, Copy)]
pub struct ProgressConfig {
    /// Draw progress bars
    pub enable_progress_bars: bool,
}

impl ProgressConfig {
    /// Bars only when stderr is a terminal and output isn't quiet
    pub fn detect(quiet: bool) -> Self {
        Self {
            enable_progress_bars: !quiet && atty::is(atty::Stream::Stderr),
        }
    }
}

/// Renders pipeline events for a person at a terminal
pub struct ProgressDisplay {
    config: ProgressConfig,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressDisplay {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            config,
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, total: usize, message: &'static str) {
        if !self.config.enable_progress_bars {
            return;
        }
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.set_message(message);
        self.replace_bar(Some(bar));
    }

    fn replace_bar(&self, bar: Option<ProgressBar>) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(old) = slot.take() {
                old.finish_and_clear();
            }
            *slot = bar;
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                f(bar);
            }
        }
    }

    /// Print above the bar; false when there is no bar to print above
    fn notice(&self, line: String) -> bool {
        let mut printed = false;
        self.with_bar(|bar| {
            bar.println(&line);
            printed = true;
        });
        printed
    }

    /// Forward to the log without tearing an active bar
    fn log(&self, event: PipelineEvent) {
        let mut pending = Some(event);
        self.with_bar(|bar| {
            if let Some(event) = pending.take() {
                bar.suspend(|| TracingSink.emit(event));
            }
        });
        if let Some(event) = pending {
            TracingSink.emit(event);
        }
    }

    /// Update the terminal for `event`; true when it was printed above a bar
    fn render(&self, event: &PipelineEvent) -> bool {
        match event {
            PipelineEvent::SearchCompleted { results } => {
                print!("{}", format_results(results));
                false
            }
            PipelineEvent::StageStarted {
                stage: PipelineStage::FetchingImages,
                total: Some(total),
            } if *total > 0 => {
                self.start_bar(*total, "chapters");
                false
            }
            PipelineEvent::StageStarted {
                stage: PipelineStage::Downloading,
                total: Some(total),
            } if *total > 0 => {
                self.start_bar(*total, "pages");
                false
            }
            PipelineEvent::StageCompleted {
                stage: PipelineStage::FetchingImages | PipelineStage::Downloading,
            } => {
                self.replace_bar(None);
                false
            }
            PipelineEvent::HandshakeSucceeded { .. } => {
                self.with_bar(|bar| bar.inc(1));
                false
            }
            PipelineEvent::HandshakeFailed {
                chapter_number,
                reason,
            } => {
                self.with_bar(|bar| bar.inc(1));
                self.notice(format!(
                    "Error fetching images for chapter {}: {}",
                    chapter_number, reason
                ))
            }
            PipelineEvent::PageFinished(outcome) => {
                self.with_bar(|bar| bar.inc(1));
                match &outcome.status {
                    DownloadStatus::Failed(reason) => self.notice(format!(
                        "Failed to download {}: {}",
                        outcome.task.destination_path.display(),
                        reason
                    )),
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl ProgressSink for ProgressDisplay {
    fn emit(&self, event: PipelineEvent) {
        if !self.render(&event) {
            self.log(event);
        }
    }
}

/// Numbered listing of search results, starting at 1
pub fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| format!("{}. {}\n", index + 1, result.display_title))
        .collect()
}
