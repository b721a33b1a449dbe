//! Structured progress events emitted by the pipeline
//!
//! The core never formats output itself. It reports what happens through a
//! [`ProgressSink`], and the CLI decides how to render it.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::app::models::{DownloadOutcome, DownloadStatus, SearchResult};
use crate::app::paths::DirectoryStatus;

/// Linear pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Idle,
    Searching,
    AwaitingSelection,
    Aggregating,
    FetchingImages,
    BuildingTasks,
    Downloading,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Searching => "searching",
            PipelineStage::AwaitingSelection => "awaiting selection",
            PipelineStage::Aggregating => "aggregating chapters",
            PipelineStage::FetchingImages => "fetching chapter images",
            PipelineStage::BuildingTasks => "building download tasks",
            PipelineStage::Downloading => "downloading",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Something observable happened in the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A stage began; `total` is the number of items it will process, if known
    StageStarted {
        stage: PipelineStage,
        total: Option<usize>,
    },
    StageCompleted {
        stage: PipelineStage,
    },
    /// Search returned these candidates, numbered from 1 in this order
    SearchCompleted {
        results: Vec<SearchResult>,
    },
    /// Search failed and was treated as returning nothing
    SearchFailed {
        reason: String,
    },
    /// Aggregate failed and was treated as an empty chapter list
    AggregateFailed {
        reason: String,
    },
    HandshakeSucceeded {
        chapter_number: String,
        pages: usize,
    },
    /// Handshake failed; the chapter contributes no pages
    HandshakeFailed {
        chapter_number: String,
        reason: String,
    },
    ChapterDirectory {
        path: PathBuf,
        status: DirectoryStatus,
    },
    /// One download task finished, was skipped, or failed
    PageFinished(DownloadOutcome),
}

/// Receiver of pipeline events
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: PipelineEvent) {}
}

/// Writes events to the `tracing` log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::StageStarted { stage, total } => match total {
                Some(total) => info!("Stage started: {} ({} items)", stage, total),
                None => info!("Stage started: {}", stage),
            },
            PipelineEvent::StageCompleted { stage } => debug!("Stage completed: {}", stage),
            PipelineEvent::SearchCompleted { results } => {
                info!("Search returned {} results", results.len());
                for (index, result) in results.iter().enumerate() {
                    debug!("  {}. {} ({})", index + 1, result.display_title, result.id);
                }
            }
            PipelineEvent::SearchFailed { reason } => warn!("Search failed: {}", reason),
            PipelineEvent::AggregateFailed { reason } => {
                warn!("Chapter aggregate failed: {}", reason)
            }
            PipelineEvent::HandshakeSucceeded {
                chapter_number,
                pages,
            } => debug!("Chapter {}: {} pages", chapter_number, pages),
            PipelineEvent::HandshakeFailed {
                chapter_number,
                reason,
            } => warn!(
                "Error fetching images for chapter {}: {}",
                chapter_number, reason
            ),
            PipelineEvent::ChapterDirectory { path, status } => match status {
                DirectoryStatus::Created => info!("Created folder {}", path.display()),
                DirectoryStatus::Existing => debug!("Using existing folder {}", path.display()),
            },
            PipelineEvent::PageFinished(outcome) => {
                let path = outcome.task.destination_path.display();
                match (&outcome.status, outcome.skipped) {
                    (DownloadStatus::Success, true) => debug!("Already present: {}", path),
                    (DownloadStatus::Success, false) => debug!("Downloaded: {}", path),
                    (DownloadStatus::Failed(reason), _) => {
                        warn!("Failed to download {}: {}", path, reason)
                    }
                }
            }
        }
    }
}

/// Keeps every event in memory, for inspection after a run
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Stages that were entered, in order
    pub fn stages(&self) -> Vec<PipelineStage> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PipelineEvent::StageStarted { stage, .. } => Some(stage),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for MemorySink {
    fn emit(&self, event: PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
