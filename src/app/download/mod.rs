//! Page download scheduling
//!
//! - `fetcher`: the [`PageFetcher`] seam and atomic temp-file placement
//! - `pool`: the bounded worker pool behind [`DownloadScheduler`]

pub mod fetcher;
pub mod pool;

pub use fetcher::{download_atomically, HttpPageFetcher, PageFetcher};
pub use pool::{DownloadScheduler, SchedulerConfig};

use serde::Serialize;

use crate::app::models::DownloadOutcome;

/// Counts over a set of download outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    pub total: usize,
    /// Destination already present, no request made
    pub skipped: usize,
    pub downloaded: usize,
    pub failed: usize,
}

impl DownloadSummary {
    pub fn from_outcomes(outcomes: &[DownloadOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            summary.total += 1;
            match (outcome.is_success(), outcome.skipped) {
                (true, true) => summary.skipped += 1,
                (true, false) => summary.downloaded += 1,
                (false, _) => summary.failed += 1,
            }
            summary
        })
    }

    /// Tasks for which a request was made (or would have been, if cancelled)
    pub fn attempted(&self) -> usize {
        self.total - self.skipped
    }
}
