//! Final report of a pipeline run

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::download::DownloadSummary;
use crate::app::events::PipelineStage;
use crate::app::models::{DownloadTask, SearchResult};

/// What a completed run did
///
/// A run with failed handshakes or failed downloads is still a completed
/// run; the counts say how partial it was.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub manga: SearchResult,
    pub chapters_total: usize,
    /// Chapter numbers whose handshake failed
    pub chapter_warnings: Vec<String>,
    pub tasks_total: usize,
    pub downloads: DownloadSummary,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineReport {
    pub fn attempted_downloads(&self) -> usize {
        self.downloads.attempted()
    }

    /// True when anything was lost along the way
    pub fn is_partial(&self) -> bool {
        !self.chapter_warnings.is_empty() || self.downloads.failed > 0
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// How a pipeline run ended
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// The search returned nothing to choose from
    NoResults { query: String },
    /// The user chose 0
    NoSelection,
    /// Shutdown was requested before any chapter was touched
    Interrupted { stage: PipelineStage },
    /// Dry run: tasks were planned but nothing was downloaded
    Planned {
        report: PipelineReport,
        tasks: Vec<DownloadTask>,
    },
    Completed(PipelineReport),
}

impl PipelineOutcome {
    /// Message suitable for showing the user
    pub fn message(&self) -> String {
        match self {
            PipelineOutcome::NoResults { query } => format!("No manga found for '{}'.", query),
            PipelineOutcome::NoSelection => "No manga selected for download.".to_string(),
            PipelineOutcome::Interrupted { stage } => format!("Interrupted while {}.", stage),
            PipelineOutcome::Planned { report, tasks } => format!(
                "Planned {} pages across {} chapters of {}.",
                tasks.len(),
                report.chapters_total,
                report.manga.display_title
            ),
            PipelineOutcome::Completed(report) => format!(
                "{}: {} downloaded, {} already present, {} failed, {} chapter warnings.",
                report.manga.display_title,
                report.downloads.downloaded,
                report.downloads.skipped,
                report.downloads.failed,
                report.chapter_warnings.len()
            ),
        }
    }

    pub fn report(&self) -> Option<&PipelineReport> {
        match self {
            PipelineOutcome::Planned { report, .. } | PipelineOutcome::Completed(report) => {
                Some(report)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(chapter_warnings: Vec<String>, failed: usize) -> PipelineReport {
        let now = Utc::now();
        PipelineReport {
            manga: SearchResult {
                id: "a1".to_string(),
                display_title: "Foo Bar".to_string(),
            },
            chapters_total: 2,
            chapter_warnings,
            tasks_total: 2,
            downloads: DownloadSummary {
                total: 2,
                skipped: 0,
                downloaded: 2 - failed,
                failed,
            },
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn test_partial_detection() {
        assert!(!report(vec![], 0).is_partial());
        assert!(report(vec!["2".to_string()], 0).is_partial());
        assert!(report(vec![], 1).is_partial());
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            PipelineOutcome::NoSelection.message(),
            "No manga selected for download."
        );
        let completed = PipelineOutcome::Completed(report(vec!["2".to_string()], 0));
        assert!(completed.message().contains("1 chapter warnings"));
        assert!(completed.report().is_some());
        assert!(PipelineOutcome::NoSelection.report().is_none());

        let interrupted = PipelineOutcome::Interrupted {
            stage: PipelineStage::AwaitingSelection,
        };
        assert_eq!(interrupted.message(), "Interrupted while awaiting selection.");
        assert!(interrupted.report().is_none());
    }
}
