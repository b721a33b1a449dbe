//! Data models for catalog entries, chapters and download work
//!
//! These types are produced at the JSON decoding boundary of the catalog
//! client and flow through the pipeline stages. Optional upstream data is
//! represented with `Option` here so later stages never re-check raw JSON.

use std::cmp::Ordering;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::api;

/// A single manga returned by a catalog search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Catalog identifier of the manga
    pub id: String,
    /// Title shown to the user and used as the download folder name
    pub display_title: String,
}

/// One chapter of a selected manga
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRef {
    /// Chapter label as published (e.g. "12", "12.5", "none")
    pub chapter_number: String,
    /// Catalog identifier of the chapter
    pub chapter_id: String,
    /// Volume label the chapter was grouped under, if any
    pub volume: Option<String>,
}

impl ChapterRef {
    /// Create a chapter reference without volume information
    pub fn new(chapter_number: impl Into<String>, chapter_id: impl Into<String>) -> Self {
        Self {
            chapter_number: chapter_number.into(),
            chapter_id: chapter_id.into(),
            volume: None,
        }
    }

    /// Numeric value of the chapter label, if it has one
    pub fn numeric_value(&self) -> Option<f64> {
        self.chapter_number
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }
}

/// Sort chapters into reading order
///
/// Numeric labels come first in ascending order; non-numeric labels follow,
/// ordered lexicographically. Ties fall back to the chapter id so the result
/// is fully deterministic.
pub fn sort_chapters(chapters: &mut [ChapterRef]) {
    chapters.sort_by(|a, b| {
        let by_number = match (a.numeric_value(), b.numeric_value()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.chapter_number.cmp(&b.chapter_number),
        };
        by_number.then_with(|| a.chapter_id.cmp(&b.chapter_id))
    });
}

/// Image server data returned by a chapter handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandshake {
    /// Image server base URL, valid for a short time
    pub image_base_url: String,
    /// Chapter hash token
    pub image_hash: String,
    /// Page file names in reading order
    pub file_names: Vec<String>,
}

impl ImageHandshake {
    /// Build the full-quality URL for one page file
    pub fn page_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.image_base_url.trim_end_matches('/'),
            api::IMAGE_QUALITY_SEGMENT,
            self.image_hash,
            file_name
        )
    }
}

/// A chapter together with the outcome of its handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterImages {
    pub chapter: ChapterRef,
    /// `None` when the handshake failed; the chapter then has no pages
    pub handshake: Option<ImageHandshake>,
}

impl ChapterImages {
    /// Number of resolvable pages
    pub fn page_count(&self) -> usize {
        self.handshake
            .as_ref()
            .map(|handshake| handshake.file_names.len())
            .unwrap_or(0)
    }
}

/// One page image to be fetched into one destination file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DownloadTask {
    /// URL of the page image
    pub source_url: String,
    /// Final location of the page on disk
    pub destination_path: PathBuf,
    /// Chapter directory containing the destination
    pub chapter_dir: PathBuf,
}

/// Result of a single download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    Success,
    Failed(String),
}

/// Outcome of one task, traceable to the task that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub task: DownloadTask,
    pub status: DownloadStatus,
    /// The destination already existed and no request was made
    pub skipped: bool,
}

impl DownloadOutcome {
    /// Outcome for a destination that was already present
    pub fn skipped(task: DownloadTask) -> Self {
        Self {
            task,
            status: DownloadStatus::Success,
            skipped: true,
        }
    }

    /// Outcome for a completed download
    pub fn downloaded(task: DownloadTask) -> Self {
        Self {
            task,
            status: DownloadStatus::Success,
            skipped: false,
        }
    }

    /// Outcome for a failed download
    pub fn failed(task: DownloadTask, reason: impl Into<String>) -> Self {
        Self {
            task,
            status: DownloadStatus::Failed(reason.into()),
            skipped: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DownloadStatus::Success
    }
}
