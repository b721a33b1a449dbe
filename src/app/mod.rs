//! Core application logic for Manga Fetcher
//!
//! This module contains the catalog client, data models, handshake pacing,
//! path resolution, the download scheduler and the pipeline that ties them
//! together. Nothing in here prints; progress is reported through
//! [`events::ProgressSink`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use manga_fetcher::app::{
//!     ClientConfig, HttpPageFetcher, MangaDexClient, Pipeline, PipelineConfig, ScriptedPrompt,
//!     TracingSink,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MangaDexClient::new(&ClientConfig::default())?;
//! let fetcher = Arc::new(HttpPageFetcher::new(client.http_client().clone()));
//! let pipeline = Pipeline::new(client, fetcher, PipelineConfig::default());
//!
//! let mut prompt = ScriptedPrompt::new(["Foo", "1"]);
//! let outcome = pipeline.run(&mut prompt, &TracingSink).await?;
//! println!("{}", outcome.message());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod download;
pub mod events;
pub mod models;
pub mod pacing;
pub mod paths;
pub mod pipeline;
pub mod prompt;
pub mod signals;

// Re-export main public API
pub use client::{CatalogApi, ClientConfig, MangaDexClient};
pub use download::{
    download_atomically, DownloadScheduler, DownloadSummary, HttpPageFetcher, PageFetcher,
    SchedulerConfig,
};
pub use events::{
    MemorySink, NullSink, PipelineEvent, PipelineStage, ProgressSink, TracingSink,
};
pub use models::{
    sort_chapters, ChapterImages, ChapterRef, DownloadOutcome, DownloadStatus, DownloadTask,
    ImageHandshake, SearchResult,
};
pub use pacing::{PacingClock, RateGovernor};
pub use paths::{ChapterDirectory, DirectoryStatus, PathResolver};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutcome, PipelineReport};
pub use prompt::{Prompt, ScriptedPrompt};
pub use signals::{ShutdownSignal, SignalHandler};
