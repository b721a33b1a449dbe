//! Prelude module for Manga Fetcher Library
//!
//! Re-exports the items needed to drive a pipeline from library code with a
//! single `use manga_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use manga_fetcher::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let client = MangaDexClient::new(&config.client_config()?)?;
//!     let fetcher = Arc::new(HttpPageFetcher::new(client.http_client().clone()));
//!     let pipeline = Pipeline::new(client, fetcher, config.pipeline_config(false));
//!
//!     let mut prompt = ScriptedPrompt::new(["Foo", "1"]);
//!     let outcome = pipeline.run(&mut prompt, &TracingSink).await?;
//!     println!("{}", outcome.message());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

pub use crate::config::AppConfig;

pub use crate::app::{
    // Catalog
    CatalogApi,
    ChapterRef,
    ClientConfig,
    // Data types
    DownloadOutcome,
    DownloadTask,
    HttpPageFetcher,
    ImageHandshake,
    MangaDexClient,
    PageFetcher,
    // Orchestration
    Pipeline,
    PipelineConfig,
    PipelineEvent,
    PipelineOutcome,
    PipelineReport,
    ProgressSink,
    Prompt,
    ScriptedPrompt,
    SearchResult,
    ShutdownSignal,
    TracingSink,
};
