//! End-to-end orchestration of one interactive download run
//!
//! The pipeline walks a fixed sequence of stages:
//!
//! `Searching -> AwaitingSelection -> Aggregating -> FetchingImages ->
//! BuildingTasks -> Downloading -> Done`
//!
//! Catalog failures are soft: a failed search is treated as no results, a
//! failed aggregate as no chapters and a failed handshake as a chapter with
//! no pages. Each of these is reported as an event and the run carries on.
//! Only invalid user input and an unusable output root end a run early.
//!
//! A shutdown request is honoured at every stage boundary. Before any chapter
//! has been aggregated the run ends as [`PipelineOutcome::Interrupted`]; after
//! that, remaining handshakes and downloads are recorded as cancelled.
//!
//! - [`config`] - run configuration
//! - [`report`] - final report and outcome types

pub mod config;
pub mod report;

pub use config::PipelineConfig;
pub use report::{PipelineOutcome, PipelineReport};

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use governor::clock::DefaultClock;
use tracing::{debug, info, warn};

use crate::app::client::CatalogApi;
use crate::app::download::{DownloadScheduler, DownloadSummary, PageFetcher};
use crate::app::events::{PipelineEvent, PipelineStage, ProgressSink};
use crate::app::models::{sort_chapters, ChapterImages, ChapterRef, DownloadTask, SearchResult};
use crate::app::pacing::{PacingClock, RateGovernor};
use crate::app::paths::PathResolver;
use crate::app::prompt::Prompt;
use crate::app::signals::ShutdownSignal;
use crate::errors::{InputError, Result, StorageResult};

const SEARCH_PROMPT: &str = "Enter the title of the manga you want to search for: ";
const SELECTION_PROMPT: &str =
    "Enter the number of the manga you want to download (or 0 to skip): ";

/// Drives a catalog, a rate governor and a download scheduler through one run
pub struct Pipeline<C, F, K = DefaultClock>
where
    C: CatalogApi,
    F: PageFetcher + 'static,
    K: PacingClock,
{
    catalog: C,
    scheduler: DownloadScheduler<F>,
    governor: RateGovernor<K>,
    config: PipelineConfig,
    shutdown: ShutdownSignal,
}

impl<C, F> Pipeline<C, F, DefaultClock>
where
    C: CatalogApi,
    F: PageFetcher + 'static,
{
    /// Create a pipeline paced by the wall clock
    pub fn new(catalog: C, fetcher: Arc<F>, config: PipelineConfig) -> Self {
        Self::with_clock(catalog, fetcher, config, DefaultClock::default())
    }
}

impl<C, F, K> Pipeline<C, F, K>
where
    C: CatalogApi,
    F: PageFetcher + 'static,
    K: PacingClock,
{
    /// Create a pipeline whose handshake pacing follows `clock`
    pub fn with_clock(catalog: C, fetcher: Arc<F>, config: PipelineConfig, clock: K) -> Self {
        let shutdown = ShutdownSignal::new();
        let scheduler = DownloadScheduler::new(fetcher, config.scheduler.clone())
            .with_shutdown(shutdown.clone());
        let governor = RateGovernor::with_clock(config.handshake_delay, clock);

        Self {
            catalog,
            scheduler,
            governor,
            config,
            shutdown,
        }
    }

    /// Share a shutdown signal with the pipeline and its scheduler
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.scheduler = self.scheduler.with_shutdown(shutdown.clone());
        self.shutdown = shutdown;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full interactive flow once
    pub async fn run(
        &self,
        prompt: &mut dyn Prompt,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineOutcome> {
        let started_at = Utc::now();

        self.enter(PipelineStage::Searching, None, sink);
        let answer = prompt.prompt_string(SEARCH_PROMPT);
        if let Some(outcome) = self.interrupted(PipelineStage::Searching, sink) {
            return Ok(outcome);
        }
        let query = answer?.trim().to_string();
        let results = self.search(&query, sink).await;
        self.complete(PipelineStage::Searching, sink);

        if results.is_empty() {
            info!("No results for '{}'", query);
            self.enter(PipelineStage::Done, None, sink);
            return Ok(PipelineOutcome::NoResults { query });
        }

        self.enter(PipelineStage::AwaitingSelection, Some(results.len()), sink);
        if let Some(outcome) = self.interrupted(PipelineStage::AwaitingSelection, sink) {
            return Ok(outcome);
        }
        let answer = prompt.prompt_int(SELECTION_PROMPT);
        if let Some(outcome) = self.interrupted(PipelineStage::AwaitingSelection, sink) {
            return Ok(outcome);
        }
        let selection = answer?;
        let Some(manga) = select(&results, selection)? else {
            info!("No manga selected");
            self.enter(PipelineStage::Done, None, sink);
            return Ok(PipelineOutcome::NoSelection);
        };
        self.complete(PipelineStage::AwaitingSelection, sink);
        info!("Selected '{}' ({})", manga.display_title, manga.id);

        self.enter(PipelineStage::Aggregating, None, sink);
        let chapters = self.aggregate(&manga.id, sink).await;
        self.complete(PipelineStage::Aggregating, sink);

        self.enter(PipelineStage::FetchingImages, Some(chapters.len()), sink);
        let images = self.fetch_images(chapters, sink).await;
        self.complete(PipelineStage::FetchingImages, sink);

        let chapters_total = images.len();
        let chapter_warnings: Vec<String> = images
            .iter()
            .filter(|chapter| chapter.handshake.is_none())
            .map(|chapter| chapter.chapter.chapter_number.clone())
            .collect();

        self.enter(PipelineStage::BuildingTasks, None, sink);
        let tasks = self
            .build_tasks(&manga.display_title, &images, sink)
            .await?;
        self.complete(PipelineStage::BuildingTasks, sink);

        let mut report = PipelineReport {
            manga,
            chapters_total,
            chapter_warnings,
            tasks_total: tasks.len(),
            downloads: DownloadSummary::default(),
            started_at,
            finished_at: started_at,
        };

        if self.config.dry_run {
            info!("Dry run, {} pages planned", tasks.len());
            self.enter(PipelineStage::Done, None, sink);
            report.finished_at = Utc::now();
            return Ok(PipelineOutcome::Planned { report, tasks });
        }

        self.enter(PipelineStage::Downloading, Some(tasks.len()), sink);
        let outcomes = self.scheduler.download_all(tasks, sink).await;
        self.complete(PipelineStage::Downloading, sink);

        report.downloads = DownloadSummary::from_outcomes(&outcomes);
        report.finished_at = Utc::now();
        self.enter(PipelineStage::Done, None, sink);

        info!(
            "Finished '{}': {} downloaded, {} skipped, {} failed, {} chapter warnings",
            report.manga.display_title,
            report.downloads.downloaded,
            report.downloads.skipped,
            report.downloads.failed,
            report.chapter_warnings.len()
        );
        Ok(PipelineOutcome::Completed(report))
    }

    fn enter(&self, stage: PipelineStage, total: Option<usize>, sink: &dyn ProgressSink) {
        debug!("Entering stage: {}", stage);
        sink.emit(PipelineEvent::StageStarted { stage, total });
    }

    fn complete(&self, stage: PipelineStage, sink: &dyn ProgressSink) {
        sink.emit(PipelineEvent::StageCompleted { stage });
    }

    /// End the run at `stage` if shutdown has been requested
    fn interrupted(
        &self,
        stage: PipelineStage,
        sink: &dyn ProgressSink,
    ) -> Option<PipelineOutcome> {
        if !self.shutdown.is_requested() {
            return None;
        }
        info!("Shutdown requested while {}, stopping", stage);
        self.enter(PipelineStage::Done, None, sink);
        Some(PipelineOutcome::Interrupted { stage })
    }

    async fn search(&self, query: &str, sink: &dyn ProgressSink) -> Vec<SearchResult> {
        match self.catalog.search_manga(query).await {
            Ok(results) => {
                sink.emit(PipelineEvent::SearchCompleted {
                    results: results.clone(),
                });
                results
            }
            Err(e) => {
                sink.emit(PipelineEvent::SearchFailed {
                    reason: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    async fn aggregate(&self, manga_id: &str, sink: &dyn ProgressSink) -> Vec<ChapterRef> {
        match self.catalog.chapter_aggregate(manga_id).await {
            Ok(mut chapters) => {
                sort_chapters(&mut chapters);
                debug!("Found {} chapters", chapters.len());
                chapters
            }
            Err(e) => {
                sink.emit(PipelineEvent::AggregateFailed {
                    reason: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Handshake every chapter in order, one at a time, through the governor
    async fn fetch_images(
        &self,
        chapters: Vec<ChapterRef>,
        sink: &dyn ProgressSink,
    ) -> Vec<ChapterImages> {
        let mut images = Vec::with_capacity(chapters.len());

        for chapter in chapters {
            if self.shutdown.is_requested() {
                sink.emit(PipelineEvent::HandshakeFailed {
                    chapter_number: chapter.chapter_number.clone(),
                    reason: "cancelled".to_string(),
                });
                images.push(ChapterImages {
                    chapter,
                    handshake: None,
                });
                continue;
            }

            self.governor.acquire().await;
            let handshake = match self.catalog.image_handshake(&chapter.chapter_id).await {
                Ok(handshake) => {
                    sink.emit(PipelineEvent::HandshakeSucceeded {
                        chapter_number: chapter.chapter_number.clone(),
                        pages: handshake.file_names.len(),
                    });
                    Some(handshake)
                }
                Err(e) => {
                    sink.emit(PipelineEvent::HandshakeFailed {
                        chapter_number: chapter.chapter_number.clone(),
                        reason: e.to_string(),
                    });
                    None
                }
            };
            images.push(ChapterImages { chapter, handshake });
        }

        images
    }

    /// One task per page of every chapter that has images
    ///
    /// Chapter folders are created here unless this is a dry run. Two chapters
    /// that resolve to the same folder (several unnumbered chapters, say) keep
    /// only the first task for each page path.
    async fn build_tasks(
        &self,
        title: &str,
        images: &[ChapterImages],
        sink: &dyn ProgressSink,
    ) -> StorageResult<Vec<DownloadTask>> {
        let root = &self.config.output_dir;
        if !self.config.dry_run {
            PathResolver::ensure_directory(root).await?;
        }

        let mut tasks = Vec::new();
        let mut seen = HashSet::new();

        for chapter in images {
            let Some(handshake) = &chapter.handshake else {
                continue;
            };
            if handshake.file_names.is_empty() {
                continue;
            }

            let number = &chapter.chapter.chapter_number;
            let chapter_dir = if self.config.dry_run {
                PathResolver::chapter_path(root, title, number)
            } else {
                let directory = PathResolver::chapter_directory(root, title, number).await?;
                sink.emit(PipelineEvent::ChapterDirectory {
                    path: directory.path.clone(),
                    status: directory.status,
                });
                directory.path
            };

            for (index, file_name) in handshake.file_names.iter().enumerate() {
                let extension = PathResolver::page_extension(file_name);
                let destination_path = PathResolver::page_file_path(&chapter_dir, index, &extension);
                if !seen.insert(destination_path.clone()) {
                    warn!(
                        "Chapter {} page {} duplicates {}, skipping",
                        number,
                        index + 1,
                        destination_path.display()
                    );
                    continue;
                }
                tasks.push(DownloadTask {
                    source_url: handshake.page_url(file_name),
                    destination_path,
                    chapter_dir: chapter_dir.clone(),
                });
            }
        }

        Ok(tasks)
    }
}

/// Map a 1-based selection onto the result list; 0 means no selection
fn select(
    results: &[SearchResult],
    selection: i64,
) -> std::result::Result<Option<SearchResult>, InputError> {
    if selection == 0 {
        return Ok(None);
    }
    usize::try_from(selection)
        .ok()
        .and_then(|n| results.get(n.wrapping_sub(1)))
        .cloned()
        .map(Some)
        .ok_or(InputError::OutOfRange {
            selection,
            max: results.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use governor::clock::FakeRelativeClock;
    use tempfile::TempDir;
    use tokio::fs::File;
    use tokio::io::AsyncWriteExt;

    use crate::app::events::{MemorySink, NullSink};
    use crate::app::models::ImageHandshake;
    use crate::app::prompt::ScriptedPrompt;
    use crate::errors::{AppError, CatalogError, CatalogResult, DownloadResult};

    /// Catalog with one manga "Foo Bar" and two chapters; chapter 2 has no
    /// image server available
    #[derive(Default)]
    struct FakeCatalog {
        calls: Mutex<Vec<String>>,
        fail_search: bool,
        /// Triggered from inside the named call
        shutdown_during: Option<(&'static str, ShutdownSignal)>,
    }

    impl FakeCatalog {
        fn record(&self, call: String) {
            if let Some((name, shutdown)) = &self.shutdown_during {
                if call.starts_with(name) {
                    shutdown.trigger();
                }
            }
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CatalogApi for FakeCatalog {
        async fn search_manga(&self, title: &str) -> CatalogResult<Vec<SearchResult>> {
            self.record(format!("search:{}", title));
            if self.fail_search {
                return Err(CatalogError::Status {
                    status: 503,
                    url: "https://api.test/manga".to_string(),
                });
            }
            Ok(vec![SearchResult {
                id: "a1".to_string(),
                display_title: "Foo Bar".to_string(),
            }])
        }

        async fn chapter_aggregate(&self, manga_id: &str) -> CatalogResult<Vec<ChapterRef>> {
            self.record(format!("aggregate:{}", manga_id));
            Ok(vec![ChapterRef::new("2", "c2"), ChapterRef::new("1", "c1")])
        }

        async fn image_handshake(&self, chapter_id: &str) -> CatalogResult<ImageHandshake> {
            self.record(format!("handshake:{}", chapter_id));
            match chapter_id {
                "c1" => Ok(ImageHandshake {
                    image_base_url: "https://img.example".to_string(),
                    image_hash: "h1".to_string(),
                    file_names: vec!["x1.png".to_string(), "x2.png".to_string()],
                }),
                _ => Err(CatalogError::Status {
                    status: 404,
                    url: format!("https://api.test/at-home/server/{}", chapter_id),
                }),
            }
        }
    }

    #[derive(Default)]
    struct FakeFetcher {
        urls: Mutex<Vec<String>>,
    }

    impl PageFetcher for FakeFetcher {
        async fn fetch_into(&self, url: &str, sink: &mut File) -> DownloadResult<u64> {
            self.urls.lock().unwrap().push(url.to_string());
            sink.write_all(b"page").await?;
            Ok(4)
        }
    }

    fn pipeline(
        root: &std::path::Path,
        catalog: FakeCatalog,
        fetcher: Arc<FakeFetcher>,
        dry_run: bool,
    ) -> Pipeline<FakeCatalog, FakeFetcher, FakeRelativeClock> {
        let config = PipelineConfig {
            output_dir: root.to_path_buf(),
            dry_run,
            ..Default::default()
        };
        Pipeline::with_clock(catalog, fetcher, config, FakeRelativeClock::default())
    }

    #[tokio::test]
    async fn test_full_run_with_one_failed_handshake() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = Arc::new(FakeFetcher::default());
        let pipeline = pipeline(temp_dir.path(), FakeCatalog::default(), Arc::clone(&fetcher), false);
        let mut prompt = ScriptedPrompt::new(["Foo", "1"]);
        let sink = MemorySink::new();

        let outcome = pipeline.run(&mut prompt, &sink).await.unwrap();

        let PipelineOutcome::Completed(report) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(report.manga.id, "a1");
        assert_eq!(report.chapters_total, 2);
        assert_eq!(report.chapter_warnings, vec!["2".to_string()]);
        assert_eq!(report.tasks_total, 2);
        assert_eq!(report.attempted_downloads(), 2);
        assert_eq!(report.downloads.downloaded, 2);

        let chapter_dir = temp_dir.path().join("Foo Bar").join("chapter 1");
        assert!(chapter_dir.join("1.png").exists());
        assert!(chapter_dir.join("2.png").exists());
        assert!(!temp_dir.path().join("Foo Bar").join("chapter 2").exists());

        let mut urls = fetcher.urls.lock().unwrap().clone();
        urls.sort();
        assert_eq!(
            urls,
            vec![
                "https://img.example/data/h1/x1.png",
                "https://img.example/data/h1/x2.png"
            ]
        );

        // Chapters are handshaken in sorted order
        assert_eq!(
            pipeline.catalog().calls(),
            vec!["search:Foo", "aggregate:a1", "handshake:c1", "handshake:c2"]
        );
        assert_eq!(
            sink.stages(),
            vec![
                PipelineStage::Searching,
                PipelineStage::AwaitingSelection,
                PipelineStage::Aggregating,
                PipelineStage::FetchingImages,
                PipelineStage::BuildingTasks,
                PipelineStage::Downloading,
                PipelineStage::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_rerun_skips_existing_pages() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = Arc::new(FakeFetcher::default());
        let pipeline = pipeline(temp_dir.path(), FakeCatalog::default(), Arc::clone(&fetcher), false);

        pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "1"]), &NullSink)
            .await
            .unwrap();
        let second = pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "1"]), &NullSink)
            .await
            .unwrap();

        let report = second.report().unwrap();
        assert_eq!(report.downloads.skipped, 2);
        assert_eq!(report.attempted_downloads(), 0);
        assert_eq!(fetcher.urls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_selection_zero_stops_after_search() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline(
            temp_dir.path(),
            FakeCatalog::default(),
            Arc::new(FakeFetcher::default()),
            false,
        );

        let outcome = pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "0"]), &NullSink)
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::NoSelection));
        assert_eq!(pipeline.catalog().calls(), vec!["search:Foo"]);
        assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_invalid_selection_is_an_input_error() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline(
            temp_dir.path(),
            FakeCatalog::default(),
            Arc::new(FakeFetcher::default()),
            false,
        );

        let not_a_number = pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "first"]), &NullSink)
            .await;
        assert!(matches!(
            not_a_number,
            Err(AppError::Input(InputError::NotANumber { .. }))
        ));

        let out_of_range = pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "5"]), &NullSink)
            .await;
        assert!(matches!(
            out_of_range,
            Err(AppError::Input(InputError::OutOfRange { selection: 5, max: 1 }))
        ));
    }

    #[tokio::test]
    async fn test_failed_search_ends_without_prompting() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = FakeCatalog {
            fail_search: true,
            ..Default::default()
        };
        let pipeline = pipeline(temp_dir.path(), catalog, Arc::new(FakeFetcher::default()), false);
        let sink = MemorySink::new();

        // No selection answer is scripted; asking for one would fail the run
        let outcome = pipeline
            .run(&mut ScriptedPrompt::new(["Foo"]), &sink)
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::NoResults { query } if query == "Foo"));
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::SearchFailed { .. })));
    }

    #[tokio::test]
    async fn test_dry_run_plans_without_touching_disk() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("out");
        let fetcher = Arc::new(FakeFetcher::default());
        let pipeline = pipeline(&root, FakeCatalog::default(), Arc::clone(&fetcher), true);

        let outcome = pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "1"]), &NullSink)
            .await
            .unwrap();

        let PipelineOutcome::Planned { tasks, report } = outcome else {
            panic!("expected a planned run");
        };
        assert_eq!(tasks.len(), 2);
        assert_eq!(report.tasks_total, 2);
        assert_eq!(
            tasks[0].destination_path,
            root.join("Foo Bar").join("chapter 1").join("1.png")
        );
        assert!(!root.exists());
        assert!(fetcher.urls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_before_search_makes_no_calls() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = Arc::new(FakeFetcher::default());
        let shutdown = ShutdownSignal::new();
        let pipeline = pipeline(temp_dir.path(), FakeCatalog::default(), Arc::clone(&fetcher), false)
            .with_shutdown(shutdown.clone());
        shutdown.trigger();
        let sink = MemorySink::new();

        let outcome = pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "1"]), &sink)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PipelineOutcome::Interrupted {
                stage: PipelineStage::Searching
            }
        ));
        assert!(pipeline.catalog().calls().is_empty());
        assert!(fetcher.urls.lock().unwrap().is_empty());
        assert_eq!(sink.stages(), vec![PipelineStage::Searching, PipelineStage::Done]);
        assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_shutdown_during_search_skips_aggregate() {
        let temp_dir = TempDir::new().unwrap();
        let shutdown = ShutdownSignal::new();
        let catalog = FakeCatalog {
            shutdown_during: Some(("search", shutdown.clone())),
            ..Default::default()
        };
        let pipeline = pipeline(temp_dir.path(), catalog, Arc::new(FakeFetcher::default()), false)
            .with_shutdown(shutdown);

        let outcome = pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "1"]), &NullSink)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PipelineOutcome::Interrupted {
                stage: PipelineStage::AwaitingSelection
            }
        ));
        assert_eq!(pipeline.catalog().calls(), vec!["search:Foo"]);
    }

    /// Prompt that requests shutdown instead of answering, like Ctrl+C at a
    /// terminal prompt
    struct AbortingPrompt(ShutdownSignal);

    impl Prompt for AbortingPrompt {
        fn prompt_string(&mut self, _message: &str) -> std::result::Result<String, InputError> {
            Ok("Foo".to_string())
        }

        fn prompt_int(&mut self, _message: &str) -> std::result::Result<i64, InputError> {
            self.0.trigger();
            Err(InputError::Interrupted)
        }
    }

    #[tokio::test]
    async fn test_interrupted_selection_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let shutdown = ShutdownSignal::new();
        let pipeline = pipeline(
            temp_dir.path(),
            FakeCatalog::default(),
            Arc::new(FakeFetcher::default()),
            false,
        )
        .with_shutdown(shutdown.clone());

        let outcome = pipeline
            .run(&mut AbortingPrompt(shutdown), &NullSink)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PipelineOutcome::Interrupted {
                stage: PipelineStage::AwaitingSelection
            }
        ));
        assert_eq!(pipeline.catalog().calls(), vec!["search:Foo"]);
    }

    #[tokio::test]
    async fn test_shutdown_after_aggregate_cancels_handshakes() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = Arc::new(FakeFetcher::default());
        let shutdown = ShutdownSignal::new();
        let catalog = FakeCatalog {
            shutdown_during: Some(("aggregate", shutdown.clone())),
            ..Default::default()
        };
        let pipeline = pipeline(temp_dir.path(), catalog, Arc::clone(&fetcher), false)
            .with_shutdown(shutdown);

        let outcome = pipeline
            .run(&mut ScriptedPrompt::new(["Foo", "1"]), &NullSink)
            .await
            .unwrap();

        let report = outcome.report().unwrap();
        assert_eq!(report.chapter_warnings.len(), 2);
        assert_eq!(report.tasks_total, 0);
        assert!(fetcher.urls.lock().unwrap().is_empty());
        assert_eq!(pipeline.catalog().calls(), vec!["search:Foo", "aggregate:a1"]);
    }

    #[test]
    fn test_select_bounds() {
        let results = vec![
            SearchResult {
                id: "a".to_string(),
                display_title: "A".to_string(),
            },
            SearchResult {
                id: "b".to_string(),
                display_title: "B".to_string(),
            },
        ];
        assert_eq!(select(&results, 0).unwrap(), None);
        assert_eq!(select(&results, 2).unwrap().unwrap().id, "b");
        assert!(select(&results, 3).is_err());
        assert!(select(&results, -1).is_err());
    }
}
