//! Bounded worker pool for page downloads
//!
//! Pending tasks sit in one shared queue. A fixed number of workers pull from
//! it, each with at most one fetch in flight, and send outcomes over a channel
//! to a single collector. The worker count is therefore the concurrency bound.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use super::fetcher::{download_atomically, remove_temp_file, PageFetcher};
use crate::app::events::{PipelineEvent, ProgressSink};
use crate::app::models::{DownloadOutcome, DownloadTask};
use crate::app::paths::PathResolver;
use crate::app::signals::ShutdownSignal;
use crate::constants::workers;
use crate::errors::DownloadError;

/// Configuration for the download scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum number of fetches in flight at once
    pub max_concurrency: usize,
    /// Outcome channel buffer size
    pub outcome_buffer_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: workers::DEFAULT_MAX_CONCURRENCY,
            outcome_buffer_size: workers::OUTCOME_BUFFER_SIZE,
        }
    }
}

type SharedQueue = Arc<Mutex<VecDeque<DownloadTask>>>;

/// Downloads missing pages with bounded parallelism
#[derive(Debug)]
pub struct DownloadScheduler<F> {
    fetcher: Arc<F>,
    config: SchedulerConfig,
    shutdown: ShutdownSignal,
}

impl<F: PageFetcher + 'static> DownloadScheduler<F> {
    pub fn new(fetcher: Arc<F>, config: SchedulerConfig) -> Self {
        Self {
            fetcher,
            config,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Stop taking new tasks once `shutdown` is triggered
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Download every task whose destination is missing
    ///
    /// Returns one outcome per input task, in completion order. Tasks whose
    /// destination already exists are reported as skipped without any
    /// request. Failures are reported, never retried.
    pub async fn download_all(
        &self,
        tasks: Vec<DownloadTask>,
        sink: &dyn ProgressSink,
    ) -> Vec<DownloadOutcome> {
        let mut outcomes = Vec::with_capacity(tasks.len());

        let (existing, pending): (Vec<_>, Vec<_>) = tasks
            .into_iter()
            .partition(|task| PathResolver::missing([task.destination_path.as_path()]).is_empty());

        for task in existing {
            let outcome = DownloadOutcome::skipped(task);
            sink.emit(PipelineEvent::PageFinished(outcome.clone()));
            outcomes.push(outcome);
        }

        if pending.is_empty() {
            debug!("Nothing to download, all {} pages present", outcomes.len());
            return outcomes;
        }

        let worker_count = self.config.max_concurrency.max(1).min(pending.len());
        info!(
            "Downloading {} pages with {} workers ({} already present)",
            pending.len(),
            worker_count,
            outcomes.len()
        );

        let queue: SharedQueue = Arc::new(Mutex::new(pending.into_iter().collect()));
        let (outcome_tx, mut outcome_rx) =
            mpsc::channel::<DownloadOutcome>(self.config.outcome_buffer_size.max(1));

        let handles: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                let fetcher = Arc::clone(&self.fetcher);
                let queue = Arc::clone(&queue);
                let outcome_tx = outcome_tx.clone();
                let shutdown = self.shutdown.clone();
                tokio::spawn(async move {
                    run_worker(worker_id, fetcher, queue, outcome_tx, shutdown).await
                })
            })
            .collect();
        drop(outcome_tx);

        while let Some(outcome) = outcome_rx.recv().await {
            sink.emit(PipelineEvent::PageFinished(outcome.clone()));
            outcomes.push(outcome);
        }

        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!("Download worker terminated unexpectedly: {}", e);
            }
        }

        // Anything left was never started because of a shutdown request
        let abandoned: Vec<DownloadTask> = queue.lock().await.drain(..).collect();
        if !abandoned.is_empty() {
            info!("Shutdown requested, {} pages not started", abandoned.len());
        }
        for task in abandoned {
            let outcome = DownloadOutcome::failed(task, DownloadError::Cancelled.to_string());
            sink.emit(PipelineEvent::PageFinished(outcome.clone()));
            outcomes.push(outcome);
        }

        outcomes
    }
}

async fn run_worker<F: PageFetcher>(
    worker_id: usize,
    fetcher: Arc<F>,
    queue: SharedQueue,
    outcome_tx: mpsc::Sender<DownloadOutcome>,
    shutdown: ShutdownSignal,
) {
    debug!("Download worker {} starting", worker_id);

    loop {
        if shutdown.is_requested() {
            debug!("Download worker {} received shutdown signal", worker_id);
            break;
        }

        let Some(task) = queue.lock().await.pop_front() else {
            break;
        };

        let outcome = run_task(fetcher.as_ref(), task, &shutdown).await;
        if outcome_tx.send(outcome).await.is_err() {
            break;
        }
    }

    debug!("Download worker {} finished", worker_id);
}

async fn run_task<F: PageFetcher>(
    fetcher: &F,
    task: DownloadTask,
    shutdown: &ShutdownSignal,
) -> DownloadOutcome {
    let result = tokio::select! {
        result = download_atomically(fetcher, &task) => result,
        _ = shutdown.wait() => {
            remove_temp_file(&PathResolver::temp_path(&task.destination_path)).await;
            Err(DownloadError::Cancelled)
        }
    };

    match result {
        Ok(_) => DownloadOutcome::downloaded(task),
        Err(e) => DownloadOutcome::failed(task, e.to_string()),
    }
}
