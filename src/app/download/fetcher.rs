//! Page fetching and atomic file placement
//!
//! A [`PageFetcher`] streams one page body into an open file. The scheduler
//! always hands it a temporary file next to the destination and only renames
//! that file into place after the whole body was written, so a destination
//! that exists is always complete.

use std::future::Future;
use std::path::Path;

use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::app::models::DownloadTask;
use crate::app::paths::PathResolver;
use crate::errors::{DownloadError, DownloadResult};

/// Source of page bytes
pub trait PageFetcher: Send + Sync {
    /// Stream the body at `url` into `sink`, returning the bytes written
    fn fetch_into(
        &self,
        url: &str,
        sink: &mut File,
    ) -> impl Future<Output = DownloadResult<u64>> + Send;
}

/// Fetches pages over HTTP with the shared client
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// The client's request timeout applies to each page
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch_into(&self, url: &str, sink: &mut File) -> DownloadResult<u64> {
        let mut response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::ServerError {
                status: response.status().as_u16(),
            });
        }

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }
}

/// Download `task` through a temporary file and rename it into place
///
/// On any failure the temporary file is removed and the destination is left
/// untouched.
pub async fn download_atomically<F: PageFetcher>(
    fetcher: &F,
    task: &DownloadTask,
) -> DownloadResult<u64> {
    let destination = task.destination_path.as_path();
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = PathResolver::temp_path(destination);
    let result = write_then_rename(fetcher, &task.source_url, &temp_path, destination).await;

    if result.is_err() {
        remove_temp_file(&temp_path).await;
    }
    result
}

async fn write_then_rename<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    temp_path: &Path,
    destination: &Path,
) -> DownloadResult<u64> {
    let mut file = File::create(temp_path).await?;
    let written = fetcher.fetch_into(url, &mut file).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(temp_path, destination)
        .await
        .map_err(|_e| DownloadError::AtomicOperationFailed {
            temp_path: temp_path.to_path_buf(),
            final_path: destination.to_path_buf(),
        })?;

    tracing::debug!("Saved {} ({} bytes)", destination.display(), written);
    Ok(written)
}

/// Best-effort removal of an abandoned temporary file
pub async fn remove_temp_file(temp_path: &Path) {
    if tokio::fs::try_exists(temp_path).await.unwrap_or(false) {
        let _ = tokio::fs::remove_file(temp_path).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Writes part of a page and then fails, like a dropped connection
    struct BrokenStream;

    impl PageFetcher for BrokenStream {
        async fn fetch_into(&self, _url: &str, sink: &mut File) -> DownloadResult<u64> {
            sink.write_all(b"partial page bytes").await?;
            sink.flush().await?;
            Err(DownloadError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset mid-body",
            )))
        }
    }

    struct StaticPage(&'static [u8]);

    impl PageFetcher for StaticPage {
        async fn fetch_into(&self, _url: &str, sink: &mut File) -> DownloadResult<u64> {
            sink.write_all(self.0).await?;
            Ok(self.0.len() as u64)
        }
    }

    fn task_in(dir: &Path) -> DownloadTask {
        let chapter_dir = dir.join("Foo Bar").join("chapter 1");
        DownloadTask {
            source_url: "https://img/data/h1/x1.png".to_string(),
            destination_path: chapter_dir.join("1.png"),
            chapter_dir,
        }
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let task = task_in(temp_dir.path());

        let result = download_atomically(&BrokenStream, &task).await;
        assert!(result.is_err());
        assert!(!task.destination_path.exists());
        assert!(!PathResolver::temp_path(&task.destination_path).exists());
    }

    #[tokio::test]
    async fn test_successful_stream_is_renamed_into_place() {
        let temp_dir = TempDir::new().unwrap();
        let task = task_in(temp_dir.path());

        let written = download_atomically(&StaticPage(b"png-bytes"), &task)
            .await
            .unwrap();

        assert_eq!(written, 9);
        assert_eq!(std::fs::read(&task.destination_path).unwrap(), b"png-bytes");
        assert!(!PathResolver::temp_path(&task.destination_path).exists());
    }

    #[tokio::test]
    async fn test_http_fetcher_reports_transport_errors() {
        let temp_dir = TempDir::new().unwrap();
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_millis(200))
            .timeout(std::time::Duration::from_millis(500))
            .build()
            .unwrap();
        let mut task = task_in(temp_dir.path());
        task.source_url = "http://127.0.0.1:9/data/h1/x1.png".to_string();

        let result = download_atomically(&HttpPageFetcher::new(client), &task).await;
        assert!(matches!(result, Err(DownloadError::Http(_))));
        assert!(!task.destination_path.exists());
    }
}
