//! File path generation and organization
//!
//! Downloads are laid out as:
//! `{root}/{title}/chapter {chapter_number}/{page}.{extension}`
//!
//! Path derivation is a pure function of its inputs, so a re-run against the
//! same selection resolves to the same files and can skip what is already on
//! disk. Presence is checked by existence only; a corrupt file left by some
//! other tool is indistinguishable from a complete one.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::files;
use crate::errors::{StorageError, StorageResult};

/// Whether a directory had to be created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    Created,
    Existing,
}

/// A chapter directory that is known to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterDirectory {
    pub path: PathBuf,
    /// Informational only; callers do not branch on it
    pub status: DirectoryStatus,
}

/// Path generation utility for downloaded pages
pub struct PathResolver;

impl PathResolver {
    /// Directory of a chapter, without touching the file system
    pub fn chapter_path(root: &Path, title: &str, chapter_number: &str) -> PathBuf {
        root.join(Self::sanitize_component(title)).join(format!(
            "{}{}",
            files::CHAPTER_DIR_PREFIX,
            Self::sanitize_component(chapter_number)
        ))
    }

    /// Resolve a chapter directory and create it (with parents) if absent
    ///
    /// Creating an already existing directory is not an error.
    pub async fn chapter_directory(
        root: &Path,
        title: &str,
        chapter_number: &str,
    ) -> StorageResult<ChapterDirectory> {
        let path = Self::chapter_path(root, title, chapter_number);
        let status = Self::ensure_directory(&path).await?;
        Ok(ChapterDirectory { path, status })
    }

    /// Create `path` and its parents if they are missing
    pub async fn ensure_directory(path: &Path) -> StorageResult<DirectoryStatus> {
        let existed = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);

        if existed {
            return Ok(DirectoryStatus::Existing);
        }

        tokio::fs::create_dir_all(path)
            .await
            .map_err(|source| StorageError::DirectoryNotAccessible {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Created directory {}", path.display());
        Ok(DirectoryStatus::Created)
    }

    /// File path of a page; `page_index` is zero-based, file names start at 1
    pub fn page_file_path(chapter_dir: &Path, page_index: usize, extension: &str) -> PathBuf {
        chapter_dir.join(format!("{}.{}", page_index + 1, extension))
    }

    /// Extension of a page as named by the image server
    ///
    /// Lower-cased; falls back to `png` for names without one.
    pub fn page_extension(file_name: &str) -> String {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| files::FALLBACK_EXTENSION.to_string())
    }

    /// The subset of `paths` not present on disk, in input order
    pub fn missing<'a, I>(paths: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        paths
            .into_iter()
            .filter(|path| !path.exists())
            .map(Path::to_path_buf)
            .collect()
    }

    /// In-progress location used while a page is being written
    ///
    /// The suffix is appended to the whole file name, so `3.png` becomes
    /// `3.png.tmp` and `page` becomes `page.tmp`.
    pub fn temp_path(destination: &Path) -> PathBuf {
        let mut name = destination
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(files::TEMP_FILE_SUFFIX);
        destination.with_file_name(name)
    }

    /// Make a title or chapter label safe to use as one path component
    ///
    /// The result is capped at [`files::MAX_COMPONENT_BYTES`] bytes, cut on a
    /// character boundary.
    pub fn sanitize_component(raw: &str) -> String {
        let replaced: String = raw
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        let trimmed = clean_edges(&replaced);
        let capped = clean_edges(truncate_on_char_boundary(trimmed, files::MAX_COMPONENT_BYTES));
        if capped.is_empty() {
            "_".to_string()
        } else {
            capped.to_string()
        }
    }
}

fn clean_edges(value: &str) -> &str {
    value.trim().trim_matches('.').trim()
}

/// Longest prefix of `value` that fits in `max_bytes`
fn truncate_on_char_boundary(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let end = value
        .char_indices()
        .map(|(index, c)| index + c.len_utf8())
        .take_while(|end| *end <= max_bytes)
        .last()
        .unwrap_or(0);
    &value[..end]
}
