//! Error types for Manga Fetcher
//!
//! Per-item network failures are recoverable and are turned into data at the
//! pipeline stage that observes them. Only input and fatal errors terminate a
//! run, and those surface through [`AppError`].

use std::path::PathBuf;
use thiserror::Error;

/// Catalog API errors (search, aggregate, handshake)
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request to {url} timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    /// Server answered with a non-success status
    #[error("Catalog responded with HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Response decoded but lacked a required field
    #[error("{context} response is missing '{field}'")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },

    /// URL could not be built from the configured base
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

/// Page download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Image server answered with a non-success status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// I/O error during file operations
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// Run was aborted before the task finished
    #[error("Download cancelled")]
    Cancelled,
}

/// Authentication errors for the optional token exchange
#[derive(Error, Debug)]
pub enum AuthError {
    /// One or more credential variables are not set
    #[error("Missing MangaDex credentials: {missing}")]
    MissingCredentials { missing: String },

    /// HTTP request failed during authentication
    #[error("HTTP request failed during authentication: {0}")]
    Http(#[from] reqwest::Error),

    /// Token endpoint refused the grant
    #[error("Token endpoint rejected the credentials with HTTP {status}")]
    Rejected { status: u16 },

    /// Token endpoint answered without an access token
    #[error("Token response did not contain an access token")]
    MissingToken,
}

/// Local storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Directory could not be created or accessed
    #[error("Directory not accessible: {path}: {source}")]
    DirectoryNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// User input errors at the selection prompt
#[derive(Error, Debug)]
pub enum InputError {
    /// Selection was not an integer
    #[error("Invalid input '{input}'. Please enter a valid number")]
    NotANumber { input: String },

    /// Selection was outside the listed results
    #[error("Invalid selection {selection}. Please enter a number between 0 and {max}")]
    OutOfRange { selection: i64, max: usize },

    /// Prompt could not be read
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Shutdown was requested while waiting for an answer
    #[error("Input interrupted")]
    Interrupted,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicit configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// User input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Catalog(_) | AppError::Auth(_) => true,
            AppError::Download(DownloadError::Http(_))
            | AppError::Download(DownloadError::ServerError { .. }) => true,
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Catalog(_) => "catalog",
            AppError::Download(_) => "download",
            AppError::Auth(_) => "authentication",
            AppError::Storage(_) => "storage",
            AppError::Input(_) => "input",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }

    /// Process exit status for an error that ends the run
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Input(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Storage result type alias
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_exit_with_usage_status() {
        let error = AppError::from(InputError::OutOfRange {
            selection: 7,
            max: 3,
        });
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.category(), "input");
        assert!(!error.is_recoverable());
        assert!(error.to_string().contains("between 0 and 3"));
    }

    #[test]
    fn test_storage_errors_are_fatal() {
        let error = AppError::from(StorageError::DirectoryNotAccessible {
            path: PathBuf::from("/root/download"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert_eq!(error.exit_code(), 1);
        assert_eq!(error.category(), "storage");
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_catalog_errors_are_recoverable() {
        let error = AppError::from(CatalogError::Status {
            status: 503,
            url: "https://api.mangadex.org/manga".to_string(),
        });
        assert!(error.is_recoverable());
        assert_eq!(error.category(), "catalog");
    }
}
