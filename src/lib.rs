//! Manga Fetcher Library
//!
//! Search the MangaDex catalog, resolve every chapter of a chosen manga to
//! its page images and download them into a predictable folder layout.
//! Handshakes with the image service are paced, page downloads run with
//! bounded parallelism, and pages already on disk are never fetched again.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_MAX_CONCURRENCY, 10);
        assert_eq!(env::USERNAME, "MANGADEX_USERNAME");
        assert!(USER_AGENT.contains("Manga-Fetcher"));
    }

    #[test]
    fn test_error_types() {
        let input_error = errors::InputError::NotANumber {
            input: "abc".to_string(),
        };
        let app_error = AppError::Input(input_error);

        assert_eq!(app_error.category(), "input");
        assert!(!app_error.is_recoverable());
        assert_eq!(app_error.exit_code(), 2);
    }
}
