//! Application constants for Manga Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for configuration and credentials
pub mod env {
    /// Override for the catalog API base URL
    pub const API_URL: &str = "MANGADEX_API_URL";

    /// Override for the OAuth token endpoint
    pub const AUTH_URL: &str = "MANGADEX_AUTH_URL";

    /// OAuth client id for the personal API client
    pub const CLIENT_ID: &str = "MANGADEX_CLIENT_ID";

    /// OAuth client secret for the personal API client
    pub const CLIENT_SECRET: &str = "MANGADEX_CLIENT_SECRET";

    /// Account username for the password grant
    pub const USERNAME: &str = "MANGADEX_USERNAME";

    /// Account password for the password grant
    pub const PASSWORD: &str = "MANGADEX_PASSWORD";
}

/// MangaDex service URLs and query values
pub mod api {
    /// Catalog API base URL
    pub const BASE_URL: &str = "https://api.mangadex.org";

    /// OAuth token endpoint used for the password grant
    pub const AUTH_URL: &str =
        "https://auth.mangadex.org/realms/mangadex/protocol/openid-connect/token";

    /// Translated language the chapter aggregate is filtered to
    pub const DEFAULT_LANGUAGE: &str = "en";

    /// Path segment of the full-quality image set on the image server
    pub const IMAGE_QUALITY_SEGMENT: &str = "data";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("Manga-Fetcher/", env!("CARGO_PKG_VERSION"));

    /// Per-request timeout for catalog and image requests
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 16;
}

/// Rate limiting configuration
pub mod limits {
    use super::Duration;

    /// Minimum delay between the starts of two image-server handshakes
    pub const HANDSHAKE_DELAY: Duration = Duration::from_secs(2);

    /// How often a blocked terminal prompt checks for shutdown
    pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);
}

/// Download worker configuration
pub mod workers {
    /// Maximum number of concurrent page downloads
    pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

    /// Upper bound accepted for the concurrency setting
    pub const MAX_CONCURRENCY_LIMIT: usize = 64;

    /// Outcome channel buffer size
    pub const OUTCOME_BUFFER_SIZE: usize = 64;
}

/// File system layout constants
pub mod files {
    /// Default root directory for downloads
    pub const DOWNLOAD_DIR: &str = "download";

    /// Suffix appended to in-progress downloads
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Extension used when a page file name carries none
    pub const FALLBACK_EXTENSION: &str = "png";

    /// Longest title or chapter label kept in a path component, in bytes
    pub const MAX_COMPONENT_BYTES: usize = 200;

    /// Prefix of every chapter directory name
    pub const CHAPTER_DIR_PREFIX: &str = "chapter ";

    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "manga-fetcher.toml";

    /// Application directory under the user config dir
    pub const CONFIG_DIR_NAME: &str = "manga-fetcher";
}

// Re-export commonly used constants at the top level for convenience
pub use http::USER_AGENT;
pub use limits::HANDSHAKE_DELAY;
pub use workers::DEFAULT_MAX_CONCURRENCY;
