//! Configuration management for Manga Fetcher
//!
//! Settings are layered, later sources winning:
//! 1. Built-in defaults
//! 2. Config file (`./manga-fetcher.toml`, then the user config directory,
//!    or an explicit `--config` path)
//! 3. Environment variables
//! 4. Command line flags

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::client::config::parse_url;
use crate::app::{ClientConfig, PipelineConfig, SchedulerConfig};
use crate::constants::{api, env, files, http, limits, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog API and HTTP client settings
    pub api: ApiConfigToml,
    /// Download layout and pacing settings
    pub download: DownloadConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfigToml {
    pub base_url: String,
    pub auth_url: String,
    /// Translated language the chapter list is filtered to
    pub language: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Connection pool idle timeout (absent = no timeout)
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Option<Duration>,
    pub pool_max_per_host: usize,
    pub tcp_nodelay: bool,
}

impl Default for ApiConfigToml {
    fn default() -> Self {
        Self {
            base_url: api::BASE_URL.to_string(),
            auth_url: api::AUTH_URL.to_string(),
            language: api::DEFAULT_LANGUAGE.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            tcp_nodelay: true,
        }
    }
}

/// TOML-friendly download configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DownloadConfigToml {
    /// Root directory for downloaded titles
    pub output_dir: PathBuf,
    /// Maximum page downloads in flight
    pub max_concurrency: usize,
    /// Minimum delay between handshake starts
    #[serde(with = "humantime_serde")]
    pub handshake_delay: Duration,
}

impl Default for DownloadConfigToml {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(files::DOWNLOAD_DIR),
            max_concurrency: workers::DEFAULT_MAX_CONCURRENCY,
            handshake_delay: limits::HANDSHAKE_DELAY,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parsed `level`; accepts trace, debug, info, warn or error
    pub fn default_level(&self) -> ConfigResult<tracing::Level> {
        self.level
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.level.clone(),
                reason: "Must be one of trace, debug, info, warn, error".to_string(),
            })
    }
}

/// Values given on the command line, applied last
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_dir: Option<PathBuf>,
    pub max_concurrency: Option<usize>,
    pub handshake_delay: Option<Duration>,
    pub language: Option<String>,
}

impl AppConfig {
    /// Load defaults, then the config file, then environment overrides
    ///
    /// An explicitly named file must exist; the default locations are
    /// optional.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Per-user config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides, looked up through `lookup`
    pub fn apply_env<L>(&mut self, lookup: L)
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::API_URL).filter(|v| !v.trim().is_empty()) {
            debug!("API URL overridden by {}", env::API_URL);
            self.api.base_url = url.trim().to_string();
        }
        if let Some(url) = lookup(env::AUTH_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Auth URL overridden by {}", env::AUTH_URL);
            self.api.auth_url = url.trim().to_string();
        }
    }

    /// Apply command line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.output_dir {
            self.download.output_dir = dir.clone();
        }
        if let Some(max) = overrides.max_concurrency {
            self.download.max_concurrency = max;
        }
        if let Some(delay) = overrides.handshake_delay {
            self.download.handshake_delay = delay;
        }
        if let Some(language) = &overrides.language {
            self.api.language = language.clone();
        }
    }

    /// Check values that would otherwise fail later in the run
    pub fn validate(&self) -> ConfigResult<()> {
        let max = self.download.max_concurrency;
        if max == 0 || max > workers::MAX_CONCURRENCY_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "download.max_concurrency".to_string(),
                value: max.to_string(),
                reason: format!("Must be between 1 and {}", workers::MAX_CONCURRENCY_LIMIT),
            });
        }

        if self.api.language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.language".to_string(),
                value: self.api.language.clone(),
                reason: "Must not be empty".to_string(),
            });
        }

        for (field, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.auth_url", &self.api.auth_url),
        ] {
            parse_url(value).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        self.logging.default_level()?;

        Ok(())
    }

    /// Runtime client configuration
    pub fn client_config(&self) -> ConfigResult<ClientConfig> {
        self.validate()?;
        let url = |field: &str, value: &str| {
            parse_url(value).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })
        };

        Ok(ClientConfig {
            api_base_url: url("api.base_url", &self.api.base_url)?,
            auth_url: url("api.auth_url", &self.api.auth_url)?,
            language: self.api.language.trim().to_string(),
            request_timeout: self.api.request_timeout,
            connect_timeout: self.api.connect_timeout,
            pool_idle_timeout: self.api.pool_idle_timeout,
            pool_max_per_host: self.api.pool_max_per_host,
            tcp_nodelay: self.api.tcp_nodelay,
        })
    }

    /// Runtime pipeline configuration
    pub fn pipeline_config(&self, dry_run: bool) -> PipelineConfig {
        PipelineConfig {
            output_dir: self.download.output_dir.clone(),
            handshake_delay: self.download.handshake_delay,
            scheduler: SchedulerConfig {
                max_concurrency: self.download.max_concurrency,
                ..Default::default()
            },
            dry_run,
        }
    }
}
