//! Pipeline configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::app::download::SchedulerConfig;
use crate::constants::{files, limits};

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory for downloaded titles
    pub output_dir: PathBuf,
    /// Minimum delay between the starts of two handshakes
    pub handshake_delay: Duration,
    /// Page download settings
    pub scheduler: SchedulerConfig,
    /// Stop after building tasks, without creating folders or downloading
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(files::DOWNLOAD_DIR),
            handshake_delay: limits::HANDSHAKE_DELAY,
            scheduler: SchedulerConfig::default(),
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("download"));
        assert_eq!(config.handshake_delay, Duration::from_secs(2));
        assert_eq!(config.scheduler.max_concurrency, 10);
        assert!(!config.dry_run);
    }
}
