use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    API_BASE_URL, BOARDS_FRESH_FOR_SECS, CHANNEL_WATCHDOG_INTERVAL_MS, RECORDS_FRESH_FOR_SECS,
    SILENT_REFRESH_AFTER_SECS, TEAM_FRESH_FOR_SECS,
};
use crate::freshness::FreshnessWindow;

/// Freshness windows, one per store family. Configurable so embedders can
/// tighten transactional data or loosen team data without code changes.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessConfig {
    pub boards: FreshnessWindow,
    pub records: FreshnessWindow,
    pub team: FreshnessWindow,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        let silent = Duration::from_secs(SILENT_REFRESH_AFTER_SECS);
        Self {
            boards: FreshnessWindow::new(Duration::from_secs(BOARDS_FRESH_FOR_SECS), silent),
            records: FreshnessWindow::new(Duration::from_secs(RECORDS_FRESH_FOR_SECS), silent),
            team: FreshnessWindow::new(Duration::from_secs(TEAM_FRESH_FOR_SECS), silent),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub freshness: FreshnessConfig,
    pub watchdog_interval: Duration,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            data_dir: data_dir.as_ref().to_path_buf(),
            freshness: FreshnessConfig::default(),
            watchdog_interval: Duration::from_millis(CHANNEL_WATCHDOG_INTERVAL_MS),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new("opsboard_data")
    }
}
