//! Persisted board preferences.
//!
//! The only thing this core writes to disk: the last board the user had
//! open, so the active-board fallback can stick across restarts. Stored as
//! a small JSON file under the configured data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_PREFS_FILE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardPrefs {
    #[serde(default)]
    pub last_board_id: Option<String>,
}

pub struct PrefsStorage {
    path: PathBuf,
}

impl PrefsStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(BOARD_PREFS_FILE),
        }
    }

    /// Load preferences; any read or parse failure yields the default.
    pub fn load(&self) -> BoardPrefs {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return BoardPrefs::default();
        };
        match serde_json::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!("discarding unreadable board prefs: {}", e);
                BoardPrefs::default()
            }
        }
    }

    /// Write-to-temp-then-rename so a crash mid-write never leaves a
    /// truncated prefs file behind.
    pub fn save(&self, prefs: &BoardPrefs) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(prefs)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)
    }
}
