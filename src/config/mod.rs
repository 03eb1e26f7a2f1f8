//! Run options and persisted user preferences

use crate::state::STATE_FILE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for a single sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Compare file content hashes before copying updates
    pub verify_hash: bool,

    /// Number of concurrent copy workers (1 = sequential)
    pub concurrency: usize,

    /// Skip files the resume ledger already recorded as completed
    pub resume: bool,

    /// Plan only, touch nothing
    pub dry_run: bool,

    /// Extra exclude globs on top of the built-in denylists
    pub exclude: Vec<String>,

    /// Where the resume ledger lives
    pub state_path: PathBuf,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            verify_hash: false,
            concurrency: 4,
            resume: true,
            dry_run: false,
            exclude: Vec::new(),
            state_path: PathBuf::from(STATE_FILE),
        }
    }
}

/// File name for persisted preferences
pub const PREFS_FILE: &str = "treesync_prefs.json";

/// User preferences persisted across runs, separate from per-run options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: String,
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "mocha".to_string(),
            language: "en".to_string(),
        }
    }
}

impl Preferences {
    /// Load preferences from disk. A missing or unreadable file yields
    /// defaults; preferences are convenience, never a reason to fail.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(prefs) => prefs,
                Err(e) => {
                    warn!("preferences file {} is invalid, using defaults: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, json)
    }

    /// Whether terminal output should be colored
    pub fn use_color(&self) -> bool {
        !matches!(self.theme.as_str(), "none" | "plain")
    }
}
