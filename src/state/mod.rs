//! Resume ledger - persisted record of files already successfully copied
//!
//! The ledger trades correctness for resume speed: a path marked completed is
//! never re-verified against the destination, even if the destination copy is
//! deleted or modified out-of-band between runs. Callers who cannot accept
//! that should run with resume disabled or clear the state first.

use crate::types::SyncError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

/// Default state file name
pub const STATE_FILE: &str = "sync_state.json";

/// On-disk format: completed path list plus the time of the last save
#[derive(Debug, Serialize, Deserialize)]
struct LedgerFile {
    completed_files: Vec<String>,
    timestamp: String,
}

/// Set of relative paths already copied and verified, persisted to a single
/// JSON state file. Shared between copy workers; only grows within a run.
///
/// A path must only be marked completed after its copy+verify succeeded.
#[derive(Debug)]
pub struct ResumeLedger {
    state_path: PathBuf,
    completed: Mutex<HashSet<String>>,
}

impl ResumeLedger {
    /// Create an empty ledger without reading the state file
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
            completed: Mutex::new(HashSet::new()),
        }
    }

    /// Load prior completion state. A missing or corrupt state file starts
    /// the ledger empty - resuming is best-effort, never fatal.
    pub fn load(state_path: impl Into<PathBuf>) -> Self {
        let ledger = Self::new(state_path);

        if !ledger.state_path.exists() {
            return ledger;
        }

        match fs::read_to_string(&ledger.state_path) {
            Ok(content) => match serde_json::from_str::<LedgerFile>(&content) {
                Ok(data) => {
                    let mut set = ledger.set();
                    set.extend(data.completed_files);
                    info!("resume state loaded: {} completed file(s)", set.len());
                }
                Err(e) => {
                    warn!(
                        "resume state {} is corrupt, starting empty: {}",
                        ledger.state_path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                warn!(
                    "cannot read resume state {}, starting empty: {}",
                    ledger.state_path.display(),
                    e
                );
            }
        }

        ledger
    }

    /// Check whether a relative path finished in a prior (or this) run
    pub fn is_completed(&self, relative_path: &str) -> bool {
        self.set().contains(relative_path)
    }

    /// Record a successfully copied and verified path
    pub fn mark_completed(&self, relative_path: &str) {
        self.set().insert(relative_path.to_string());
    }

    /// Number of completed paths currently tracked
    pub fn len(&self) -> usize {
        self.set().len()
    }

    pub fn is_empty(&self) -> bool {
        self.set().is_empty()
    }

    /// Rewrite the state file wholesale.
    ///
    /// Writes to a temporary sibling and renames into place, so an interrupt
    /// mid-save can never leave a torn file - only fully-written saves exist.
    pub fn save(&self) -> Result<(), SyncError> {
        // Held across the write and rename so concurrent checkpoints cannot
        // interleave on the shared temp file.
        let guard = self.set();
        let mut completed: Vec<String> = guard.iter().cloned().collect();
        completed.sort();

        let data = LedgerFile {
            completed_files: completed,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| SyncError::Ledger(format!("cannot serialize resume state: {}", e)))?;

        let tmp_path = self.state_path.with_extension("json.part");
        fs::write(&tmp_path, json).map_err(|e| {
            SyncError::Ledger(format!("cannot write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.state_path).map_err(|e| {
            SyncError::Ledger(format!(
                "cannot move state into place at {}: {}",
                self.state_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Empty the in-memory set and delete the state file if present
    pub fn clear(&self) -> Result<(), SyncError> {
        self.set().clear();

        match fs::remove_file(&self.state_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SyncError::Ledger(format!(
                "cannot delete {}: {}",
                self.state_path.display(),
                e
            ))),
        }
    }

    /// Path of the backing state file
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    fn set(&self) -> MutexGuard<'_, HashSet<String>> {
        self.completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
