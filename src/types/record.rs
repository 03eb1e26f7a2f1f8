//! FileRecord - metadata snapshot of one file on one side of the sync

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Metadata snapshot of a single file
///
/// Records are created fresh on every scan and discarded when the invocation
/// ends; only *completion* state is cached across runs (in the resume ledger),
/// never metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileRecord {
    /// File size in bytes (0 if the file could not be stat'ed)
    pub size: u64,

    /// Last modification time (seconds-level precision is all that is relied on)
    pub mtime: SystemTime,

    /// False if the path could not be stat'ed (permission error, race, or
    /// absent) - treated as "absent" rather than an error
    pub exists: bool,
}

impl FileRecord {
    /// Create a record for a file known to exist
    pub fn new(size: u64, mtime: SystemTime) -> Self {
        Self {
            size,
            mtime,
            exists: true,
        }
    }

    /// Record for a path that does not exist (or could not be read)
    pub fn absent() -> Self {
        Self {
            size: 0,
            mtime: UNIX_EPOCH,
            exists: false,
        }
    }

    /// Stat a path, mapping any failure to an absent record
    pub fn stat(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(metadata) => Self {
                size: metadata.len(),
                mtime: metadata.modified().unwrap_or(UNIX_EPOCH),
                exists: true,
            },
            Err(_) => Self::absent(),
        }
    }
}
