//! Per-file change detection

use crate::types::FileRecord;
use std::time::{Duration, SystemTime};

/// Filesystems store mtimes at different granularities (FAT rounds to 2s),
/// so a copy can land with an mtime up to this far from its source and
/// still be the same file.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(2);

/// Decide whether a source file needs copying over its destination record.
///
/// A missing destination always needs a copy. Otherwise the files differ
/// when sizes differ or when their mtimes are more than [`MTIME_TOLERANCE`]
/// apart, in either direction.
pub fn needs_update(source: &FileRecord, dest: &FileRecord) -> bool {
    if !dest.exists {
        return true;
    }
    if source.size != dest.size {
        return true;
    }
    mtime_delta(source.mtime, dest.mtime) > MTIME_TOLERANCE
}

/// Absolute distance between two timestamps
fn mtime_delta(a: SystemTime, b: SystemTime) -> Duration {
    a.duration_since(b)
        .or_else(|_| b.duration_since(a))
        .unwrap_or(Duration::ZERO)
}
