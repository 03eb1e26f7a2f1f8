//! CopyTask - one planned file copy

use super::FileRecord;
use std::path::PathBuf;

/// Why a task was planned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// File exists in source, missing in destination
    New,

    /// File exists on both sides but differs
    Update,
}

/// A single planned copy, produced by planning and consumed exactly once by
/// the copy engine. Immutable once created.
#[derive(Debug, Clone)]
pub struct CopyTask {
    /// Normalized relative path (join key and ledger key)
    pub relative_path: String,

    /// Source-side metadata captured at scan time
    pub source: FileRecord,

    /// Absolute source path
    pub source_path: PathBuf,

    /// Absolute destination path
    pub dest_path: PathBuf,

    /// New vs Update classification
    pub kind: TaskKind,

    /// Hash both sides before copying; skip the copy when digests match
    pub verify_hash: bool,
}
