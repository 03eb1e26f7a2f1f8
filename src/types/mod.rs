//! Core type definitions for treesync

mod error;
mod record;
mod task;
mod tree;

pub use error::SyncError;
pub use record::FileRecord;
pub use task::{CopyTask, TaskKind};
pub use tree::{relative_key, ScanResult};
