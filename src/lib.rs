//! # treesync - resumable directory tree synchronization
//!
//! One-way mirror of a source tree into a destination tree: scan both sides,
//! plan the minimal set of copies, execute them with retry and atomic
//! writes, and checkpoint completion state so an interrupted run picks up
//! where it left off.

pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod filter;
pub mod hash;
pub mod logging;
pub mod scanner;
pub mod state;
pub mod stats;
pub mod types;
pub mod ui;

pub use config::SyncOptions;
pub use diff::{compare_trees, needs_update, plan_sync, TreeComparison};
pub use scanner::{scan_tree, CancelFlag};
pub use state::ResumeLedger;
pub use stats::{Summary, SyncStats};
pub use types::{CopyTask, FileRecord, ScanResult, SyncError, TaskKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
