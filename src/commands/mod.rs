//! CLI command entry points

mod compare;
mod sync;

pub use compare::run as run_compare;
pub use sync::{run as run_sync, SyncRequest};

use crate::state::ResumeLedger;
use crate::types::SyncError;
use std::path::Path;

/// Delete the resume state file so the next run starts from scratch
pub fn clear_state(state_path: &Path) -> Result<(), SyncError> {
    let ledger = ResumeLedger::new(state_path);
    ledger.clear()?;
    println!("Resume state cleared: {}", state_path.display());
    Ok(())
}
