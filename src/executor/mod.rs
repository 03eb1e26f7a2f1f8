//! Copy plan execution

mod copy;
mod pool;

pub use copy::{copy_with_retry, COPY_ATTEMPTS};
pub use pool::CopyPool;

use crate::config::SyncOptions;
use crate::hash::content_hash;
use crate::scanner::CancelFlag;
use crate::state::ResumeLedger;
use crate::stats::{Counter, Summary, SyncStats};
use crate::types::{CopyTask, SyncError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, warn};

/// Progress callback cadence, in completed tasks
pub const PROGRESS_EVERY: usize = 10;

/// Ledger checkpoint cadence, in completed tasks
pub const LEDGER_SAVE_EVERY: usize = 100;

/// Default copy worker count
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Callback invoked with (completed, total) as the run progresses
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Execute a copy plan and return the final counter summary.
///
/// With `concurrency <= 1` tasks run on the calling thread in plan order;
/// otherwise they fan out over a bounded worker pool. Per-file failures are
/// counted and logged, never propagated, so one unreadable file cannot sink
/// the run. The ledger is checkpointed every [`LEDGER_SAVE_EVERY`] tasks and
/// once more at the end.
pub fn run_copy(
    plan: Vec<CopyTask>,
    options: &SyncOptions,
    ledger: Option<Arc<ResumeLedger>>,
    stats: &Arc<SyncStats>,
    on_progress: Option<Arc<ProgressFn>>,
    cancel: Option<&CancelFlag>,
) -> Result<Summary, SyncError> {
    let total = plan.len();

    if options.concurrency <= 1 {
        let mut succeeded = 0usize;
        for (idx, task) in plan.into_iter().enumerate() {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    checkpoint_ledger(ledger.as_deref());
                    return Err(SyncError::Cancelled);
                }
            }

            if process_task(&task, ledger.as_deref(), stats) {
                succeeded += 1;
                if succeeded % LEDGER_SAVE_EVERY == 0 {
                    checkpoint_ledger(ledger.as_deref());
                }
            }

            let done = idx + 1;
            if done % PROGRESS_EVERY == 0 || done == total {
                if let Some(callback) = &on_progress {
                    callback(done, total);
                }
            }
        }
    } else {
        let context = Arc::new(pool::WorkerContext {
            ledger: ledger.clone(),
            stats: Arc::clone(stats),
            processed: std::sync::atomic::AtomicUsize::new(0),
            succeeded: std::sync::atomic::AtomicUsize::new(0),
            total,
            on_progress,
        });

        let queue_capacity = options.concurrency * 8;
        let pool = CopyPool::new(options.concurrency, queue_capacity, context)?;

        for task in plan {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    // Let in-flight copies finish so no file is left torn
                    pool.close_and_wait()?;
                    checkpoint_ledger(ledger.as_deref());
                    return Err(SyncError::Cancelled);
                }
            }
            pool.enqueue(task)?;
        }

        pool.close_and_wait()?;
    }

    checkpoint_ledger(ledger.as_deref());

    Ok(stats.summary())
}

/// Copy one planned file and record the outcome in the counters. Returns
/// whether the task completed successfully.
///
/// When hash verification is on and the destination already exists, matching
/// content hashes complete the task without touching the destination.
pub(crate) fn process_task(
    task: &CopyTask,
    ledger: Option<&ResumeLedger>,
    stats: &SyncStats,
) -> bool {
    if task.verify_hash && task.dest_path.exists() {
        let source_hash = content_hash(&task.source_path);
        let dest_hash = content_hash(&task.dest_path);
        if let (Some(src), Some(dst)) = (source_hash, dest_hash) {
            if src == dst {
                stats.increment(Counter::Copied);
                if let Some(ledger) = ledger {
                    ledger.mark_completed(&task.relative_path);
                }
                return true;
            }
        }
    }

    match copy_with_retry(&task.source_path, &task.dest_path) {
        Ok(bytes) => {
            stats.increment(Counter::Copied);
            stats.add(Counter::CopiedSize, bytes);
            if let Some(ledger) = ledger {
                ledger.mark_completed(&task.relative_path);
            }
            true
        }
        Err(e) => {
            error!("failed to copy {}: {}", task.relative_path, e);
            stats.increment(Counter::Failed);
            false
        }
    }
}

/// Best-effort ledger save. A failed checkpoint costs resume granularity,
/// not correctness, so it is logged rather than propagated.
fn checkpoint_ledger(ledger: Option<&ResumeLedger>) {
    if let Some(ledger) = ledger {
        if let Err(e) = ledger.save() {
            warn!("cannot checkpoint resume state: {}", e);
        }
    }
}
