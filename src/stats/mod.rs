//! Thread-safe sync counters

use std::sync::Mutex;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Named counters tracked across a sync/compare invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Scanned,
    New,
    Updated,
    Copied,
    Failed,
    Skipped,
    TotalSize,
    CopiedSize,
}

/// Snapshot of all counters at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub scanned: u64,
    pub new: u64,
    pub updated: u64,
    pub copied: u64,
    pub failed: u64,
    pub skipped: u64,
    pub total_size: u64,
    pub copied_size: u64,
}

impl Summary {
    /// Total scanned size in gigabytes
    pub fn total_gb(&self) -> f64 {
        self.total_size as f64 / BYTES_PER_GB
    }

    /// Copied size in gigabytes
    pub fn copied_gb(&self) -> f64 {
        self.copied_size as f64 / BYTES_PER_GB
    }
}

/// Lock-protected counters shared between the scanner, planner, and copy
/// workers. Every increment is atomic with respect to concurrent workers;
/// readers only block for the critical section of one update.
#[derive(Debug, Default)]
pub struct SyncStats {
    inner: Mutex<Summary>,
}

impl SyncStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to a counter
    pub fn increment(&self, counter: Counter) {
        self.add(counter, 1);
    }

    /// Add an arbitrary amount to a counter
    pub fn add(&self, counter: Counter, amount: u64) {
        let mut inner = self.lock();
        let slot = match counter {
            Counter::Scanned => &mut inner.scanned,
            Counter::New => &mut inner.new,
            Counter::Updated => &mut inner.updated,
            Counter::Copied => &mut inner.copied,
            Counter::Failed => &mut inner.failed,
            Counter::Skipped => &mut inner.skipped,
            Counter::TotalSize => &mut inner.total_size,
            Counter::CopiedSize => &mut inner.copied_size,
        };
        *slot += amount;
    }

    /// Consistent snapshot of all counters
    pub fn summary(&self) -> Summary {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Summary> {
        // A poisoned lock only means a panicking thread held it mid-increment;
        // the counters themselves are still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
