//! Directory scanning

use crate::filter::PathFilter;
use crate::stats::{Counter, SyncStats};
use crate::types::{relative_key, FileRecord, ScanResult, SyncError};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, warn};

/// Cooperative cancellation flag shared between the driver and the scan/copy
/// loops. Set once, checked often, never cleared mid-run.
pub type CancelFlag = Arc<AtomicBool>;

/// Walk a directory tree and build a ScanResult of every file that survives
/// the filter.
///
/// Excluded directories are pruned before descent, so their contents are
/// never stat'd. Per-file metadata failures are logged and skipped; the scan
/// keeps going. A missing root yields an empty result rather than an error
/// so that a first run against a fresh destination works without setup.
///
/// # Errors
/// * `SyncError::Cancelled` if the cancel flag is raised mid-scan
pub fn scan_tree(
    root_path: &Path,
    filter: &PathFilter,
    stats: &SyncStats,
    cancel: Option<&CancelFlag>,
) -> Result<ScanResult, SyncError> {
    let mut result = ScanResult::new(root_path.to_path_buf());

    if !root_path.is_dir() {
        error!("scan root {} does not exist", root_path.display());
        return Ok(result);
    }

    // Prune excluded subtrees during traversal instead of filtering results
    // afterwards, otherwise a reserved system directory would still be walked.
    let entry_filter = {
        let filter = filter.clone();
        let root = root_path.to_path_buf();
        move |entry: &ignore::DirEntry| {
            if entry.depth() == 0 {
                return true;
            }
            let relative = match entry.path().strip_prefix(&root) {
                Ok(p) => p,
                Err(_) => return true,
            };
            if filter.is_excluded(relative) {
                return false;
            }
            !filter.is_hidden(entry.path())
        }
    };

    let walker = ignore::WalkBuilder::new(root_path)
        .standard_filters(false)
        .filter_entry(entry_filter)
        .build();

    for walk_result in walker {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(SyncError::Cancelled);
            }
        }

        let entry = match walk_result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("error during traversal, continuing: {}", e);
                continue;
            }
        };

        let file_type = match entry.file_type() {
            Some(ft) => ft,
            None => continue,
        };
        if !file_type.is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!(
                    "cannot read metadata for {}, skipping: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };

        let relative = match entry.path().strip_prefix(root_path) {
            Ok(p) => relative_key(p),
            Err(_) => {
                warn!(
                    "{} is outside the scan root, skipping",
                    entry.path().display()
                );
                continue;
            }
        };

        let mtime = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    "no modification time for {}, skipping: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };

        let size = metadata.len();
        result.insert(relative, FileRecord::new(size, mtime));
        stats.increment(Counter::Scanned);
        stats.add(Counter::TotalSize, size);
    }

    Ok(result)
}
