//! Copy plan generation and tree comparison

use crate::config::SyncOptions;
use crate::diff::needs_update;
use crate::state::ResumeLedger;
use crate::stats::{Counter, SyncStats};
use crate::types::{CopyTask, FileRecord, ScanResult, TaskKind};

/// Build the list of copies that would bring the destination up to date with
/// the source.
///
/// The ledger is consulted first: a path it records as completed is skipped
/// without re-checking the destination, which is what makes resume fast on
/// large trees. Tasks come out in source scan order, so two runs over the
/// same trees produce the same plan.
pub fn plan_sync(
    source: &ScanResult,
    dest: &ScanResult,
    ledger: Option<&ResumeLedger>,
    options: &SyncOptions,
    stats: &SyncStats,
) -> Vec<CopyTask> {
    let mut tasks = Vec::new();

    for (relative_path, source_record) in source.iter() {
        if let Some(ledger) = ledger {
            if ledger.is_completed(relative_path) {
                stats.increment(Counter::Skipped);
                continue;
            }
        }

        let dest_record = dest
            .get(relative_path)
            .copied()
            .unwrap_or_else(FileRecord::absent);

        if !needs_update(source_record, &dest_record) {
            stats.increment(Counter::Skipped);
            continue;
        }

        let kind = if dest_record.exists {
            stats.increment(Counter::Updated);
            TaskKind::Update
        } else {
            stats.increment(Counter::New);
            TaskKind::New
        };

        tasks.push(CopyTask {
            relative_path: relative_path.clone(),
            source: *source_record,
            source_path: source.absolute_path(relative_path),
            dest_path: dest.absolute_path(relative_path),
            kind,
            verify_hash: options.verify_hash,
        });
    }

    tasks
}

/// Result of a read-only comparison of two trees
#[derive(Debug, Default, Clone)]
pub struct TreeComparison {
    /// Relative paths present only in the first tree
    pub only_in_a: Vec<String>,
    /// Relative paths present only in the second tree
    pub only_in_b: Vec<String>,
    /// Present in both with matching size and mtime
    pub identical: Vec<String>,
    /// Present in both but differing
    pub different: Vec<String>,
}

/// Compare two scanned trees without copying anything
pub fn compare_trees(a: &ScanResult, b: &ScanResult) -> TreeComparison {
    let mut comparison = TreeComparison::default();

    for (path, record_a) in a.iter() {
        match b.get(path) {
            None => comparison.only_in_a.push(path.clone()),
            Some(record_b) => {
                if needs_update(record_a, record_b) {
                    comparison.different.push(path.clone());
                } else {
                    comparison.identical.push(path.clone());
                }
            }
        }
    }

    for path in b.paths() {
        if !a.contains(path) {
            comparison.only_in_b.push(path.clone());
        }
    }

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};

    fn record(size: u64, secs: u64) -> FileRecord {
        FileRecord::new(size, UNIX_EPOCH + Duration::from_secs(secs))
    }

    fn tree(root: &str, files: &[(&str, u64, u64)]) -> ScanResult {
        let mut result = ScanResult::new(PathBuf::from(root));
        for (path, size, secs) in files {
            result.insert(path.to_string(), record(*size, *secs));
        }
        result
    }

    #[test]
    fn test_plan_classifies_new_and_updated() {
        let source = tree(
            "src",
            &[("a.txt", 10, 1_000), ("b.txt", 20, 1_000), ("c.txt", 30, 1_000)],
        );
        // b differs in size, c matches
        let dest = tree("dst", &[("b.txt", 25, 1_000), ("c.txt", 30, 1_000)]);

        let stats = SyncStats::new();
        let plan = plan_sync(&source, &dest, None, &SyncOptions::default(), &stats);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].relative_path, "a.txt");
        assert_eq!(plan[0].kind, TaskKind::New);
        assert_eq!(plan[1].relative_path, "b.txt");
        assert_eq!(plan[1].kind, TaskKind::Update);

        let summary = stats.summary();
        assert_eq!(summary.new, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_plan_paths_joined_from_roots() {
        let source = tree("src_root", &[("sub/a.txt", 10, 1_000)]);
        let dest = tree("dst_root", &[]);

        let stats = SyncStats::new();
        let plan = plan_sync(&source, &dest, None, &SyncOptions::default(), &stats);

        assert_eq!(plan[0].source_path, PathBuf::from("src_root").join("sub/a.txt"));
        assert_eq!(plan[0].dest_path, PathBuf::from("dst_root").join("sub/a.txt"));
    }

    #[test]
    fn test_ledger_overrides_rescan() {
        let source = tree("src", &[("a.txt", 10, 1_000)]);
        let dest = tree("dst", &[]);

        let ledger = ResumeLedger::new("unused.json");
        ledger.mark_completed("a.txt");

        let stats = SyncStats::new();
        let plan = plan_sync(&source, &dest, Some(&ledger), &SyncOptions::default(), &stats);

        // a.txt is missing from the destination but the ledger wins
        assert!(plan.is_empty());
        assert_eq!(stats.summary().skipped, 1);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let source = tree(
            "src",
            &[("z.txt", 1, 1_000), ("a.txt", 1, 1_000), ("m/n.txt", 1, 1_000)],
        );
        let dest = tree("dst", &[]);

        let stats = SyncStats::new();
        let plan = plan_sync(&source, &dest, None, &SyncOptions::default(), &stats);
        let order: Vec<_> = plan.iter().map(|t| t.relative_path.as_str()).collect();
        assert_eq!(order, vec!["a.txt", "m/n.txt", "z.txt"]);
    }

    #[test]
    fn test_plan_carries_verify_flag() {
        let source = tree("src", &[("a.txt", 10, 1_000)]);
        let dest = tree("dst", &[]);

        let options = SyncOptions {
            verify_hash: true,
            ..Default::default()
        };
        let stats = SyncStats::new();
        let plan = plan_sync(&source, &dest, None, &options, &stats);
        assert!(plan[0].verify_hash);
    }

    #[test]
    fn test_compare_trees_partitions() {
        let a = tree(
            "a",
            &[("both_same.txt", 10, 1_000), ("both_diff.txt", 10, 1_000), ("only_a.txt", 1, 1_000)],
        );
        let b = tree(
            "b",
            &[("both_same.txt", 10, 1_000), ("both_diff.txt", 99, 1_000), ("only_b.txt", 1, 1_000)],
        );

        let comparison = compare_trees(&a, &b);
        assert_eq!(comparison.identical, vec!["both_same.txt"]);
        assert_eq!(comparison.different, vec!["both_diff.txt"]);
        assert_eq!(comparison.only_in_a, vec!["only_a.txt"]);
        assert_eq!(comparison.only_in_b, vec!["only_b.txt"]);
    }
}
