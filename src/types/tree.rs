//! ScanResult - one scanned directory tree

use super::FileRecord;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Normalize a relative path into the `/`-separated string used as the join
/// key between source and destination trees and as the resume ledger key.
pub fn relative_key(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// Result of scanning one directory tree: relative path key -> FileRecord.
///
/// Entries are kept in a `BTreeMap` so iteration order (and therefore copy
/// plan order) is deterministic regardless of filesystem traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Map: normalized relative path -> FileRecord
    pub entries: BTreeMap<String, FileRecord>,

    /// Aggregate statistics
    pub total_size: u64,
    pub total_files: usize,

    /// Root this tree was scanned from
    pub root_path: PathBuf,
}

impl ScanResult {
    /// Create a new empty ScanResult
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            entries: BTreeMap::new(),
            total_size: 0,
            total_files: 0,
            root_path,
        }
    }

    /// Insert a record, updating aggregate statistics.
    ///
    /// Replacing an existing key adjusts the totals rather than double-counting.
    pub fn insert(&mut self, relative_path: String, record: FileRecord) {
        if let Some(old) = self.entries.get(&relative_path) {
            self.total_size = self.total_size.saturating_sub(old.size);
            self.total_files = self.total_files.saturating_sub(1);
        }

        self.total_size += record.size;
        self.total_files += 1;
        self.entries.insert(relative_path, record);
    }

    /// Look up a record by relative path
    pub fn get(&self, relative_path: &str) -> Option<&FileRecord> {
        self.entries.get(relative_path)
    }

    /// Check if a relative path is present
    pub fn contains(&self, relative_path: &str) -> bool {
        self.entries.contains_key(relative_path)
    }

    /// Number of file entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterator over (relative path, record) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileRecord)> {
        self.entries.iter()
    }

    /// Iterator over relative paths in key order
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Absolute path of an entry under this tree's root
    pub fn absolute_path(&self, relative_path: &str) -> PathBuf {
        self.root_path.join(relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn record(size: u64) -> FileRecord {
        FileRecord::new(size, UNIX_EPOCH + Duration::from_secs(1000))
    }

    #[test]
    fn test_relative_key_normalizes_separators() {
        assert_eq!(relative_key(Path::new("a/b/c.txt")), "a/b/c.txt");
        assert_eq!(relative_key(Path::new("top.txt")), "top.txt");
        assert_eq!(relative_key(Path::new("./a/b.txt")), "a/b.txt");
    }

    #[test]
    fn test_new_tree_is_empty() {
        let tree = ScanResult::new(PathBuf::from("/root"));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.total_files, 0);
        assert_eq!(tree.total_size, 0);
    }

    #[test]
    fn test_insert_updates_statistics() {
        let mut tree = ScanResult::new(PathBuf::from("/root"));
        tree.insert("a.txt".to_string(), record(100));
        tree.insert("sub/b.txt".to_string(), record(200));

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.total_files, 2);
        assert_eq!(tree.total_size, 300);
        assert!(tree.contains("a.txt"));
        assert!(tree.contains("sub/b.txt"));
        assert!(!tree.contains("missing.txt"));
    }

    #[test]
    fn test_duplicate_insert_replaces_and_adjusts_totals() {
        let mut tree = ScanResult::new(PathBuf::from("/root"));
        tree.insert("file.txt".to_string(), record(1000));
        tree.insert("file.txt".to_string(), record(2000));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.total_files, 1);
        assert_eq!(tree.total_size, 2000);
    }

    #[test]
    fn test_iteration_is_sorted_by_path() {
        let mut tree = ScanResult::new(PathBuf::from("/root"));
        tree.insert("z.txt".to_string(), record(1));
        tree.insert("a.txt".to_string(), record(2));
        tree.insert("m/n.txt".to_string(), record(3));

        let paths: Vec<&String> = tree.paths().collect();
        assert_eq!(paths, vec!["a.txt", "m/n.txt", "z.txt"]);
    }

    #[test]
    fn test_absolute_path_joins_root() {
        let tree = ScanResult::new(PathBuf::from("/data/source"));
        assert_eq!(
            tree.absolute_path("sub/file.txt"),
            PathBuf::from("/data/source/sub/file.txt")
        );
    }
}
