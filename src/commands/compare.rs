//! Read-only tree comparison command

use crate::diff::{compare_trees, TreeComparison};
use crate::filter::PathFilter;
use crate::scanner::scan_tree;
use crate::stats::SyncStats;
use crate::types::SyncError;
use std::path::Path;

/// Scan two trees and report how they differ, touching nothing
pub fn run(tree_a: &Path, tree_b: &Path, exclude: &[String]) -> Result<TreeComparison, SyncError> {
    if !tree_a.is_dir() {
        return Err(SyncError::Validation(format!(
            "directory does not exist: {}",
            tree_a.display()
        )));
    }
    if !tree_b.is_dir() {
        return Err(SyncError::Validation(format!(
            "directory does not exist: {}",
            tree_b.display()
        )));
    }

    let filter = PathFilter::new(exclude)?;
    let stats = SyncStats::new();

    let scan_a = scan_tree(tree_a, &filter, &stats, None)?;
    let scan_b = scan_tree(tree_b, &filter, &stats, None)?;

    let comparison = compare_trees(&scan_a, &scan_b);
    println!("{}", format_comparison(&comparison, tree_a, tree_b));

    Ok(comparison)
}

const SECTION_PREVIEW_LIMIT: usize = 10;

fn format_comparison(comparison: &TreeComparison, tree_a: &Path, tree_b: &Path) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Comparison of {} and {}:",
        tree_a.display(),
        tree_b.display()
    ));
    lines.push(format!(
        "  Identical: {}  Different: {}  Only in first: {}  Only in second: {}",
        comparison.identical.len(),
        comparison.different.len(),
        comparison.only_in_a.len(),
        comparison.only_in_b.len()
    ));

    push_section(&mut lines, "Different", &comparison.different);
    push_section(&mut lines, "Only in first", &comparison.only_in_a);
    push_section(&mut lines, "Only in second", &comparison.only_in_b);

    lines.join("\n")
}

fn push_section(lines: &mut Vec<String>, label: &str, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    lines.push(format!("  {}:", label));
    for path in paths.iter().take(SECTION_PREVIEW_LIMIT) {
        lines.push(format!("    {}", path));
    }
    if paths.len() > SECTION_PREVIEW_LIMIT {
        lines.push(format!(
            "    ... {} more",
            paths.len() - SECTION_PREVIEW_LIMIT
        ));
    }
}
