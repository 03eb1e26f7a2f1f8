//! Main sync command

use crate::config::SyncOptions;
use crate::diff::plan_sync;
use crate::executor::{run_copy, ProgressFn};
use crate::filter::PathFilter;
use crate::scanner::{scan_tree, CancelFlag};
use crate::state::ResumeLedger;
use crate::stats::{Summary, SyncStats};
use crate::types::{CopyTask, SyncError, TaskKind};
use crate::ui::ProgressReporter;
use console::style;
use indicatif::HumanBytes;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Everything needed to execute one sync run
pub struct SyncRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub options: SyncOptions,
    pub cancel: CancelFlag,
}

/// Run the sync operation end to end: scan both trees, plan, copy, report.
pub fn run(request: &SyncRequest) -> Result<Summary, SyncError> {
    if !request.source.is_dir() {
        return Err(SyncError::Validation(format!(
            "source directory does not exist: {}",
            request.source.display()
        )));
    }
    if !request.destination.is_dir() {
        return Err(SyncError::Validation(format!(
            "destination directory does not exist: {}",
            request.destination.display()
        )));
    }
    if request.source == request.destination {
        return Err(SyncError::Validation(
            "source and destination cannot be the same".to_string(),
        ));
    }

    let filter = PathFilter::new(&request.options.exclude)?;
    let stats = Arc::new(SyncStats::new());
    let ledger = if request.options.resume {
        Some(Arc::new(ResumeLedger::load(&request.options.state_path)))
    } else {
        None
    };

    let reporter = ProgressReporter::new();

    let scan_bar = reporter.start_scan("source");
    let source_tree = scan_tree(&request.source, &filter, &stats, Some(&request.cancel))?;
    reporter.finish_scan(
        &scan_bar,
        "source",
        source_tree.total_files,
        source_tree.total_size,
    );

    let scan_bar = reporter.start_scan("destination");
    // Destination counters would pollute the run summary, so they go nowhere
    let dest_stats = SyncStats::new();
    let dest_tree = scan_tree(
        &request.destination,
        &filter,
        &dest_stats,
        Some(&request.cancel),
    )?;
    reporter.finish_scan(
        &scan_bar,
        "destination",
        dest_tree.total_files,
        dest_tree.total_size,
    );

    let plan = plan_sync(
        &source_tree,
        &dest_tree,
        ledger.as_deref(),
        &request.options,
        &stats,
    );

    println!("{}", format_plan_summary(&plan, &stats.summary()));
    info!(
        "planned {} task(s) from {} scanned file(s)",
        plan.len(),
        source_tree.total_files
    );

    if request.options.dry_run {
        println!("{}", format_dry_run_preview(&plan));
        println!("Dry-run mode: no changes were made.");
        return Ok(stats.summary());
    }

    if plan.is_empty() {
        println!("Nothing to sync.");
        return Ok(stats.summary());
    }

    reporter.start_copy(plan.len() as u64);
    let copy_reporter = Arc::new(reporter);
    let on_progress: Arc<ProgressFn> = {
        let reporter = Arc::clone(&copy_reporter);
        Arc::new(move |done, _total| reporter.update_copy(done))
    };

    let summary = run_copy(
        plan,
        &request.options,
        ledger,
        &stats,
        Some(on_progress),
        Some(&request.cancel),
    )?;

    copy_reporter.finish_copy(summary.copied, summary.failed, summary.copied_size);
    println!("{}", format_run_summary(&summary));

    if summary.failed > 0 {
        println!(
            "{}",
            style(format!(
                "{} file(s) failed to copy; re-run to retry them.",
                summary.failed
            ))
            .yellow()
        );
    }

    Ok(summary)
}

const DRY_RUN_PREVIEW_LIMIT: usize = 10;

fn format_plan_summary(plan: &[CopyTask], summary: &Summary) -> String {
    let bytes_to_copy: u64 = plan.iter().map(|t| t.source.size).sum();
    format!(
        "Plan:\n  New: {}  Update: {}  Skip: {}\n  Total bytes to copy: {}",
        summary.new,
        summary.updated,
        summary.skipped,
        HumanBytes(bytes_to_copy)
    )
}

fn format_dry_run_preview(plan: &[CopyTask]) -> String {
    if plan.is_empty() {
        return "Dry-run tasks:\n  (no planned copies)".to_string();
    }

    let mut lines = Vec::with_capacity(plan.len().min(DRY_RUN_PREVIEW_LIMIT) + 2);
    lines.push("Dry-run tasks:".to_string());
    for task in plan.iter().take(DRY_RUN_PREVIEW_LIMIT) {
        let label = match task.kind {
            TaskKind::New => "COPY  ",
            TaskKind::Update => "UPDATE",
        };
        lines.push(format!("  {}    {}", label, task.relative_path));
    }
    if plan.len() > DRY_RUN_PREVIEW_LIMIT {
        lines.push(format!(
            "  ... {} more task(s)",
            plan.len() - DRY_RUN_PREVIEW_LIMIT
        ));
    }
    lines.join("\n")
}

fn format_run_summary(summary: &Summary) -> String {
    format!(
        "Done: {} copied, {} failed, {} skipped | {}",
        summary.copied,
        summary.failed,
        summary.skipped,
        HumanBytes(summary.copied_size)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;
    use std::time::{Duration, UNIX_EPOCH};

    fn task(name: &str, size: u64, kind: TaskKind) -> CopyTask {
        CopyTask {
            relative_path: name.to_string(),
            source: FileRecord::new(size, UNIX_EPOCH + Duration::from_secs(1_000)),
            source_path: PathBuf::from("src").join(name),
            dest_path: PathBuf::from("dst").join(name),
            kind,
            verify_hash: false,
        }
    }

    #[test]
    fn test_plan_summary_contains_counts_and_bytes() {
        let plan = vec![
            task("a.txt", 1024, TaskKind::New),
            task("b.txt", 4 * 1024 * 1024, TaskKind::Update),
        ];
        let summary = Summary {
            new: 1,
            updated: 1,
            skipped: 3,
            ..Default::default()
        };

        let text = format_plan_summary(&plan, &summary);
        assert!(text.contains("New: 1"));
        assert!(text.contains("Update: 1"));
        assert!(text.contains("Skip: 3"));
        assert!(text.contains("MiB"), "expected human-readable size: {text}");
    }

    #[test]
    fn test_dry_run_preview_truncates_long_plans() {
        let plan: Vec<CopyTask> = (0..15)
            .map(|i| task(&format!("f{}.txt", i), 1, TaskKind::New))
            .collect();

        let text = format_dry_run_preview(&plan);
        assert!(text.contains("f0.txt"));
        assert!(text.contains("f9.txt"));
        assert!(!text.contains("f10.txt"));
        assert!(text.contains("... 5 more task(s)"));
    }

    #[test]
    fn test_dry_run_preview_handles_empty_plan() {
        let text = format_dry_run_preview(&[]);
        assert!(text.contains("(no planned copies)"));
    }

    #[test]
    fn test_dry_run_preview_labels_kinds() {
        let plan = vec![
            task("new.txt", 1, TaskKind::New),
            task("changed.txt", 1, TaskKind::Update),
        ];
        let text = format_dry_run_preview(&plan);
        assert!(text.contains("COPY"));
        assert!(text.contains("UPDATE"));
    }
}
