//! Progress reporting

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

/// Progress reporter for the scan and copy phases of a sync run
pub struct ProgressReporter {
    copy_bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let copy_bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} files | {msg}")
        {
            copy_bar.set_style(style.progress_chars("=>-"));
        }

        Self { copy_bar }
    }

    /// Start a scanning phase. Each phase gets its own spinner, since a
    /// finished spinner no longer renders.
    pub fn start_scan(&self, label: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(format!("Scanning {}...", label));
        bar
    }

    /// Mark completion of a scanning phase.
    pub fn finish_scan(&self, bar: &ProgressBar, label: &str, files: usize, bytes: u64) {
        bar.finish_with_message(format!(
            "Scanned {}: {} files | {}",
            label,
            files,
            HumanBytes(bytes)
        ));
    }

    /// Initialize the copy phase bar.
    pub fn start_copy(&self, total_files: u64) {
        self.copy_bar.set_length(total_files);
        self.copy_bar.set_position(0);
        self.copy_bar.set_message("Copying...".to_string());
    }

    /// Move the copy bar to an absolute position. Called from the progress
    /// callback, which may fire from worker threads in any order, so the
    /// position only ever moves forward.
    pub fn update_copy(&self, completed: usize) {
        let completed = completed as u64;
        if completed > self.copy_bar.position() {
            self.copy_bar.set_position(completed);
        }
    }

    /// Finalize the copy phase.
    pub fn finish_copy(&self, copied: u64, failed: u64, bytes: u64) {
        self.copy_bar.finish_with_message(format!(
            "Copy complete: {} copied, {} failed | {}",
            copied,
            failed,
            HumanBytes(bytes)
        ));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
