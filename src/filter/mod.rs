//! Path exclusion policy applied during scanning

use crate::types::SyncError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Directory names that are never scanned (OS/reserved locations).
/// Matching any path segment excludes the whole subtree.
const RESERVED_DIRS: &[&str] = &[
    "$RECYCLE.BIN",
    "System Volume Information",
    "Recovery",
    "$WinREAgent",
    "hiberfil.sys",
    "pagefile.sys",
    "swapfile.sys",
    "Windows",
    "Program Files",
    "Program Files (x86)",
    "ProgramData",
];

/// File extensions that are never synced (case-insensitive, without the dot)
const EXCLUDED_EXTENSIONS: &[&str] = &["tmp", "temp", "cache", "lock"];

/// Decides whether a relative path is excluded from scanning.
///
/// Pure function of the path (plus a best-effort hidden-attribute lookup on
/// Windows); no side effects.
#[derive(Debug, Clone)]
pub struct PathFilter {
    extra: Option<GlobSet>,
}

impl PathFilter {
    /// Build a filter from the fixed denylists plus optional user globs
    pub fn new(extra_patterns: &[String]) -> Result<Self, SyncError> {
        if extra_patterns.is_empty() {
            return Ok(Self { extra: None });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in extra_patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                SyncError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build exclude set: {}", e)))?;

        Ok(Self { extra: Some(set) })
    }

    /// Check a path (relative to the scan root) against the denylists
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        for component in relative_path.components() {
            let name = component.as_os_str().to_string_lossy();
            if RESERVED_DIRS
                .iter()
                .any(|reserved| name.eq_ignore_ascii_case(reserved))
            {
                return true;
            }
        }

        if let Some(ext) = relative_path.extension() {
            let ext = ext.to_string_lossy();
            if EXCLUDED_EXTENSIONS
                .iter()
                .any(|excluded| ext.eq_ignore_ascii_case(excluded))
            {
                return true;
            }
        }

        if let Some(set) = &self.extra {
            if set.is_match(relative_path) {
                return true;
            }
        }

        false
    }

    /// Best-effort hidden-attribute lookup. A failed metadata query is
    /// treated as not-hidden, never as an error.
    #[cfg(windows)]
    pub fn is_hidden(&self, absolute_path: &Path) -> bool {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

        match std::fs::metadata(absolute_path) {
            Ok(metadata) => metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0,
            Err(_) => false,
        }
    }

    /// Unix has no hidden attribute; dotfiles are deliberately not treated as
    /// hidden here, matching the exclusion policy this filter implements.
    #[cfg(not(windows))]
    pub fn is_hidden(&self, _absolute_path: &Path) -> bool {
        false
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self { extra: None }
    }
}
