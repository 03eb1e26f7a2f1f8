//! Atomic single-file copy with retry and post-copy verification

use crate::types::SyncError;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// How many times one file is attempted before giving up
pub const COPY_ATTEMPTS: u32 = 3;

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy one file, retrying transient failures up to [`COPY_ATTEMPTS`] times.
///
/// Only the last error is reported; intermediate failures are logged.
pub fn copy_with_retry(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    let mut last_error = None;

    for attempt in 1..=COPY_ATTEMPTS {
        match copy_once(src, dest) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                if attempt < COPY_ATTEMPTS {
                    warn!(
                        "copy attempt {}/{} failed for {}: {}",
                        attempt,
                        COPY_ATTEMPTS,
                        src.display(),
                        e
                    );
                }
                last_error = Some(e);
            }
        }
    }

    // COPY_ATTEMPTS >= 1, so last_error is always set here
    Err(last_error.unwrap_or_else(|| {
        SyncError::Io(std::io::Error::other("copy failed without an error"))
    }))
}

static PART_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Temp-file path for one copy attempt. The full destination file name is
/// kept (stem and extension), so same-stem siblings like `report.pdf` and
/// `report.txt` never share a temp path; the process id and a sequence
/// number keep concurrent workers and leftover files from earlier runs
/// apart as well.
fn part_path_for(dest: &Path) -> PathBuf {
    let sequence = PART_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let file_name = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    dest.with_file_name(format!(
        "{}.{}.{}.part",
        file_name,
        std::process::id(),
        sequence
    ))
}

/// One copy attempt using the write-then-rename strategy:
///
/// 1. Stream the source into a uniquely named sibling `.part` file
/// 2. Sync to disk
/// 3. Carry over permissions and mtime from the source
/// 4. Rename into place
/// 5. Re-stat both sides and verify the sizes agree
///
/// A crash at any point leaves either the old destination or a stray `.part`
/// file, never a truncated destination.
fn copy_once(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let part_path = part_path_for(dest);
    let result = write_and_rename(src, dest, &part_path);
    if result.is_err() {
        let _ = fs::remove_file(&part_path);
    }
    result
}

fn write_and_rename(src: &Path, dest: &Path, part_path: &Path) -> Result<u64, SyncError> {
    let mut src_file = File::open(src)?;
    let mut part_file = File::create(part_path)?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        part_file.write_all(&buffer[0..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // The handle must close before rename on Windows
    drop(part_file);

    let src_metadata = fs::metadata(src)?;
    fs::set_permissions(part_path, src_metadata.permissions())?;

    let mtime = src_metadata.modified()?;
    filetime::set_file_mtime(part_path, filetime::FileTime::from_system_time(mtime))?;

    fs::rename(part_path, dest)?;

    // Re-stat both sides after the rename. Sizes read before the copy could
    // mask a source that changed mid-stream.
    let final_src = fs::metadata(src)?;
    let final_dest = fs::metadata(dest)?;
    if final_src.len() != final_dest.len() {
        return Err(SyncError::Verification {
            path: dest.to_path_buf(),
            detail: format!(
                "size mismatch after copy: source {} bytes, destination {} bytes",
                final_src.len(),
                final_dest.len()
            ),
        });
    }

    Ok(total_bytes)
}
