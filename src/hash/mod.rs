//! Streaming content hashing

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Files are streamed through the digest in 1 MiB chunks
const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// Compute the Blake3 digest of a file's content.
///
/// Returns `None` (not an error) if the file cannot be opened or read,
/// logging the cause - an unreadable side simply means the cheap size/time
/// comparison stands. Used only when hash verification is requested, because
/// this is O(file size).
pub fn content_hash(path: &Path) -> Option<[u8; 32]> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("cannot hash {}: {}", path.display(), e);
            return None;
        }
    };

    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(n) => n,
            Err(e) => {
                warn!("read failed while hashing {}: {}", path.display(), e);
                return None;
            }
        };

        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[0..bytes_read]);
    }

    Some(*hasher.finalize().as_bytes())
}
