//! Tracing setup: stderr output plus an optional append-only log file

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

/// Default log file name
pub const LOG_FILE: &str = "treesync.log";

/// Install the global tracing subscriber.
///
/// Diagnostic output goes to stderr so it never interleaves with the
/// progress bars and summaries on stdout. When `log_path` is given, the same
/// events are also appended to that file without ANSI codes. Level filtering
/// follows `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; only the first call wins.
pub fn init(log_path: Option<&Path>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let file_layer = log_path.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let file = Arc::new(file);
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_thread_names(false),
                )
            }
            Err(e) => {
                eprintln!("cannot open log file {}: {}", path.display(), e);
                None
            }
        }
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    let _ = tracing::subscriber::set_global_default(subscriber);
}
