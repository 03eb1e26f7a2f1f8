use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use treesync::commands::{clear_state, run_compare, run_sync, SyncRequest};
use treesync::config::{Preferences, SyncOptions, PREFS_FILE};
use treesync::logging;
use treesync::scanner::CancelFlag;
use treesync::state::STATE_FILE;

#[derive(Parser)]
#[command(name = "treesync", version, about = "Resumable directory tree synchronization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mirror a source tree into a destination tree
    Sync {
        /// Source directory
        source: PathBuf,

        /// Destination directory
        destination: PathBuf,

        /// Show the plan without copying anything
        #[arg(long)]
        dry_run: bool,

        /// Compare content hashes before overwriting existing files
        #[arg(long)]
        verify_hash: bool,

        /// Ignore the resume state and re-check every file
        #[arg(long)]
        no_resume: bool,

        /// Number of concurrent copy workers
        #[arg(short, long, default_value_t = 4)]
        jobs: usize,

        /// Extra glob patterns to exclude (repeatable)
        #[arg(long, value_name = "PATTERN")]
        exclude: Vec<String>,

        /// Resume state file location
        #[arg(long, value_name = "FILE", default_value = STATE_FILE)]
        state_file: PathBuf,
    },

    /// Compare two trees without copying anything
    Compare {
        /// First directory
        a: PathBuf,

        /// Second directory
        b: PathBuf,

        /// Extra glob patterns to exclude (repeatable)
        #[arg(long, value_name = "PATTERN")]
        exclude: Vec<String>,
    },

    /// Delete the resume state file
    ClearState {
        /// Resume state file location
        #[arg(long, value_name = "FILE", default_value = STATE_FILE)]
        state_file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let prefs = Preferences::load(&PathBuf::from(PREFS_FILE));
    console::set_colors_enabled(prefs.use_color());

    logging::init(Some(std::path::Path::new(logging::LOG_FILE)));

    let cli = Cli::parse();

    match cli.command {
        Command::Sync {
            source,
            destination,
            dry_run,
            verify_hash,
            no_resume,
            jobs,
            exclude,
            state_file,
        } => {
            let options = SyncOptions {
                verify_hash,
                concurrency: jobs.max(1),
                resume: !no_resume,
                dry_run,
                exclude,
                state_path: state_file,
            };

            let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
            let request = SyncRequest {
                source,
                destination,
                options,
                cancel,
            };
            run_sync(&request)?;
        }
        Command::Compare { a, b, exclude } => {
            run_compare(&a, &b, &exclude)?;
        }
        Command::ClearState { state_file } => {
            clear_state(&state_file)?;
        }
    }

    Ok(())
}
