//! CLI entry point for tasklist.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tasklist_app::{AppConfig, MemoryStorage, Storage, TaskStore};
use tasklist_core::id::TaskId;
use tasklist_store_fs::FileStore;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod tui;

/// A small to-do list kept in a single JSON file.
#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "tasklist: a to-do list stored as one JSON array")]
struct Cli {
    /// Directory holding tasks.json (overrides TASKLIST_DATA_DIR and the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch interactive terminal UI (default).
    Tui,

    /// Add a task.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Print tasks matching a filter (all, active, completed).
    Ls {
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Flip a task between active and completed.
    Toggle { id: TaskId },

    /// Replace the text of a task.
    Edit {
        id: TaskId,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a task.
    Rm { id: TaskId },

    /// Delete every completed task.
    ClearCompleted,
}

fn main() -> Result<()> {
    let Cli {
        data_dir,
        config,
        cmd,
    } = Cli::parse();

    install_tracing();

    let config = AppConfig::load(config.as_deref())?;
    let (storage, storage_warning) = open_storage(&config, data_dir);
    let mut store = TaskStore::open(storage);

    match cmd.unwrap_or(Command::Tui) {
        Command::Tui => tui::run(store, config.ui, storage_warning),
        other => commands::run(other, &mut store, &mut io::stdout().lock()),
    }
}

/// Pick the file slot when a data directory is usable, otherwise fall back to memory.
///
/// The second value explains why tasks will not be saved, if that is the case.
fn open_storage(config: &AppConfig, cli_dir: Option<PathBuf>) -> (Box<dyn Storage>, Option<String>) {
    let Some(dir) = config.resolve_data_dir(cli_dir) else {
        let reason = "no data directory available; tasks are kept in memory only".to_owned();
        warn!("{reason}");
        return (Box::new(MemoryStorage::new()), Some(reason));
    };

    match FileStore::open(&dir) {
        Ok(store) => {
            let store = match config.storage.quota_bytes {
                Some(quota) => store.with_quota(quota),
                None => store,
            };
            (Box::new(store), None)
        }
        Err(err) => {
            let reason = format!("cannot use {}: {err}; tasks are kept in memory only", dir.display());
            warn!("{reason}");
            (Box::new(MemoryStorage::new()), Some(reason))
        }
    }
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level; output goes to stderr.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
