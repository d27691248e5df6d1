//! Structured logging.
//!
//! Events go to `$XDG_STATE_HOME/recres/recres.log`. When that file cannot be
//! opened the binary falls back to stderr at `warn`, so probe output on stdout
//! stays readable. `RUST_LOG` overrides either filter.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const FILE_FILTER: &str = "info,recres=debug,recres_core=debug";
const STDERR_FILTER: &str = "warn";

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// `~/.local/state/recres/recres.log` (directory created on demand).
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("recres")?;
    Ok(xdg_dirs.place_state_file("recres.log")?)
}

fn open_log_file() -> Result<(PathBuf, File)> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;
    Ok((path, file))
}

/// Installs the file subscriber. Errors leave no subscriber installed so the
/// caller can use [`init_logging_stderr`] instead.
pub fn init_logging() -> Result<()> {
    let (path, file) = open_log_file()?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_or(FILE_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;

    tracing::info!(
        path = %path.display(),
        version = env!("CARGO_PKG_VERSION"),
        "recres logging initialized"
    );
    Ok(())
}

/// Stderr-only subscriber; never fails (a second install is ignored).
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or(STDERR_FILTER))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
