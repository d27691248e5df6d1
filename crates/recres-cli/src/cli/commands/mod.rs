//! CLI command handlers, one file per command.

mod completions;
mod inspect;
mod list;
mod probe;
mod resolve;

pub use completions::run_completions;
pub use inspect::run_inspect;
pub use list::run_list;
pub use probe::run_probe;
pub use resolve::run_resolve;

use recres_core::config::ConfigError;
use recres_core::probe::ProbeResult;

/// `[200] url`, or `[UNREACHABLE] url` when no status came back.
pub(crate) fn probe_line(result: &ProbeResult) -> String {
    match result.status {
        Some(status) => format!("[{}] {}", status, result.url),
        None => format!("[{}] {}", result.outcome, result.url),
    }
}

/// Rejects a zero override (`--timeout 0`, `--concurrency 0`).
pub(crate) fn nonzero<T: PartialEq + Default>(name: &'static str, value: T) -> Result<T, ConfigError> {
    if value == T::default() {
        Err(ConfigError::Zero(name))
    } else {
        Ok(value)
    }
}
