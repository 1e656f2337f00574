//! Log output setup.
//!
//! The terminal is the game screen, so log records go to a file. Without a file no subscriber
//! is installed and the `tracing` macros compile down to cheap no-ops.

use std::{fs::File, path::Path, sync::Mutex};

use color_eyre::eyre::{eyre, Result, WrapErr as _};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Installs a global `tracing` subscriber writing to `log_file`.
///
/// The filter is read from `RUST_LOG` and falls back to `info`. Passing `None` leaves logging
/// disabled.
///
/// # Errors
///
/// This function returns an error when the log file cannot be created or a global subscriber is
/// already installed.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}
