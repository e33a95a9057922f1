//! The terminal belongs to the TUI, so logs go to a file.
use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use std::{fs, sync::Mutex};
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

pub const LOG_ENV: &str = "WAVDECK_LOG";

/// Installs the global subscriber. Without a usable log path logging is
/// simply off.
pub fn init(config: &LogConfig) -> Result<()> {
    let Some(path) = config.file_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("cannot create log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| eyre!("logging already initialised: {err}"))?;
    Ok(())
}
