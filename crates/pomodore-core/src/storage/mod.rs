mod config;
pub mod database;

pub use config::{Config, TasksConfig, TimerConfig, UiConfig};
pub use database::{Database, SessionRecord, LEDGER_KEY, TIMER_KEY};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomodore[-dev]/` based on POMODORE_ENV.
///
/// Set POMODORE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMODORE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodore-dev")
    } else {
        base_dir.join("pomodore")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
