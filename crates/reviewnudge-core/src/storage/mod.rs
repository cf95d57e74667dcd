mod config;
mod preset;
mod store;

pub use config::{
    Config, DEFAULT_INTERVAL_MINUTES, DEFAULT_SNOOZE_MINUTES, MAX_INTERVAL_MINUTES,
    MAX_SNOOZE_MINUTES,
};
pub use preset::ConfigPreset;
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};

use std::path::PathBuf;

/// Returns `~/.config/reviewnudge[-dev]/` based on REVIEWNUDGE_ENV.
///
/// Set REVIEWNUDGE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("REVIEWNUDGE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("reviewnudge-dev")
    } else {
        base_dir.join("reviewnudge")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
