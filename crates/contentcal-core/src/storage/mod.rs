mod config;
pub mod database;
pub mod safe;

pub use config::{AutosaveConfig, Config, EventsConfig, HistoryConfig, TimeFormat, UiConfig};
pub use database::{KvBackend, SqliteKv, UnavailableKv};
pub use safe::{SafeStore, StoreStatus};

use std::path::PathBuf;

/// Returns the contentcal data directory.
///
/// `CONTENTCAL_HOME` wins when set. Otherwise `~/.config/contentcal[-dev]/`,
/// with the `-dev` suffix when `CONTENTCAL_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("CONTENTCAL_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CONTENTCAL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("contentcal-dev")
            } else {
                base_dir.join("contentcal")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
