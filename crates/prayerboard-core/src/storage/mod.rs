mod config;
pub mod schedule_file;

pub use config::{AlertsConfig, Config, ImageScaling};
pub use schedule_file::{backup_path, load_schedule, save_schedule};

use std::path::PathBuf;

use crate::error::{ConfigError, CoreError};

/// Returns `~/.config/prayerboard[-dev]/` based on PRAYERBOARD_ENV.
///
/// Set PRAYERBOARD_ENV=dev to use development data directory, or
/// PRAYERBOARD_HOME to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let dir = match std::env::var_os("PRAYERBOARD_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .or_else(dirs::config_dir)
                .ok_or_else(|| ConfigError::NoDataDir("no home directory".into()))?
                .join(".config");

            let env = std::env::var("PRAYERBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("prayerboard-dev")
            } else {
                base_dir.join("prayerboard")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
