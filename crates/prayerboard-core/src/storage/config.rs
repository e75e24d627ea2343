//! TOML-based application configuration.
//!
//! Stores board preferences including:
//! - Mosque name and the scrolling banner message
//! - Background / logo image paths and scaling mode
//! - Location of the prayer times table
//! - Alert durations and the optional post-iqamah hold window
//!
//! Configuration is stored at `~/.config/prayerboard/config.toml`.
//!
//! Loading is lenient: unknown keys are ignored, missing keys take their
//! default, and a value of the wrong type or range is replaced by its
//! default with a warning.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::data_dir;
use crate::alert::AlertKind;
use crate::error::{ConfigError, CoreError};
use crate::prayer::Prayer;

/// How background and logo images are fitted to their area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageScaling {
    #[default]
    Fit,
    Fill,
    Stretch,
    Center,
}

/// Alert durations in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_reminder_secs")]
    pub reminder_secs: u32,
    #[serde(default = "default_reminder_secs")]
    pub imsak_reminder_secs: u32,
    #[serde(default = "default_syuruk_reminder_secs")]
    pub syuruk_reminder_secs: u32,
    #[serde(default = "default_azan_secs")]
    pub azan_secs: u32,
    #[serde(default = "default_iqamah_secs")]
    pub iqamah_secs: u32,
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u32,
    /// Enables the PrayerTimeHold window twenty minutes after each prayer.
    #[serde(default)]
    pub hold_enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/prayerboard/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mosque_name: String,
    /// Banner shown in the marquee when no alert is active.
    #[serde(default = "default_flash_message")]
    pub flash_message: String,
    #[serde(default)]
    pub background_image_path: String,
    #[serde(default)]
    pub logo_image_path: String,
    /// Empty means `<data dir>/prayer_times.csv`.
    #[serde(default)]
    pub data_file_path: String,
    #[serde(default)]
    pub image_scaling: ImageScaling,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

// Default functions
fn default_flash_message() -> String {
    "Welcome to the Mosque Prayer Times Display".into()
}
fn default_reminder_secs() -> u32 {
    30
}
fn default_syuruk_reminder_secs() -> u32 {
    28 * 60
}
fn default_azan_secs() -> u32 {
    3 * 60
}
fn default_iqamah_secs() -> u32 {
    10 * 60
}
fn default_hold_secs() -> u32 {
    15 * 60
}

const SCHEDULE_FILE: &str = "prayer_times.csv";

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            reminder_secs: default_reminder_secs(),
            imsak_reminder_secs: default_reminder_secs(),
            syuruk_reminder_secs: default_syuruk_reminder_secs(),
            azan_secs: default_azan_secs(),
            iqamah_secs: default_iqamah_secs(),
            hold_secs: default_hold_secs(),
            hold_enabled: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mosque_name: String::new(),
            flash_message: default_flash_message(),
            background_image_path: String::new(),
            logo_image_path: String::new(),
            data_file_path: String::new(),
            image_scaling: ImageScaling::default(),
            alerts: AlertsConfig::default(),
        }
    }
}

impl AlertsConfig {
    /// How long an alert of `kind` for `prayer` stays up.
    pub fn duration_secs(&self, prayer: Prayer, kind: AlertKind) -> u32 {
        match (kind, prayer) {
            (AlertKind::Reminder5, Prayer::Imsak) => self.imsak_reminder_secs,
            (AlertKind::Reminder5, Prayer::Syuruk) => self.syuruk_reminder_secs,
            (AlertKind::Reminder10 | AlertKind::Reminder5, _) => self.reminder_secs,
            (AlertKind::Azan, _) => self.azan_secs,
            (AlertKind::Iqamah, _) => self.iqamah_secs,
            (AlertKind::PrayerTimeHold, _) => self.hold_secs,
        }
    }

    fn durations(&self) -> [(&'static str, u32); 6] {
        [
            ("alerts.reminder_secs", self.reminder_secs),
            ("alerts.imsak_reminder_secs", self.imsak_reminder_secs),
            ("alerts.syuruk_reminder_secs", self.syuruk_reminder_secs),
            ("alerts.azan_secs", self.azan_secs),
            ("alerts.iqamah_secs", self.iqamah_secs),
            ("alerts.hold_secs", self.hold_secs),
        ]
    }

    fn from_table(table: &toml::Table) -> Self {
        let d = Self::default();
        Self {
            reminder_secs: duration_field(table, "alerts.reminder_secs", d.reminder_secs),
            imsak_reminder_secs: duration_field(table, "alerts.imsak_reminder_secs", d.imsak_reminder_secs),
            syuruk_reminder_secs: duration_field(table, "alerts.syuruk_reminder_secs", d.syuruk_reminder_secs),
            azan_secs: duration_field(table, "alerts.azan_secs", d.azan_secs),
            iqamah_secs: duration_field(table, "alerts.iqamah_secs", d.iqamah_secs),
            hold_secs: duration_field(table, "alerts.hold_secs", d.hold_secs),
            hold_enabled: field(table, "alerts.hold_enabled", d.hold_enabled),
        }
    }
}

/// Read `key` (dotted for display; the last segment is looked up) from
/// `table`, falling back to `default` when absent or ill-typed.
fn field<T>(table: &toml::Table, key: &str, default: T) -> T
where
    T: DeserializeOwned + Debug,
{
    let leaf = key.rsplit('.').next().unwrap_or(key);
    match table.get(leaf) {
        None => default,
        Some(value) => match value.clone().try_into::<T>() {
            Ok(v) => v,
            Err(e) => {
                warn!("invalid value for {key} ({}), using default ({default:?})", e.message());
                default
            }
        },
    }
}

fn duration_field(table: &toml::Table, key: &str, default: u32) -> u32 {
    match field(table, key, default) {
        0 => {
            warn!("{key} must be positive, using default ({default})");
            default
        }
        v => v,
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a single value".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Parse TOML leniently; see the module docs.
    pub fn from_toml_str(content: &str) -> Self {
        let table: toml::Table = match content.parse() {
            Ok(table) => table,
            Err(e) => {
                warn!("configuration is not valid TOML ({}), using defaults", e.message());
                return Self::default();
            }
        };

        let alerts = match table.get("alerts") {
            Some(toml::Value::Table(alerts)) => AlertsConfig::from_table(alerts),
            Some(_) => {
                warn!("invalid value for alerts (expected a table), using defaults");
                AlertsConfig::default()
            }
            None => AlertsConfig::default(),
        };

        let d = Self::default();
        Self {
            mosque_name: field(&table, "mosque_name", d.mosque_name),
            flash_message: field(&table, "flash_message", d.flash_message),
            background_image_path: field(&table, "background_image_path", d.background_image_path),
            logo_image_path: field(&table, "logo_image_path", d.logo_image_path),
            data_file_path: field(&table, "data_file_path", d.data_file_path),
            image_scaling: field(&table, "image_scaling", d.image_scaling),
            alerts,
        }
    }

    /// `config.toml` in the data directory.
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is unusable, the file exists
    /// but cannot be read, or the default config cannot be written.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path. A missing file is created with defaults.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg = Self::from_toml_str(&content);
                info!(path = %path.display(), "configuration loaded");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no configuration file found, using defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Reject values the lenient loader would have coerced.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, secs) in self.alerts.durations() {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "duration must be positive".into(),
                });
            }
        }
        Ok(())
    }

    /// Where the prayer table lives.
    pub fn schedule_path(&self, data_dir: &Path) -> PathBuf {
        if self.data_file_path.trim().is_empty() {
            data_dir.join(SCHEDULE_FILE)
        } else {
            PathBuf::from(self.data_file_path.trim())
        }
    }
}
