//! Core error types for prayerboard-core.
//!
//! Errors follow the four failure classes the engine distinguishes:
//! parse errors (isolated per prayer or per row), ingestion errors (reject
//! the whole upload), persistence errors (attempt a restore, keep memory
//! state), and configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for prayerboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Time-of-day parsing errors
    #[error("Time parse error: {0}")]
    TimeParse(#[from] TimeParseError),

    /// Schedule ingestion errors
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    /// Schedule persistence errors
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular reader/writer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// A prayer time string that is neither `hh:mm AM/PM` nor `HH:MM`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time of day '{raw}'")]
pub struct TimeParseError {
    pub raw: String,
}

impl TimeParseError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

/// Errors that reject a whole schedule upload.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A required column header is absent
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The input could not be read as CSV at all
    #[error("Failed to read schedule from {source_name}: {source}")]
    Unreadable {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// The input has no header row
    #[error("Schedule input is empty")]
    Empty,
}

/// Errors writing the schedule back to disk.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Writing failed; `restored` says whether the previous file came back
    #[error("Failed to save schedule to {path}: {message} (previous version restored: {restored})")]
    WriteFailed {
        path: PathBuf,
        message: String,
        restored: bool,
    },

    /// Creating the pre-write backup failed, nothing was written
    #[error("Failed to back up {path} before saving: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key not recognised by `get`/`set`
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// No usable data directory
    #[error("Cannot determine data directory: {0}")]
    NoDataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
