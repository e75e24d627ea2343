//! # Prayerboard Core Library
//!
//! This library provides the core logic for a mosque prayer times board:
//! it holds the daily prayer table and decides, second by second, which
//! alert (reminder, azan, iqamah, hold) should be on screen. Display
//! shells (the bundled CLI, or anything else) feed it the current instant
//! and render what it reports.
//!
//! ## Architecture
//!
//! - **Schedule**: CSV ingestion/export and an atomically swapped in-memory
//!   store, looked up by Gregorian date
//! - **Time conversion**: `01:00 PM` / `13:00` to a canonical clock time
//! - **Alert engine**: a pure policy over per-prayer windows plus a session
//!   that dedupes, counts down and resets at midnight; the caller drives it
//!   by invoking `tick()` with the instant to evaluate
//! - **Storage**: TOML configuration and the on-disk schedule file
//!
//! ## Key Components
//!
//! - [`AlertEngine`]: Core alert state machine
//! - [`ScheduleStore`]: Daily prayer rows
//! - [`Config`]: Application configuration management
//! - [`Marquee`]: Scrolling banner text

pub mod alert;
pub mod board;
pub mod error;
pub mod events;
pub mod marquee;
pub mod prayer;
pub mod schedule;
pub mod storage;
pub mod time;

pub use alert::{ActiveAlert, AlertEngine, AlertKind, AlertPolicy, AlertSession};
pub use board::BoardSnapshot;
pub use error::{ConfigError, CoreError, IngestError, PersistError, TimeParseError};
pub use events::Event;
pub use marquee::Marquee;
pub use prayer::{Prayer, PrayerClass};
pub use schedule::{ScheduleEntry, ScheduleStore};
pub use storage::{AlertsConfig, Config, ImageScaling};
pub use time::{normalize, ClockTime};
