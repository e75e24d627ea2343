pub mod alert;
pub mod config;
pub mod run;
pub mod schedule;
pub mod simulate;

use chrono::{NaiveDate, NaiveTime};
use std::path::{Path, PathBuf};

use prayerboard_core::schedule::parse_date;
use prayerboard_core::storage::{data_dir, load_schedule};
use prayerboard_core::{Config, CoreError, ScheduleStore};

/// Where the saved prayer table lives for this config.
pub(crate) fn schedule_file(config: &Config) -> Result<PathBuf, CoreError> {
    Ok(config.schedule_path(&data_dir()?))
}

/// Load the store from `path`, or from the configured table when `None`.
pub(crate) fn load_store(config: &Config, path: Option<&Path>) -> Result<ScheduleStore, CoreError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => schedule_file(config)?,
    };
    Ok(ScheduleStore::new(load_schedule(&path)?))
}

pub(crate) fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("invalid date '{raw}', expected DD/MM/YYYY"))
}

/// `HH:MM:SS` or `HH:MM`.
pub(crate) fn parse_clock_arg(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M"))
        .map_err(|_| format!("invalid time '{raw}', expected HH:MM:SS"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_and_clock_args() {
        assert_eq!(
            parse_date_arg("16/10/2026").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );
        assert!(parse_date_arg("2026-10-16").is_err());
        assert_eq!(
            parse_clock_arg("13:00").unwrap(),
            NaiveTime::from_hms_opt(13, 0, 0).unwrap()
        );
        assert_eq!(
            parse_clock_arg("12:50:30").unwrap(),
            NaiveTime::from_hms_opt(12, 50, 30).unwrap()
        );
        assert!(parse_clock_arg("1 PM").is_err());
    }
}
