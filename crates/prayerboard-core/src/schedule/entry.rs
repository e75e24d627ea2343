use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::TimeParseError;
use crate::prayer::Prayer;
use crate::time::{normalize, ClockTime};

/// Gregorian date format used by the prayer tables.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Text shown for every field of the placeholder row.
pub const PLACEHOLDER_TEXT: &str = "N/A";

/// One calendar day of prayer times.
///
/// Times are kept as the text the table supplied; they are normalised on
/// every evaluation so a malformed cell only ever costs that one prayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub gregorian_date: NaiveDate,
    pub hijri_date: String,
    pub weekday_name: String,
    #[serde(default)]
    pub times: BTreeMap<Prayer, String>,
    /// Synthetic row served when no real data exists for the date.
    #[serde(default)]
    pub placeholder: bool,
}

impl ScheduleEntry {
    pub fn new(
        gregorian_date: NaiveDate,
        hijri_date: impl Into<String>,
        weekday_name: impl Into<String>,
    ) -> Self {
        Self {
            gregorian_date,
            hijri_date: hijri_date.into(),
            weekday_name: weekday_name.into(),
            times: BTreeMap::new(),
            placeholder: false,
        }
    }

    /// Builder-style setter, handy for tests and fixtures.
    pub fn with_time(mut self, prayer: Prayer, raw: impl Into<String>) -> Self {
        self.set_time(prayer, raw);
        self
    }

    /// The "unknown" row for `date`. None of its times parse, so it never
    /// satisfies an alert window.
    pub fn placeholder(date: NaiveDate) -> Self {
        let mut entry = Self::new(date, PLACEHOLDER_TEXT, PLACEHOLDER_TEXT);
        for prayer in Prayer::ALL {
            entry.set_time(prayer, PLACEHOLDER_TEXT);
        }
        entry.placeholder = true;
        entry
    }

    /// Empty text counts as absent.
    pub fn set_time(&mut self, prayer: Prayer, raw: impl Into<String>) {
        let raw = raw.into();
        if raw.trim().is_empty() {
            self.times.remove(&prayer);
        } else {
            self.times.insert(prayer, raw);
        }
    }

    pub fn time(&self, prayer: Prayer) -> Option<&str> {
        self.times.get(&prayer).map(String::as_str)
    }

    /// `None` when the prayer is absent from this row.
    pub fn clock_time(&self, prayer: Prayer) -> Option<Result<ClockTime, TimeParseError>> {
        self.time(prayer).map(normalize)
    }

    pub fn date_text(&self) -> String {
        self.gregorian_date.format(DATE_FORMAT).to_string()
    }
}

/// Parse a `DD/MM/YYYY` table date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}
