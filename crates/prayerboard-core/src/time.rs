//! Time-of-day normalisation.
//!
//! Prayer tables arrive with times written either as `01:00 PM` or `13:00`.
//! [`normalize`] turns both into a canonical 24-hour [`ClockTime`]. It is
//! pure: callers decide what to do with an [`TimeParseError`] (the alert
//! engine skips that prayer for the tick).

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TimeParseError;

/// Hour (0-23) and minute (0-59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(t: NaiveTime) -> Self {
        // NaiveTime guarantees the ranges.
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse `hh:mm AM/PM` (marker case-insensitive, space optional) or `HH:MM`.
pub fn normalize(raw: &str) -> Result<ClockTime, TimeParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::new(raw));
    }

    let parsed = match split_meridiem(trimmed) {
        Some((clock, marker)) => {
            NaiveTime::parse_from_str(&format!("{} {marker}", clock.trim_end()), "%I:%M %p")
        }
        None => NaiveTime::parse_from_str(trimmed, "%H:%M"),
    };

    parsed.map(ClockTime::from).map_err(|_| TimeParseError::new(raw))
}

fn split_meridiem(s: &str) -> Option<(&str, &'static str)> {
    let upper = s.to_ascii_uppercase();
    let marker = if upper.ends_with("AM") {
        "AM"
    } else if upper.ends_with("PM") {
        "PM"
    } else {
        return None;
    };
    Some((&s[..s.len() - 2], marker))
}
