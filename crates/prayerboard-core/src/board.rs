//! Board snapshot: everything a display shell needs to draw one frame.

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::alert::{ActiveAlert, AlertSession};
use crate::prayer::Prayer;
use crate::schedule::{ScheduleEntry, PLACEHOLDER_TEXT};
use crate::storage::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerRow {
    pub prayer: Prayer,
    /// Time as written in the table, or "N/A".
    pub time_text: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub mosque_name: String,
    /// `hh:mm:ss AM`
    pub clock_text: String,
    /// `Jumaat, 16 Oktober 2026`
    pub date_text: String,
    pub hijri_text: String,
    pub rows: Vec<PrayerRow>,
    pub current_prayer: Option<Prayer>,
    pub alert: Option<ActiveAlert>,
    /// True when the board is showing placeholder data.
    pub degraded: bool,
}

impl BoardSnapshot {
    pub fn build(
        config: &Config,
        entry: &ScheduleEntry,
        session: &AlertSession,
        now: NaiveDateTime,
    ) -> Self {
        let current_prayer = current_prayer(entry, now);
        let rows = Prayer::ALL
            .into_iter()
            .map(|prayer| PrayerRow {
                prayer,
                time_text: entry.time(prayer).unwrap_or(PLACEHOLDER_TEXT).to_string(),
                current: current_prayer == Some(prayer),
            })
            .collect();

        let hijri_text = if entry.placeholder || entry.hijri_date.trim().is_empty() {
            PLACEHOLDER_TEXT.to_string()
        } else {
            format!("{} H", entry.hijri_date.trim())
        };

        Self {
            mosque_name: config.mosque_name.clone(),
            clock_text: now.format("%I:%M:%S %p").to_string(),
            date_text: malay_date(now),
            hijri_text,
            rows,
            current_prayer,
            alert: session.active().cloned(),
            degraded: entry.placeholder,
        }
    }
}

/// Last prayer in order whose time has been reached. Unparsable times are
/// ignored here; the alert policy logs them.
pub fn current_prayer(entry: &ScheduleEntry, now: NaiveDateTime) -> Option<Prayer> {
    let now_time = now.time();
    Prayer::ALL
        .into_iter()
        .filter(|&p| {
            matches!(entry.clock_time(p), Some(Ok(clock)) if clock.to_naive_time() <= now_time)
        })
        .last()
}

pub fn malay_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Isnin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Khamis",
        Weekday::Fri => "Jumaat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Ahad",
    }
}

pub fn malay_month(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Januari", "Februari", "Mac", "April", "Mei", "Jun", "Julai", "Ogos", "September",
        "Oktober", "November", "Disember",
    ];
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or("")
}

pub fn malay_date(now: NaiveDateTime) -> String {
    format!(
        "{}, {:02} {} {}",
        malay_weekday(now.weekday()),
        now.day(),
        malay_month(now.month()),
        now.year()
    )
}
