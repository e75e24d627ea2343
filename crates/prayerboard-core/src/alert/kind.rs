use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::prayer::Prayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Ten minutes before the prayer.
    Reminder10,
    /// Five minutes before the prayer (also Imsak and Syuruk).
    Reminder5,
    /// At the prayer time.
    Azan,
    /// Congregational call, about five minutes after azan.
    Iqamah,
    /// Extended "prayer in progress" display after iqamah.
    PrayerTimeHold,
}

/// Display priority. An active alert of a lower tier may be pre-empted by
/// azan, never the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertTier {
    Reminder,
    Iqamah,
    Azan,
}

impl AlertKind {
    pub const ALL: [AlertKind; 5] = [
        AlertKind::Reminder10,
        AlertKind::Reminder5,
        AlertKind::Azan,
        AlertKind::Iqamah,
        AlertKind::PrayerTimeHold,
    ];

    /// Second half of the per-day dedupe key, e.g. `Zohor_10min`.
    pub fn key_suffix(self) -> &'static str {
        match self {
            AlertKind::Reminder10 => "10min",
            AlertKind::Reminder5 => "5min",
            AlertKind::Azan => "azan",
            AlertKind::Iqamah => "iqamah",
            AlertKind::PrayerTimeHold => "hold",
        }
    }

    pub fn tier(self) -> AlertTier {
        match self {
            AlertKind::Reminder10 | AlertKind::Reminder5 => AlertTier::Reminder,
            AlertKind::Iqamah | AlertKind::PrayerTimeHold => AlertTier::Iqamah,
            AlertKind::Azan => AlertTier::Azan,
        }
    }

    /// Banner text pushed to the marquee while the alert is showing.
    pub fn message(self, prayer: Prayer) -> String {
        let name = prayer.name().to_uppercase();
        match (self, prayer) {
            (AlertKind::Reminder5, Prayer::Imsak | Prayer::Syuruk) => {
                format!("{name} IN 5 MINUTES")
            }
            (AlertKind::Reminder10, _) => format!("GET READY FOR {name} PRAYER IN 10 MINUTES"),
            (AlertKind::Reminder5, _) => format!("{name} PRAYER IN 5 MINUTES"),
            (AlertKind::Azan, _) => format!("{name} AZAN IS NOW"),
            (AlertKind::Iqamah, _) => format!("TIME FOR {name} IQAMAH"),
            (AlertKind::PrayerTimeHold, _) => format!("{name} PRAYER IN PROGRESS"),
        }
    }
}

/// Dedupe key for one prayer/kind pair on one day.
pub fn alert_key(prayer: Prayer, kind: AlertKind) -> String {
    format!("{}_{}", prayer.name(), kind.key_suffix())
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertKind::Reminder10 => "reminder10",
            AlertKind::Reminder5 => "reminder5",
            AlertKind::Azan => "azan",
            AlertKind::Iqamah => "iqamah",
            AlertKind::PrayerTimeHold => "hold",
        };
        f.write_str(label)
    }
}

impl FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reminder10" | "10min" => Ok(AlertKind::Reminder10),
            "reminder5" | "5min" => Ok(AlertKind::Reminder5),
            "azan" => Ok(AlertKind::Azan),
            "iqamah" => Ok(AlertKind::Iqamah),
            "hold" | "prayer_time_hold" => Ok(AlertKind::PrayerTimeHold),
            _ => Err(format!("unknown alert kind: {s}")),
        }
    }
}
