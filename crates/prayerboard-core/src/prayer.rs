use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven daily times tracked on the board, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Imsak,
    Subuh,
    Syuruk,
    Zohor,
    Asar,
    Maghrib,
    Isyak,
}

/// Which alert windows apply to a prayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrayerClass {
    /// Imsak and Syuruk only get a five minute reminder.
    ReminderOnly,
    /// Reminders, azan, iqamah and the optional hold window.
    FullCycle,
}

impl Prayer {
    /// Fixed evaluation order. First match in this order wins a tick.
    pub const ALL: [Prayer; 7] = [
        Prayer::Imsak,
        Prayer::Subuh,
        Prayer::Syuruk,
        Prayer::Zohor,
        Prayer::Asar,
        Prayer::Maghrib,
        Prayer::Isyak,
    ];

    /// Column header / display name.
    pub fn name(self) -> &'static str {
        match self {
            Prayer::Imsak => "Imsak",
            Prayer::Subuh => "Subuh",
            Prayer::Syuruk => "Syuruk",
            Prayer::Zohor => "Zohor",
            Prayer::Asar => "Asar",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isyak => "Isyak",
        }
    }

    pub fn class(self) -> PrayerClass {
        match self {
            Prayer::Imsak | Prayer::Syuruk => PrayerClass::ReminderOnly,
            _ => PrayerClass::FullCycle,
        }
    }

    /// Position in [`Prayer::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Prayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Prayer::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown prayer: {s}"))
    }
}
