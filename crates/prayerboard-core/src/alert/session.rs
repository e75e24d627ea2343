//! Live alert state: what is showing, for how much longer, and which
//! alerts already fired today.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::kind::{alert_key, AlertKind};
use crate::prayer::Prayer;

/// An alert currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAlert {
    /// Dedupe key, e.g. `Zohor_azan`; `Test_azan` for manual tests.
    pub key: String,
    /// `None` for manual test alerts.
    pub prayer: Option<Prayer>,
    pub kind: AlertKind,
    pub message: String,
    pub duration_secs: u32,
    pub remaining_secs: u32,
    pub raised_at: NaiveDateTime,
}

impl ActiveAlert {
    pub fn for_prayer(prayer: Prayer, kind: AlertKind, duration_secs: u32, raised_at: NaiveDateTime) -> Self {
        Self {
            key: alert_key(prayer, kind),
            prayer: Some(prayer),
            kind,
            message: kind.message(prayer),
            duration_secs,
            remaining_secs: duration_secs,
            raised_at,
        }
    }

    /// Manually forced alert. Never recorded as fired.
    pub fn test(kind: AlertKind, duration_secs: u32, raised_at: NaiveDateTime) -> Self {
        Self {
            key: format!("Test_{}", kind.key_suffix()),
            prayer: None,
            kind,
            message: format!("TEST: {} ALERT", kind.to_string().to_uppercase()),
            duration_secs,
            remaining_secs: duration_secs,
            raised_at,
        }
    }

    pub fn is_test(&self) -> bool {
        self.prayer.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertSession {
    #[serde(default)]
    active: Option<ActiveAlert>,
    /// Keys fired since the last daily reset.
    #[serde(default)]
    triggered: HashSet<String>,
    /// Calendar date of the previous tick.
    #[serde(default)]
    last_date: Option<NaiveDate>,
}

impl AlertSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveAlert> {
        self.active.as_ref()
    }

    pub fn current_key(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.key.as_str())
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.remaining_secs)
    }

    pub fn has_fired(&self, key: &str) -> bool {
        self.triggered.contains(key)
    }

    pub fn triggered(&self) -> &HashSet<String> {
        &self.triggered
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Show `alert`, replacing whatever was active. Prayer alerts are
    /// recorded in the triggered set. Returns the replaced alert.
    pub fn raise(&mut self, alert: ActiveAlert) -> Option<ActiveAlert> {
        if !alert.is_test() {
            self.triggered.insert(alert.key.clone());
        }
        self.active.replace(alert)
    }

    pub fn mark_fired(&mut self, key: impl Into<String>) {
        self.triggered.insert(key.into());
    }

    /// Back to idle. Returns the alert that was showing.
    pub fn dismiss(&mut self) -> Option<ActiveAlert> {
        self.active.take()
    }

    /// One tick of countdown. Returns the alert if it just ran out.
    pub fn count_down(&mut self) -> Option<ActiveAlert> {
        let active = self.active.as_mut()?;
        active.remaining_secs = active.remaining_secs.saturating_sub(1);
        if active.remaining_secs == 0 {
            self.active.take()
        } else {
            None
        }
    }

    /// Clear the triggered set when `00:00:00` is observed or the date
    /// moved on since the previous tick. Returns how many keys were
    /// cleared, or `None` if there was nothing to clear.
    pub fn roll_day(&mut self, now: NaiveDateTime) -> Option<usize> {
        let today = now.date();
        let previous = self.last_date.replace(today);
        let midnight = now.time() == NaiveTime::MIN;
        let new_day = previous.is_some_and(|d| d != today);
        if !(midnight || new_day) || self.triggered.is_empty() {
            return None;
        }
        let cleared = self.triggered.len();
        self.triggered.clear();
        Some(cleared)
    }
}
