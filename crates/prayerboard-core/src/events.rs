use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::alert::{ActiveAlert, AlertKind};
use crate::board::BoardSnapshot;
use crate::prayer::Prayer;

/// Every engine state change produces an Event.
/// The display shell renders from these; timestamps are local wall clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    AlertRaised {
        key: String,
        prayer: Option<Prayer>,
        kind: AlertKind,
        message: String,
        duration_secs: u32,
        at: NaiveDateTime,
    },
    /// Azan took over from a lower-priority alert of the same prayer.
    AlertPreempted {
        replaced_key: String,
        key: String,
        prayer: Option<Prayer>,
        kind: AlertKind,
        message: String,
        duration_secs: u32,
        at: NaiveDateTime,
    },
    AlertExpired {
        key: String,
        at: NaiveDateTime,
    },
    AlertDismissed {
        key: String,
        at: NaiveDateTime,
    },
    /// The per-day dedupe set was cleared.
    DailyReset {
        cleared: usize,
        at: NaiveDateTime,
    },
    BoardSnapshot(BoardSnapshot),
}

impl Event {
    pub(crate) fn raised(alert: &ActiveAlert) -> Self {
        Event::AlertRaised {
            key: alert.key.clone(),
            prayer: alert.prayer,
            kind: alert.kind,
            message: alert.message.clone(),
            duration_secs: alert.duration_secs,
            at: alert.raised_at,
        }
    }

    pub(crate) fn preempted(replaced_key: String, alert: &ActiveAlert) -> Self {
        Event::AlertPreempted {
            replaced_key,
            key: alert.key.clone(),
            prayer: alert.prayer,
            kind: alert.kind,
            message: alert.message.clone(),
            duration_secs: alert.duration_secs,
            at: alert.raised_at,
        }
    }

    /// Banner text for events that put an alert on screen.
    pub fn alert_message(&self) -> Option<&str> {
        match self {
            Event::AlertRaised { message, .. } | Event::AlertPreempted { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }

    /// True when the shell should tear the alert display down.
    pub fn ends_alert(&self) -> bool {
        matches!(self, Event::AlertExpired { .. } | Event::AlertDismissed { .. })
    }
}
