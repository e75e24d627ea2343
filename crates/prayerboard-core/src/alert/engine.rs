//! Alert engine.
//!
//! The engine is driven entirely by the caller: a real 1-second timer, a
//! test harness and the simulation loop all call [`AlertEngine::tick`] (or
//! [`AlertEngine::evaluate`]) with the instant to evaluate. Nothing here
//! reads the system clock.
//!
//! ## One tick
//!
//! ```text
//! daily reset? -> count down active alert -> policy decision -> apply
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = AlertEngine::new(config.alerts.clone());
//! // Once per second:
//! if let Some(event) = engine.tick(&store, Local::now().naive_local()) {
//!     shell.render(&event);
//! }
//! ```

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::kind::AlertKind;
use super::policy::{AlertPolicy, Candidate, Decision};
use super::session::{ActiveAlert, AlertSession};
use crate::events::Event;
use crate::prayer::Prayer;
use crate::schedule::{ScheduleEntry, ScheduleStore};
use crate::storage::AlertsConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEngine {
    alerts: AlertsConfig,
    policy: AlertPolicy,
    session: AlertSession,
}

impl AlertEngine {
    pub fn new(alerts: AlertsConfig) -> Self {
        Self {
            policy: AlertPolicy::new(alerts.hold_enabled),
            alerts,
            session: AlertSession::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &AlertSession {
        &self.session
    }

    pub fn active(&self) -> Option<&ActiveAlert> {
        self.session.active()
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    pub fn alerts_config(&self) -> &AlertsConfig {
        &self.alerts
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Evaluate `now` against today's row from `store` (placeholder when
    /// the day is missing).
    pub fn tick(&mut self, store: &ScheduleStore, now: NaiveDateTime) -> Option<Event> {
        let entry = store.entry_for(now.date());
        self.evaluate(&entry, now)
    }

    /// One evaluation step. At most one event is returned: a raise wins
    /// over an expiry in the same tick, which wins over a daily reset.
    pub fn evaluate(&mut self, entry: &ScheduleEntry, now: NaiveDateTime) -> Option<Event> {
        let now = now.with_nanosecond(0).unwrap_or(now);

        let reset = self.session.roll_day(now).map(|cleared| {
            info!(cleared, "daily alert reset");
            Event::DailyReset { cleared, at: now }
        });

        let expired = self.session.count_down().map(|alert| {
            info!(key = %alert.key, "alert expired");
            Event::AlertExpired { key: alert.key, at: now }
        });

        let raised = match self.policy.decide(entry, now, &self.session) {
            Decision::Idle => None,
            Decision::Raise(candidate) => {
                let alert = self.activate(&candidate, now);
                info!(key = %alert.key, message = %alert.message, "alert raised");
                let event = Event::raised(&alert);
                self.session.raise(alert);
                Some(event)
            }
            Decision::Preempt { replaced_key, with } => {
                let alert = self.activate(&with, now);
                info!(replaced = %replaced_key, key = %alert.key, "alert pre-empted by azan");
                let event = Event::preempted(replaced_key, &alert);
                self.session.raise(alert);
                Some(event)
            }
        };

        raised.or(expired).or(reset)
    }

    /// User dismissal. No-op when idle.
    pub fn dismiss(&mut self, now: NaiveDateTime) -> Option<Event> {
        let alert = self.session.dismiss()?;
        info!(key = %alert.key, "alert dismissed");
        Some(Event::AlertDismissed { key: alert.key, at: now })
    }

    /// Force an alert of `kind` on screen for verification. It replaces
    /// anything active and is not recorded as fired.
    pub fn test(&mut self, kind: AlertKind, now: NaiveDateTime) -> Event {
        let duration = self.alerts.duration_secs(Prayer::Zohor, kind);
        let alert = ActiveAlert::test(kind, duration, now);
        info!(key = %alert.key, "test alert raised");
        let event = Event::raised(&alert);
        self.session.raise(alert);
        event
    }

    /// Apply new durations / hold setting. The active alert keeps its
    /// countdown.
    pub fn set_alerts_config(&mut self, alerts: AlertsConfig) {
        self.policy = AlertPolicy::new(alerts.hold_enabled);
        self.alerts = alerts;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn activate(&self, candidate: &Candidate, now: NaiveDateTime) -> ActiveAlert {
        let duration = self.alerts.duration_secs(candidate.prayer, candidate.kind);
        ActiveAlert::for_prayer(candidate.prayer, candidate.kind, duration, now)
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(AlertsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        day().and_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    fn entry() -> ScheduleEntry {
        ScheduleEntry::new(day(), "4 Jamadilawal 1448", "Jumaat").with_time(Prayer::Zohor, "01:00 PM")
    }

    #[test]
    fn raise_then_expire() {
        let mut engine = AlertEngine::default();
        let event = engine.evaluate(&entry(), at(12, 50, 0)).unwrap();
        assert!(matches!(event, Event::AlertRaised { ref key, .. } if key == "Zohor_10min"));
        assert_eq!(engine.session().remaining_seconds(), 30);

        for s in 1..30 {
            assert_eq!(engine.evaluate(&entry(), at(12, 50, s)), None);
        }
        let expired = engine.evaluate(&entry(), at(12, 50, 30)).unwrap();
        assert!(matches!(expired, Event::AlertExpired { ref key, .. } if key == "Zohor_10min"));
        assert!(!engine.session().is_active());
    }

    #[test]
    fn same_window_does_not_fire_twice() {
        let mut engine = AlertEngine::default();
        assert!(engine.evaluate(&entry(), at(12, 50, 0)).is_some());
        engine.dismiss(at(12, 50, 1));
        assert_eq!(engine.evaluate(&entry(), at(12, 50, 2)), None);
    }

    #[test]
    fn azan_preempts_within_one_tick() {
        let mut alerts = AlertsConfig::default();
        alerts.reminder_secs = 900;
        let mut engine = AlertEngine::new(alerts);

        engine.evaluate(&entry(), at(12, 55, 0));
        assert_eq!(engine.session().current_key(), Some("Zohor_5min"));
        assert_eq!(engine.evaluate(&entry(), at(12, 59, 59)), None);

        let event = engine.evaluate(&entry(), at(13, 0, 0)).unwrap();
        match event {
            Event::AlertPreempted { replaced_key, key, kind, .. } => {
                assert_eq!(replaced_key, "Zohor_5min");
                assert_eq!(key, "Zohor_azan");
                assert_eq!(kind, AlertKind::Azan);
            }
            other => panic!("expected AlertPreempted, got {other:?}"),
        }
        assert_eq!(engine.session().remaining_seconds(), 180);
    }

    #[test]
    fn dismiss_is_immediate() {
        let mut engine = AlertEngine::default();
        engine.evaluate(&entry(), at(13, 0, 0));
        let event = engine.dismiss(at(13, 0, 5)).unwrap();
        assert!(event.ends_alert());
        assert!(engine.active().is_none());
        assert_eq!(engine.dismiss(at(13, 0, 6)), None);
    }

    #[test]
    fn test_alert_uses_configured_duration() {
        let mut engine = AlertEngine::default();
        let event = engine.test(AlertKind::Iqamah, at(9, 0, 0));
        assert_eq!(event.alert_message(), Some("TEST: IQAMAH ALERT"));
        assert_eq!(engine.session().remaining_seconds(), 600);
        assert!(engine.session().triggered().is_empty());
    }

    #[test]
    fn test_alert_blocks_until_dismissed() {
        let mut engine = AlertEngine::default();
        engine.test(AlertKind::Reminder5, at(12, 49, 50));
        assert_eq!(engine.evaluate(&entry(), at(12, 50, 0)), None);
        engine.dismiss(at(12, 50, 1));
        let event = engine.evaluate(&entry(), at(12, 50, 2)).unwrap();
        assert_eq!(event.alert_message(), Some("GET READY FOR ZOHOR PRAYER IN 10 MINUTES"));
    }

    #[test]
    fn sub_second_instants_are_truncated() {
        let mut engine = AlertEngine::default();
        let now = at(12, 59, 59) + chrono::Duration::milliseconds(600);
        assert_eq!(engine.evaluate(&entry(), now), None);
    }

    #[test]
    fn tick_uses_placeholder_for_missing_day() {
        let store = ScheduleStore::new(vec![entry()]);
        let mut engine = AlertEngine::default();
        let tomorrow = at(12, 50, 0) + chrono::Duration::days(1);
        assert_eq!(engine.tick(&store, tomorrow), None);
        assert!(engine.tick(&store, at(12, 50, 0)).is_some());
    }

    #[test]
    fn hold_window_when_enabled() {
        let mut alerts = AlertsConfig::default();
        alerts.hold_enabled = true;
        let mut engine = AlertEngine::new(alerts);
        let event = engine.evaluate(&entry(), at(13, 19, 30)).unwrap();
        assert!(matches!(event, Event::AlertRaised { kind: AlertKind::PrayerTimeHold, .. }));
        assert_eq!(engine.session().remaining_seconds(), 900);
    }
}
