//! Alert policy: which alert, if any, the current instant calls for.
//!
//! Every window is a half-open interval `lo <= diff < hi` over
//! `diff = prayer_instant - now` in whole seconds (positive means the
//! prayer is still ahead). Windows are wider than one tick so a late tick
//! still lands inside; the per-day dedupe key keeps each window to a
//! single trigger.
//!
//! | class        | kind           | window          |
//! |--------------|----------------|-----------------|
//! | reminder-only| Reminder5      | `[270, 330)`    |
//! | full cycle   | Reminder10     | `[570, 630)`    |
//! | full cycle   | Reminder5      | `[270, 330)`    |
//! | full cycle   | Azan           | `[-1, 1)`       |
//! | full cycle   | Iqamah         | `[-300, -240)`  |
//! | full cycle   | PrayerTimeHold | `[-1200, -1140)`, only when enabled |
//!
//! With one tick per second the first firing lands on the upper edge minus
//! one: for a 13:00:00 prayer Reminder10 fires at 12:49:31 (diff 629),
//! Reminder5 at 12:54:31 (diff 329), Azan at 13:00:00 (diff 0), Iqamah at
//! 13:04:01 (diff -241) and the hold at 13:19:01 (diff -1141).
//!
//! While an alert is showing, only a higher [`AlertTier`] may replace it,
//! and only azan for the same prayer does so in practice.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::kind::{alert_key, AlertKind, AlertTier};
use super::session::AlertSession;
use crate::prayer::{Prayer, PrayerClass};
use crate::schedule::ScheduleEntry;
use crate::time::ClockTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertWindow {
    pub kind: AlertKind,
    pub lo: i64,
    pub hi: i64,
}

impl AlertWindow {
    const fn new(kind: AlertKind, lo: i64, hi: i64) -> Self {
        Self { kind, lo, hi }
    }

    pub fn contains(&self, diff_seconds: i64) -> bool {
        self.lo <= diff_seconds && diff_seconds < self.hi
    }
}

pub const REMINDER10_WINDOW: AlertWindow = AlertWindow::new(AlertKind::Reminder10, 570, 630);
pub const REMINDER5_WINDOW: AlertWindow = AlertWindow::new(AlertKind::Reminder5, 270, 330);
pub const AZAN_WINDOW: AlertWindow = AlertWindow::new(AlertKind::Azan, -1, 1);
pub const IQAMAH_WINDOW: AlertWindow = AlertWindow::new(AlertKind::Iqamah, -300, -240);
pub const HOLD_WINDOW: AlertWindow = AlertWindow::new(AlertKind::PrayerTimeHold, -1200, -1140);

const REMINDER_ONLY: [AlertWindow; 1] = [REMINDER5_WINDOW];
const FULL_CYCLE: [AlertWindow; 4] = [REMINDER10_WINDOW, REMINDER5_WINDOW, AZAN_WINDOW, IQAMAH_WINDOW];
const FULL_CYCLE_WITH_HOLD: [AlertWindow; 5] = [
    REMINDER10_WINDOW,
    REMINDER5_WINDOW,
    AZAN_WINDOW,
    IQAMAH_WINDOW,
    HOLD_WINDOW,
];

/// A window that matched and has not fired today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub prayer: Prayer,
    pub kind: AlertKind,
    pub key: String,
    pub diff_seconds: i64,
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Leave the session as it is.
    Idle,
    /// Nothing active; raise this alert.
    Raise(Candidate),
    /// Clear the active alert and raise azan in its place.
    Preempt { replaced_key: String, with: Candidate },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    pub hold_enabled: bool,
}

impl AlertPolicy {
    pub fn new(hold_enabled: bool) -> Self {
        Self { hold_enabled }
    }

    /// Windows checked for `prayer`, in the order they are tried.
    pub fn windows(&self, prayer: Prayer) -> &'static [AlertWindow] {
        match (prayer.class(), self.hold_enabled) {
            (PrayerClass::ReminderOnly, _) => &REMINDER_ONLY,
            (PrayerClass::FullCycle, false) => &FULL_CYCLE,
            (PrayerClass::FullCycle, true) => &FULL_CYCLE_WITH_HOLD,
        }
    }

    /// Decide for `now` against today's `entry`. Pure: the session is only
    /// read.
    pub fn decide(&self, entry: &ScheduleEntry, now: NaiveDateTime, session: &AlertSession) -> Decision {
        if entry.placeholder {
            trace!(date = %entry.gregorian_date, "placeholder row, no alerts");
            return Decision::Idle;
        }

        match session.active() {
            Some(active) => match active.prayer {
                Some(prayer) if active.kind.tier() < AlertTier::Azan => self
                    .azan_for(entry, prayer, now, session)
                    .map_or(Decision::Idle, |with| Decision::Preempt {
                        replaced_key: active.key.clone(),
                        with,
                    }),
                _ => Decision::Idle,
            },
            None => self
                .first_match(entry, now, session)
                .map_or(Decision::Idle, Decision::Raise),
        }
    }

    /// First unfired window in prayer order, then window order.
    fn first_match(
        &self,
        entry: &ScheduleEntry,
        now: NaiveDateTime,
        session: &AlertSession,
    ) -> Option<Candidate> {
        Prayer::ALL.into_iter().find_map(|prayer| {
            let diff = diff_seconds(entry, prayer, now)?;
            self.windows(prayer)
                .iter()
                .filter(|w| w.contains(diff))
                .map(|w| candidate(prayer, w.kind, diff))
                .find(|c| !session.has_fired(&c.key))
        })
    }

    fn azan_for(
        &self,
        entry: &ScheduleEntry,
        prayer: Prayer,
        now: NaiveDateTime,
        session: &AlertSession,
    ) -> Option<Candidate> {
        if prayer.class() != PrayerClass::FullCycle {
            return None;
        }
        let diff = diff_seconds(entry, prayer, now)?;
        Some(candidate(prayer, AlertKind::Azan, diff))
            .filter(|c| AZAN_WINDOW.contains(diff) && !session.has_fired(&c.key))
    }
}

fn candidate(prayer: Prayer, kind: AlertKind, diff_seconds: i64) -> Candidate {
    Candidate {
        prayer,
        kind,
        key: alert_key(prayer, kind),
        diff_seconds,
    }
}

/// Seconds from `now` until today's time for `prayer`. `None` when the
/// prayer is absent or its text does not parse (logged, then skipped).
pub fn diff_seconds(entry: &ScheduleEntry, prayer: Prayer, now: NaiveDateTime) -> Option<i64> {
    let clock: ClockTime = match entry.clock_time(prayer)? {
        Ok(clock) => clock,
        Err(e) => {
            warn!(prayer = %prayer, date = %entry.gregorian_date, "skipping prayer: {e}");
            return None;
        }
    };
    let instant = now.date().and_time(clock.to_naive_time());
    Some((instant - now).num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::session::ActiveAlert;
    use chrono::{NaiveDate, NaiveTime};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        day().and_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    fn entry() -> ScheduleEntry {
        ScheduleEntry::new(day(), "4 Jamadilawal 1448", "Jumaat")
            .with_time(Prayer::Imsak, "5:45 AM")
            .with_time(Prayer::Subuh, "5:55 AM")
            .with_time(Prayer::Syuruk, "7:07 AM")
            .with_time(Prayer::Zohor, "01:00 PM")
            .with_time(Prayer::Asar, "4:21 PM")
            .with_time(Prayer::Maghrib, "7:15 PM")
            .with_time(Prayer::Isyak, "8:24 PM")
    }

    fn raised(decision: Decision) -> Candidate {
        match decision {
            Decision::Raise(c) => c,
            other => panic!("expected Raise, got {other:?}"),
        }
    }

    #[test]
    fn window_bounds_are_half_open() {
        assert!(REMINDER10_WINDOW.contains(570));
        assert!(REMINDER10_WINDOW.contains(629));
        assert!(!REMINDER10_WINDOW.contains(630));
        assert!(AZAN_WINDOW.contains(0));
        assert!(AZAN_WINDOW.contains(-1));
        assert!(!AZAN_WINDOW.contains(1));
    }

    #[test]
    fn reminder_ten_minutes_before() {
        let session = AlertSession::default();
        let c = raised(AlertPolicy::default().decide(&entry(), at(12, 50, 0), &session));
        assert_eq!(c.key, "Zohor_10min");
        assert_eq!(c.diff_seconds, 600);
    }

    #[test]
    fn each_window_maps_to_its_kind() {
        let policy = AlertPolicy::new(true);
        let session = AlertSession::default();
        let cases = [
            (at(12, 55, 0), AlertKind::Reminder5),
            (at(13, 0, 0), AlertKind::Azan),
            (at(13, 4, 30), AlertKind::Iqamah),
            (at(13, 19, 30), AlertKind::PrayerTimeHold),
        ];
        for (now, kind) in cases {
            let c = raised(policy.decide(&entry(), now, &session));
            assert_eq!((c.prayer, c.kind), (Prayer::Zohor, kind), "at {now}");
        }
    }

    #[test]
    fn hold_window_needs_opt_in() {
        let session = AlertSession::default();
        assert_eq!(
            AlertPolicy::default().decide(&entry(), at(13, 19, 30), &session),
            Decision::Idle
        );
    }

    #[test]
    fn reminder_only_prayers_get_no_azan() {
        let session = AlertSession::default();
        let policy = AlertPolicy::default();
        assert_eq!(policy.decide(&entry(), at(7, 7, 0), &session), Decision::Idle);
        let c = raised(policy.decide(&entry(), at(7, 2, 0), &session));
        assert_eq!(c.key, "Syuruk_5min");
    }

    #[test]
    fn fired_keys_are_not_raised_again() {
        let mut session = AlertSession::default();
        session.mark_fired("Zohor_10min");
        assert_eq!(
            AlertPolicy::default().decide(&entry(), at(12, 50, 0), &session),
            Decision::Idle
        );
    }

    #[test]
    fn malformed_time_only_skips_that_prayer() {
        let broken = entry()
            .with_time(Prayer::Imsak, "25:99")
            .with_time(Prayer::Subuh, "garbage");
        let session = AlertSession::default();
        let c = raised(AlertPolicy::default().decide(&broken, at(12, 50, 0), &session));
        assert_eq!(c.key, "Zohor_10min");
    }

    #[test]
    fn first_prayer_in_order_wins_overlaps() {
        // Maghrib's iqamah and Isyak's 10-minute reminder share an instant.
        let close = entry()
            .with_time(Prayer::Maghrib, "19:15")
            .with_time(Prayer::Isyak, "19:30");
        let session = AlertSession::default();
        let c = raised(AlertPolicy::default().decide(&close, at(19, 20, 0), &session));
        assert_eq!(c.key, "Maghrib_iqamah");
    }

    #[test]
    fn placeholder_never_alerts() {
        let session = AlertSession::default();
        let placeholder = ScheduleEntry::placeholder(day());
        for now in [at(0, 0, 0), at(12, 50, 0), at(13, 0, 0)] {
            assert_eq!(AlertPolicy::default().decide(&placeholder, now, &session), Decision::Idle);
        }
    }

    #[test]
    fn active_reminder_blocks_other_windows() {
        let mut session = AlertSession::default();
        session.raise(ActiveAlert::for_prayer(Prayer::Asar, AlertKind::Reminder10, 600, at(12, 0, 0)));
        assert_eq!(
            AlertPolicy::default().decide(&entry(), at(12, 50, 0), &session),
            Decision::Idle
        );
    }

    #[test]
    fn azan_preempts_same_prayer_only() {
        let policy = AlertPolicy::default();

        let mut session = AlertSession::default();
        session.raise(ActiveAlert::for_prayer(Prayer::Zohor, AlertKind::Reminder5, 600, at(12, 55, 0)));
        match policy.decide(&entry(), at(13, 0, 0), &session) {
            Decision::Preempt { replaced_key, with } => {
                assert_eq!(replaced_key, "Zohor_5min");
                assert_eq!(with.key, "Zohor_azan");
            }
            other => panic!("expected Preempt, got {other:?}"),
        }

        let mut other = AlertSession::default();
        other.raise(ActiveAlert::for_prayer(Prayer::Subuh, AlertKind::Iqamah, 50_000, at(6, 0, 0)));
        assert_eq!(policy.decide(&entry(), at(13, 0, 0), &other), Decision::Idle);
    }

    #[test]
    fn preemption_follows_tier() {
        let policy = AlertPolicy::new(true);

        for kind in [AlertKind::Reminder10, AlertKind::Iqamah, AlertKind::PrayerTimeHold] {
            assert!(kind.tier() < AlertTier::Azan);
            let mut session = AlertSession::default();
            session.raise(ActiveAlert::for_prayer(Prayer::Zohor, kind, 600, at(12, 59, 0)));
            assert!(
                matches!(policy.decide(&entry(), at(13, 0, 0), &session), Decision::Preempt { .. }),
                "{kind:?} should give way to azan"
            );
        }
    }

    #[test]
    fn per_second_sweep_fires_at_upper_edges() {
        let policy = AlertPolicy::new(true);
        let mut session = AlertSession::default();
        let mut fired = Vec::new();
        let mut now = at(12, 40, 0);
        while now < at(13, 30, 0) {
            if let Decision::Raise(c) = policy.decide(&entry(), now, &session) {
                session.mark_fired(&c.key);
                fired.push((c.kind, now.time().to_string()));
            }
            now += chrono::Duration::seconds(1);
        }
        let expected = [
            (AlertKind::Reminder10, "12:49:31"),
            (AlertKind::Reminder5, "12:54:31"),
            (AlertKind::Azan, "13:00:00"),
            (AlertKind::Iqamah, "13:04:01"),
            (AlertKind::PrayerTimeHold, "13:19:01"),
        ];
        let fired: Vec<(AlertKind, &str)> = fired.iter().map(|(k, t)| (*k, t.as_str())).collect();
        assert_eq!(fired, expected);
    }
}
