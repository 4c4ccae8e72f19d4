//! Daily visit streak tracking.
//!
//! The tracker owns nothing itself; it reads and writes a single JSON record
//! through whatever [`KeyValueStore`] it is handed.

use crate::models::StreakRecord;
use crate::storage::KeyValueStore;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

pub const STREAK_KEY: &str = "streak-record";

/// Result of reading the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loaded {
    Stored(StreakRecord),
    /// Nothing stored, or the stored value could not be used.
    Default,
}

impl Loaded {
    pub fn into_record(self) -> StreakRecord {
        match self {
            Loaded::Stored(record) => record,
            Loaded::Default => StreakRecord::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Started,
    Extended,
    Reset,
    /// Already visited on this day.
    Unchanged,
    /// Stored visit date is after `today`.
    ClockRollback,
}

impl Transition {
    pub fn mutates(self) -> bool {
        matches!(self, Transition::Started | Transition::Extended | Transition::Reset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitOutcome {
    pub record: StreakRecord,
    pub transition: Transition,
}

/// Computes the record that follows a visit on `today`.
pub fn next_record(stored: Option<StreakRecord>, today: NaiveDate) -> VisitOutcome {
    let (record, last_visit) = match stored {
        Some(record) => match record.last_visit_date {
            Some(last_visit) => (record, last_visit),
            None => return started(today),
        },
        None => return started(today),
    };

    let gap = (today - last_visit).num_days();
    let (current_streak, transition) = match gap {
        0 => return VisitOutcome { record, transition: Transition::Unchanged },
        gap if gap < 0 => {
            return VisitOutcome { record, transition: Transition::ClockRollback };
        }
        1 => (record.current_streak.saturating_add(1), Transition::Extended),
        _ => (1, Transition::Reset),
    };

    VisitOutcome {
        record: StreakRecord {
            last_visit_date: Some(today),
            current_streak,
            longest_streak: record.longest_streak.max(current_streak),
        },
        transition,
    }
}

fn started(today: NaiveDate) -> VisitOutcome {
    VisitOutcome {
        record: StreakRecord::first_visit(today),
        transition: Transition::Started,
    }
}

/// Reads the stored record; anything unusable comes back as [`Loaded::Default`].
pub fn load_streak<S: KeyValueStore + ?Sized>(store: &S) -> Loaded {
    let Some(raw) = store.get(STREAK_KEY) else {
        return Loaded::Default;
    };

    match serde_json::from_str::<StreakRecord>(&raw) {
        Ok(record) if record.is_consistent() => Loaded::Stored(record),
        Ok(record) => {
            warn!(?record, "stored streak record is inconsistent, ignoring it");
            Loaded::Default
        }
        Err(err) => {
            warn!("failed to parse stored streak record: {err}");
            Loaded::Default
        }
    }
}

pub struct StreakTracker<S> {
    store: S,
}

impl<S: KeyValueStore> StreakTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Loaded {
        load_streak(&self.store)
    }

    pub fn get_streak_data(&self) -> StreakRecord {
        self.load().into_record()
    }

    pub fn update_streak(&mut self) -> Result<StreakRecord, serde_json::Error> {
        self.update_streak_at(Local::now().date_naive())
    }

    pub fn update_streak_at(&mut self, today: NaiveDate) -> Result<StreakRecord, serde_json::Error> {
        self.record_visit_at(today).map(|outcome| outcome.record)
    }

    /// Applies at most one transition per calendar day; repeat calls only read.
    pub fn record_visit_at(&mut self, today: NaiveDate) -> Result<VisitOutcome, serde_json::Error> {
        let stored = match self.load() {
            Loaded::Stored(record) => Some(record),
            Loaded::Default => None,
        };
        let outcome = next_record(stored, today);

        match outcome.transition {
            Transition::Unchanged => {}
            Transition::ClockRollback => {
                warn!(
                    %today,
                    last_visit = ?outcome.record.last_visit_date,
                    "last visit is in the future, leaving streak untouched"
                );
            }
            transition => {
                self.save(&outcome.record)?;
                info!(
                    ?transition,
                    %today,
                    current = outcome.record.current_streak,
                    longest = outcome.record.longest_streak,
                    "streak updated"
                );
            }
        }

        Ok(outcome)
    }

    pub fn reset_streak(&mut self) -> Result<StreakRecord, serde_json::Error> {
        let record = StreakRecord::default();
        self.save(&record)?;
        info!("streak reset");
        Ok(record)
    }

    fn save(&mut self, record: &StreakRecord) -> Result<(), serde_json::Error> {
        let payload = serde_json::to_string(record)?;
        self.store.set(STREAK_KEY, payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoreData;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with(record: StreakRecord) -> StoreData {
        let mut store = StoreData::default();
        store.set(STREAK_KEY, serde_json::to_string(&record).unwrap());
        store
    }

    fn record(last: NaiveDate, current: u32, longest: u32) -> StreakRecord {
        StreakRecord {
            last_visit_date: Some(last),
            current_streak: current,
            longest_streak: longest,
        }
    }

    #[test]
    fn first_visit_starts_at_one() {
        let mut store = StoreData::default();
        let mut tracker = StreakTracker::new(&mut store);

        let updated = tracker.update_streak_at(date(2026, 2, 1)).unwrap();
        assert_eq!(updated, record(date(2026, 2, 1), 1, 1));
        assert_eq!(tracker.load(), Loaded::Stored(updated));
    }

    #[test]
    fn consecutive_day_extends() {
        let mut store = store_with(record(date(2026, 2, 1), 3, 5));
        let mut tracker = StreakTracker::new(&mut store);

        let updated = tracker.update_streak_at(date(2026, 2, 2)).unwrap();
        assert_eq!(updated, record(date(2026, 2, 2), 4, 5));
    }

    #[test]
    fn gap_resets_but_keeps_longest() {
        let mut store = store_with(record(date(2026, 2, 1), 3, 5));
        let mut tracker = StreakTracker::new(&mut store);

        let updated = tracker.update_streak_at(date(2026, 2, 5)).unwrap();
        assert_eq!(updated, record(date(2026, 2, 5), 1, 5));
    }

    #[test]
    fn extension_raises_longest() {
        let mut store = store_with(record(date(2026, 2, 28), 5, 5));
        let mut tracker = StreakTracker::new(&mut store);

        let updated = tracker.update_streak_at(date(2026, 3, 1)).unwrap();
        assert_eq!(updated, record(date(2026, 3, 1), 6, 6));
    }

    #[test]
    fn same_day_visits_are_idempotent() {
        let mut store = StoreData::default();
        let mut tracker = StreakTracker::new(&mut store);
        let today = date(2026, 2, 1);

        let first = tracker.record_visit_at(today).unwrap();
        let second = tracker.record_visit_at(today).unwrap();
        let third = tracker.record_visit_at(today).unwrap();

        assert_eq!(first.transition, Transition::Started);
        assert_eq!(second.transition, Transition::Unchanged);
        assert_eq!(second.record, first.record);
        assert_eq!(third.record, first.record);
    }

    #[test]
    fn clock_rollback_leaves_record_alone() {
        let stored = record(date(2026, 2, 10), 4, 9);
        let mut store = store_with(stored);
        let before = store.get(STREAK_KEY);
        let mut tracker = StreakTracker::new(&mut store);

        let outcome = tracker.record_visit_at(date(2026, 2, 8)).unwrap();
        assert_eq!(outcome.transition, Transition::ClockRollback);
        assert_eq!(outcome.record, stored);
        assert_eq!(store.get(STREAK_KEY), before);
    }

    #[test]
    fn longest_never_below_current_over_a_run() {
        let mut store = StoreData::default();
        let mut tracker = StreakTracker::new(&mut store);
        let start = date(2026, 1, 1);
        let offsets = [0, 1, 2, 2, 3, 7, 8, 9, 10, 11, 12, 20, 21];

        for offset in offsets {
            let today = start + chrono::Duration::days(offset);
            let updated = tracker.update_streak_at(today).unwrap();
            assert!(updated.longest_streak >= updated.current_streak);
            assert!(updated.current_streak >= 1);
        }

        let finished = tracker.get_streak_data();
        assert_eq!(finished.current_streak, 2);
        assert_eq!(finished.longest_streak, 6);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut store = store_with(record(date(2026, 2, 1), 12, 40));
        let mut tracker = StreakTracker::new(&mut store);

        let reset = tracker.reset_streak().unwrap();
        assert_eq!(reset, StreakRecord::default());
        assert_eq!(tracker.get_streak_data(), StreakRecord::default());
        assert_eq!(
            store.get(STREAK_KEY).as_deref(),
            Some(r#"{"lastVisitDate":"","currentStreak":0,"longestStreak":0}"#)
        );
    }

    #[test]
    fn visit_after_reset_starts_over() {
        let mut store = store_with(record(date(2026, 2, 1), 12, 40));
        let mut tracker = StreakTracker::new(&mut store);
        tracker.reset_streak().unwrap();

        let outcome = tracker.record_visit_at(date(2026, 2, 2)).unwrap();
        assert_eq!(outcome.transition, Transition::Started);
        assert_eq!(outcome.record, record(date(2026, 2, 2), 1, 1));
    }

    #[test]
    fn missing_and_malformed_records_load_as_default() {
        let mut store = StoreData::default();
        assert_eq!(StreakTracker::new(&mut store).load(), Loaded::Default);

        for raw in [
            "not json",
            r#"{"lastVisitDate":"yesterday","currentStreak":1,"longestStreak":1}"#,
            r#"{"lastVisitDate":"2026-02-01","currentStreak":-3,"longestStreak":1}"#,
            r#"{"lastVisitDate":"2026-02-01","currentStreak":5,"longestStreak":2}"#,
            r#"{"lastVisitDate":"2026-02-01","currentStreak":0,"longestStreak":0}"#,
            r#"{"lastVisitDate":"","currentStreak":3,"longestStreak":5}"#,
            r#"{"lastVisitDate":"","currentStreak":0,"longestStreak":4}"#,
        ] {
            store.set(STREAK_KEY, raw.to_string());
            let tracker = StreakTracker::new(&mut store);
            assert_eq!(tracker.load(), Loaded::Default, "{raw}");
            assert_eq!(tracker.get_streak_data(), StreakRecord::default());
        }
    }

    #[test]
    fn reads_work_through_a_shared_reference() {
        let store = store_with(record(date(2026, 2, 1), 2, 2));
        assert_eq!(
            load_streak(&store),
            Loaded::Stored(record(date(2026, 2, 1), 2, 2))
        );
        assert_eq!(load_streak(&StoreData::default()), Loaded::Default);
    }

    #[test]
    fn malformed_record_is_replaced_on_update() {
        let mut store = StoreData::default();
        store.set(STREAK_KEY, "{broken".to_string());
        let mut tracker = StreakTracker::new(&mut store);

        let updated = tracker.update_streak_at(date(2026, 2, 1)).unwrap();
        assert_eq!(updated, record(date(2026, 2, 1), 1, 1));
    }

    #[test]
    fn legacy_last_visit_field_is_read() {
        let mut store = StoreData::default();
        store.set(
            STREAK_KEY,
            r#"{"lastVisit":"2026-02-01","currentStreak":2,"longestStreak":3}"#.to_string(),
        );
        let tracker = StreakTracker::new(&mut store);

        assert_eq!(
            tracker.load(),
            Loaded::Stored(record(date(2026, 2, 1), 2, 3))
        );
    }
}
