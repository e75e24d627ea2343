//! In-memory schedule store.
//!
//! Rows are held behind an `Arc` snapshot that is swapped whole under a
//! write lock, so a reader always sees either the previous table or the
//! new one and never a partial set.

use chrono::NaiveDate;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use super::entry::ScheduleEntry;

#[derive(Debug, Default)]
pub struct ScheduleStore {
    rows: RwLock<Arc<Vec<ScheduleEntry>>>,
}

impl ScheduleStore {
    /// Insertion order is preserved; rows are not sorted.
    pub fn new(rows: Vec<ScheduleEntry>) -> Self {
        Self {
            rows: RwLock::new(Arc::new(rows)),
        }
    }

    /// Atomically replace the whole table.
    pub fn replace_all(&self, rows: Vec<ScheduleEntry>) {
        let count = rows.len();
        let mut guard = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(rows);
        debug!(rows = count, "schedule replaced");
    }

    /// Current table. Holding the snapshot does not block writers.
    pub fn snapshot(&self) -> Arc<Vec<ScheduleEntry>> {
        let guard = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Row for `date`; first match wins on duplicates.
    ///
    /// An empty store answers with the placeholder row for `date` instead
    /// of `None`, so the board shows "N/A" rather than going blank.
    pub fn find(&self, date: NaiveDate) -> Option<ScheduleEntry> {
        let rows = self.snapshot();
        if rows.is_empty() {
            return Some(ScheduleEntry::placeholder(date));
        }
        rows.iter().find(|e| e.gregorian_date == date).cloned()
    }

    /// Like [`find`](Self::find) but never empty-handed.
    pub fn entry_for(&self, date: NaiveDate) -> ScheduleEntry {
        self.find(date)
            .unwrap_or_else(|| ScheduleEntry::placeholder(date))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}
