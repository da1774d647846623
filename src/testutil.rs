//! In-memory collaborators for runner unit tests.

use std::cell::{Cell, RefCell};

use serde_json::Value;

use crate::migration::{DataAccess, RecordCursor, Reporter};
use crate::storage::models::{LegacyRecord, Payload, Row};
use crate::storage::DatabaseError;

pub fn legacy_record(metadata_uid: u64, file_uid: u64, dam_uid: u64, columns: Value) -> LegacyRecord {
    let columns: Row = serde_json::from_value(columns).expect("columns must be a JSON object");
    LegacyRecord {
        metadata_uid,
        file_uid,
        dam_uid,
        columns,
    }
}

/// Store that serves fixed records and records every update.
pub struct MemoryStore {
    has_dam_table: bool,
    records: Vec<LegacyRecord>,
    updates: RefCell<Vec<(String, u64, Payload)>>,
    fail_after: Option<usize>,
    rows_affected: bool,
    cursor_opened: Cell<bool>,
    cursor_released: Cell<bool>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<LegacyRecord>) -> Self {
        Self {
            has_dam_table: true,
            records,
            updates: RefCell::new(Vec::new()),
            fail_after: None,
            rows_affected: true,
            cursor_opened: Cell::new(false),
            cursor_released: Cell::new(false),
        }
    }

    pub fn without_dam_table() -> Self {
        Self {
            has_dam_table: false,
            ..Self::with_records(Vec::new())
        }
    }

    /// Fail every update after the first `n`.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn affecting_no_rows(mut self) -> Self {
        self.rows_affected = false;
        self
    }

    pub fn updates(&self) -> Vec<(String, u64, Payload)> {
        self.updates.borrow().clone()
    }

    pub fn cursor_opened(&self) -> bool {
        self.cursor_opened.get()
    }

    pub fn cursor_released(&self) -> bool {
        self.cursor_released.get()
    }
}

struct VecCursor<'a> {
    records: std::vec::IntoIter<LegacyRecord>,
    total: u64,
    released: &'a Cell<bool>,
}

impl Iterator for VecCursor<'_> {
    type Item = Result<LegacyRecord, DatabaseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(Ok)
    }
}

impl RecordCursor for VecCursor<'_> {
    fn row_count(&self) -> u64 {
        self.total
    }

    fn close(self: Box<Self>) {}
}

impl Drop for VecCursor<'_> {
    fn drop(&mut self) {
        self.released.set(true);
    }
}

impl DataAccess for MemoryStore {
    fn table_exists(&self, _table: &str) -> Result<bool, DatabaseError> {
        Ok(self.has_dam_table)
    }

    fn select_migrated_files(&self) -> Result<Box<dyn RecordCursor + '_>, DatabaseError> {
        self.cursor_opened.set(true);
        Ok(Box::new(VecCursor {
            records: self.records.clone().into_iter(),
            total: self.records.len() as u64,
            released: &self.cursor_released,
        }))
    }

    fn update(&self, table: &str, uid: u64, payload: &Payload) -> Result<bool, DatabaseError> {
        let mut updates = self.updates.borrow_mut();
        if self.fail_after.is_some_and(|n| updates.len() >= n) {
            return Err(DatabaseError::Io(std::io::Error::other("disk full")));
        }
        updates.push((table.to_string(), uid, payload.clone()));
        Ok(self.rows_affected)
    }
}

/// Reporter that keeps every message per channel.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub headers: Vec<String>,
    pub infos: Vec<String>,
    pub progress: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn header(&mut self, text: &str) {
        self.headers.push(text.to_string());
    }

    fn info(&mut self, text: &str) {
        self.infos.push(text.to_string());
    }

    fn progress(&mut self, text: &str) {
        self.progress.push(text.to_string());
    }
}
