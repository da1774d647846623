use redb::{ReadableTable, ReadableTableMetadata};

use super::db::{Database, DatabaseError};
use super::models::{Payload, Row};
use super::tables::*;

impl Database {
    // ========================================================================
    // Row operations
    // ========================================================================

    /// Store a full row, creating the table on first use
    pub fn put_row(&self, table: &str, uid: u64, row: &Row) -> Result<(), DatabaseError> {
        debug_assert!(uid > 0, "uid must be positive");

        let write_txn = self.begin_write()?;
        {
            let mut rows = write_txn.open_table(row_table(table))?;
            let data = rmp_serde::to_vec_named(row)?;
            rows.insert(uid, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a row by uid. A missing table reads as a missing row.
    pub fn get_row(&self, table: &str, uid: u64) -> Result<Option<Row>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let rows = match read_txn.open_table(row_table(table)) {
            Ok(rows) => rows,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match rows.get(uid)? {
            Some(data) => Ok(Some(rmp_serde::from_slice(data.value())?)),
            None => Ok(None),
        }
    }

    /// Number of rows in a table (zero for a table that does not exist)
    pub fn row_count(&self, table: &str) -> Result<u64, DatabaseError> {
        let read_txn = self.begin_read()?;
        match read_txn.open_table(row_table(table)) {
            Ok(rows) => Ok(rows.len()?),
            Err(redb::TableError::TableDoesNotExist(_)) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge `payload` into the row with the given uid.
    ///
    /// Returns `false` when no such row exists; the table is left untouched.
    pub fn update_row(&self, table: &str, uid: u64, payload: &Payload) -> Result<bool, DatabaseError> {
        // Opening a table for writing creates it
        if !self.table_exists(table)? {
            return Ok(false);
        }

        let write_txn = self.begin_write()?;

        let existing: Option<Row> = {
            let rows = write_txn.open_table(row_table(table))?;
            let result = match rows.get(uid)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut row) => {
                for (column, value) in payload {
                    row.insert(column.clone(), value.clone());
                }
                let serialized = rmp_serde::to_vec_named(&row)?;
                let mut rows = write_txn.open_table(row_table(table))?;
                rows.insert(uid, serialized.as_slice())?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(updated)
    }
}
