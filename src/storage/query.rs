//! The migrated-files join and its forward-only cursor.

use std::collections::{HashMap, HashSet};

use redb::{ReadOnlyTable, ReadTransaction, ReadableTable};

use super::db::{Database, DatabaseError};
use super::models::{uid_value, LegacyRecord, Payload, Row};
use super::tables::*;
use crate::migration::{DataAccess, RecordCursor};

/// Keys of one join row; the DAM columns are fetched when the row is read.
#[derive(Debug, Clone, Copy)]
struct CandidateKey {
    metadata_uid: u64,
    file_uid: u64,
    dam_uid: u64,
}

/// Cursor over the migrated-files join, reading from one snapshot.
pub struct MigratedFilesCursor {
    keys: std::vec::IntoIter<CandidateKey>,
    total: u64,
    dam_rows: Option<ReadOnlyTable<u64, &'static [u8]>>,
}

fn open_rows(
    read_txn: &ReadTransaction,
    table: &str,
) -> Result<Option<ReadOnlyTable<u64, &'static [u8]>>, DatabaseError> {
    match read_txn.open_table(row_table(table)) {
        Ok(rows) => Ok(Some(rows)),
        Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Select every metadata row whose file was migrated from a DAM record
    /// that still exists.
    ///
    /// Inner join of `sys_file` x `sys_file_metadata` (`file = sys_file.uid`)
    /// x `tx_dam` (`uid = sys_file._migrateddamuid`), restricted to
    /// `_migrateddamuid > 0`, distinct on the metadata uid. A missing table
    /// joins as empty.
    pub fn select_migrated_files(&self) -> Result<MigratedFilesCursor, DatabaseError> {
        let read_txn = self.begin_read()?;
        let files = open_rows(&read_txn, FILE_TABLE)?;
        let metadata = open_rows(&read_txn, METADATA_TABLE)?;
        let dam_rows = open_rows(&read_txn, DAM_TABLE)?;

        let (Some(files), Some(metadata), Some(dam)) = (files, metadata, dam_rows) else {
            return Ok(MigratedFilesCursor {
                keys: Vec::new().into_iter(),
                total: 0,
                dam_rows: None,
            });
        };

        // file uid -> metadata uids
        let mut metadata_by_file: HashMap<u64, Vec<u64>> = HashMap::new();
        for result in metadata.iter()? {
            let (uid, value) = result?;
            let row: Row = rmp_serde::from_slice(value.value())?;
            if let Some(file_uid) = uid_value(&row, METADATA_FILE) {
                metadata_by_file.entry(file_uid).or_default().push(uid.value());
            }
        }

        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for result in files.iter()? {
            let (uid, value) = result?;
            let file_uid = uid.value();
            let row: Row = rmp_serde::from_slice(value.value())?;

            let Some(dam_uid) = uid_value(&row, MIGRATED_DAM_UID) else {
                continue;
            };
            if dam.get(dam_uid)?.is_none() {
                continue;
            }

            for &metadata_uid in metadata_by_file.get(&file_uid).into_iter().flatten() {
                if seen.insert(metadata_uid) {
                    keys.push(CandidateKey {
                        metadata_uid,
                        file_uid,
                        dam_uid,
                    });
                }
            }
        }

        Ok(MigratedFilesCursor {
            total: keys.len() as u64,
            keys: keys.into_iter(),
            dam_rows: Some(dam),
        })
    }
}

impl MigratedFilesCursor {
    fn read(&self, key: CandidateKey) -> Result<LegacyRecord, DatabaseError> {
        let missing = || DatabaseError::InvalidRow {
            table: DAM_TABLE.to_string(),
            uid: key.dam_uid,
            reason: "row disappeared from snapshot".to_string(),
        };

        let dam = self.dam_rows.as_ref().ok_or_else(missing)?;
        let data = dam.get(key.dam_uid)?.ok_or_else(missing)?;
        let columns: Row = rmp_serde::from_slice(data.value())?;

        Ok(LegacyRecord {
            metadata_uid: key.metadata_uid,
            file_uid: key.file_uid,
            dam_uid: key.dam_uid,
            columns,
        })
    }
}

impl Iterator for MigratedFilesCursor {
    type Item = Result<LegacyRecord, DatabaseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        Some(self.read(key))
    }
}

impl RecordCursor for MigratedFilesCursor {
    fn row_count(&self) -> u64 {
        self.total
    }

    fn close(self: Box<Self>) {
        // Dropping the table handle releases the snapshot
        drop(self);
    }
}

impl DataAccess for Database {
    fn table_exists(&self, table: &str) -> Result<bool, DatabaseError> {
        Database::table_exists(self, table)
    }

    fn select_migrated_files(&self) -> Result<Box<dyn RecordCursor + '_>, DatabaseError> {
        Ok(Box::new(Database::select_migrated_files(self)?))
    }

    fn update(&self, table: &str, uid: u64, payload: &Payload) -> Result<bool, DatabaseError> {
        self.update_row(table, uid, payload)
    }
}
