//! Copies DAM asset metadata onto the FAL records migrated from it.
//!
//! The runner only talks to its collaborators through the traits below, so
//! it can be driven by the redb store in production and by in-memory fakes
//! in tests.

mod mapping;
mod payload;
mod runner;

pub use mapping::{FieldMapping, MappingSet};
pub use payload::{build_file_payload, build_metadata_payload};
pub use runner::{MigrationOutcome, MigrationRunner, ResultMessage, Severity};

use thiserror::Error;

use crate::storage::models::{LegacyRecord, Payload};
use crate::storage::DatabaseError;

/// Extension key that adds the extended metadata columns.
pub const FILEMETADATA_EXTENSION: &str = "filemetadata";

/// Extension key that adds media columns to the file table.
pub const MEDIA_EXTENSION: &str = "media";

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Data access failed: {0}")]
    DataAccess(#[from] DatabaseError),
}

/// Forward-only cursor over migrated-file records.
///
/// The cursor is released by [`RecordCursor::close`] or, on early exit, by
/// being dropped.
pub trait RecordCursor: Iterator<Item = Result<LegacyRecord, DatabaseError>> {
    /// Total number of rows the query produced.
    fn row_count(&self) -> u64;

    fn close(self: Box<Self>);
}

/// Tables the runner reads from and writes to.
pub trait DataAccess {
    fn table_exists(&self, table: &str) -> Result<bool, DatabaseError>;

    fn select_migrated_files(&self) -> Result<Box<dyn RecordCursor + '_>, DatabaseError>;

    /// Apply `payload` to the row `uid` of `table`. Returns whether a row was affected.
    fn update(&self, table: &str, uid: u64, payload: &Payload) -> Result<bool, DatabaseError>;
}

/// Column declarations of the live schema.
pub trait SchemaRegistry {
    fn has_column(&self, table: &str, column: &str) -> bool;
}

/// Which optional extensions are installed.
pub trait ExtensionRegistry {
    fn is_loaded(&self, extension: &str) -> bool;
}

/// Operator-facing output of a run.
pub trait Reporter {
    fn header(&mut self, text: &str);
    fn info(&mut self, text: &str);
    fn progress(&mut self, text: &str);
}

/// Which optional column sets apply to this run. Resolved once before the
/// first record is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaFlags {
    pub file_metadata: bool,
    pub media: bool,
}

impl SchemaFlags {
    pub fn resolve(extensions: &dyn ExtensionRegistry) -> Self {
        Self {
            file_metadata: extensions.is_loaded(FILEMETADATA_EXTENSION),
            media: extensions.is_loaded(MEDIA_EXTENSION),
        }
    }
}
