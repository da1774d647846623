//! dam-fal-migration - Copies legacy DAM asset metadata onto migrated FAL records
//!
//! Files that were moved from the DAM asset store into FAL keep a reference to
//! their DAM record but start with empty metadata. This crate provides:
//! - A redb-backed store for the `sys_file`, `sys_file_metadata` and `tx_dam` tables
//! - A persisted column registry used to drop mappings to columns that do not exist
//! - A migration runner copying titles, descriptions, dimensions and the extension
//!   column sets (filemetadata, media) onto the migrated rows

pub mod config;
pub mod extensions;
pub mod i18n;
pub mod migration;
pub mod report;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use config::Config;
use extensions::LoadedExtensions;
use i18n::Catalog;
use migration::{MigrationError, MigrationOutcome, MigrationRunner, Reporter};
use storage::{Database, DatabaseError};

/// Everything a run needs, resolved from configuration.
pub struct MigrationContext {
    pub config: Config,
    pub db: Database,
    pub extensions: LoadedExtensions,
    pub catalog: Catalog,
}

impl MigrationContext {
    pub fn open(config: Config) -> Result<Self, DatabaseError> {
        let db = Database::open(&config.data_dir)?;
        let extensions = LoadedExtensions::new(&config.loaded_extensions);
        let catalog = Catalog::new(config.locale);
        Ok(Self {
            config,
            db,
            extensions,
            catalog,
        })
    }

    /// Load the live schema and run the migration once.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<MigrationOutcome, MigrationError> {
        let schema = self.db.load_schema()?;
        tracing::debug!(
            metadata_columns = ?schema.columns(storage::METADATA_TABLE).collect::<Vec<_>>(),
            file_columns = ?schema.columns(storage::FILE_TABLE).collect::<Vec<_>>(),
            "Loaded schema"
        );
        MigrationRunner::new(&self.db, &schema, &self.extensions, self.catalog).execute(reporter)
    }
}
