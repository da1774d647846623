use chrono::Utc;
use tracing::{debug, info, info_span};

use super::{
    build_file_payload, build_metadata_payload, DataAccess, ExtensionRegistry, MappingSet,
    MigrationError, Reporter, SchemaFlags, SchemaRegistry,
};
use crate::i18n::Catalog;
use crate::storage::{DAM_TABLE, FILE_TABLE, METADATA_TABLE};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The DAM table does not exist; nothing was read or written.
    NoLegacyTable,
    /// Every candidate record was processed.
    Completed { migrated: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Ok,
}

/// Summary shown to the operator once the run is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMessage {
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl MigrationOutcome {
    pub fn result_message(&self, catalog: &Catalog) -> ResultMessage {
        let title = catalog.translate("migrateDamMetadataCommand").to_string();
        match self {
            MigrationOutcome::NoLegacyTable => ResultMessage {
                severity: Severity::Info,
                title,
                body: catalog.format("damTableNotFound", "table", DAM_TABLE),
            },
            MigrationOutcome::Completed { migrated } => ResultMessage {
                severity: Severity::Ok,
                title,
                body: catalog.format("migratedRecords", "count", migrated),
            },
        }
    }
}

/// Copies DAM columns onto the metadata and file rows of every migrated file.
pub struct MigrationRunner<'a> {
    data: &'a dyn DataAccess,
    schema: &'a dyn SchemaRegistry,
    extensions: &'a dyn ExtensionRegistry,
    catalog: Catalog,
    mappings: MappingSet,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(
        data: &'a dyn DataAccess,
        schema: &'a dyn SchemaRegistry,
        extensions: &'a dyn ExtensionRegistry,
        catalog: Catalog,
    ) -> Self {
        Self {
            data,
            schema,
            extensions,
            catalog,
            mappings: MappingSet::default(),
        }
    }

    /// Replace the built-in field mappings.
    pub fn with_mappings(mut self, mappings: MappingSet) -> Self {
        self.mappings = mappings;
        self
    }

    /// Run the migration once.
    ///
    /// A missing DAM table is a normal outcome. Any store failure aborts the
    /// run; rows updated before the failure stay updated.
    pub fn execute(&self, reporter: &mut dyn Reporter) -> Result<MigrationOutcome, MigrationError> {
        let run_id = uuid::Uuid::new_v4();
        let span = info_span!("migrate_dam_metadata", %run_id);
        let _guard = span.enter();

        reporter.header(self.catalog.translate("migrateDamMetadataCommand"));

        if !self.data.table_exists(DAM_TABLE)? {
            info!(table = DAM_TABLE, "Legacy table not found, nothing to migrate");
            return Ok(MigrationOutcome::NoLegacyTable);
        }

        let mut cursor = self.data.select_migrated_files()?;
        let total = cursor.row_count();
        reporter.info(&self.catalog.format("foundMigratedFiles", "count", total));

        let flags = SchemaFlags::resolve(self.extensions);
        let mappings = self.mappings.validate(self.schema);
        info!(
            total,
            file_metadata = flags.file_metadata,
            media = flags.media,
            base_fields = mappings.base.len(),
            file_metadata_fields = mappings.file_metadata.len(),
            media_fields = mappings.media.len(),
            "Starting metadata migration"
        );

        let mut migrated: u64 = 0;
        let mut counter: u64 = 0;
        for record in cursor.by_ref() {
            let record = record?;

            let metadata = build_metadata_payload(&record, &mappings, flags);
            if !self.data.update(METADATA_TABLE, record.metadata_uid, &metadata)? {
                debug!(uid = record.metadata_uid, "No metadata row updated");
            }

            let file = build_file_payload(&record, &mappings, flags, Utc::now());
            if !self.data.update(FILE_TABLE, record.file_uid, &file)? {
                debug!(uid = record.file_uid, "No file row updated");
            }

            reporter.progress(&progress_line(counter, total, record.file_uid));
            migrated += 1;
            counter += 1;
        }
        cursor.close();

        info!(migrated, "Metadata migration complete");
        Ok(MigrationOutcome::Completed { migrated })
    }
}

fn progress_line(counter: u64, total: u64, file_uid: u64) -> String {
    let percent = if total == 0 {
        0.0
    } else {
        100.0 * counter as f64 / total as f64
    };
    format!("{percent:.1}% of {total} id: {file_uid}")
}
