//! Column registry: which columns each table declares.

use std::collections::{BTreeSet, HashMap};

use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::tables::SCHEMA_COLUMNS;
use crate::migration::SchemaRegistry;

/// In-memory snapshot of the declared columns per table.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: HashMap<String, BTreeSet<String>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare columns on a table, keeping any already declared.
    pub fn with_columns<I, S>(mut self, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(table.to_string())
            .or_default()
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }

    pub fn columns(&self, table: &str) -> impl Iterator<Item = &str> {
        self.tables
            .get(table)
            .into_iter()
            .flat_map(|columns| columns.iter().map(String::as_str))
    }
}

impl SchemaRegistry for Schema {
    fn has_column(&self, table: &str, column: &str) -> bool {
        Schema::has_column(self, table, column)
    }
}

impl Database {
    /// Add column declarations for a table. Existing declarations are kept.
    pub fn declare_columns(&self, table: &str, columns: &[&str]) -> Result<(), DatabaseError> {
        let write_txn = self.begin_write()?;
        {
            let mut registry = write_txn.open_table(SCHEMA_COLUMNS)?;
            let mut declared: BTreeSet<String> = match registry.get(table)? {
                Some(data) => rmp_serde::from_slice(data.value())?,
                None => BTreeSet::new(),
            };
            declared.extend(columns.iter().map(|c| c.to_string()));

            let data = rmp_serde::to_vec_named(&declared)?;
            registry.insert(table, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load every column declaration into a [`Schema`]
    pub fn load_schema(&self) -> Result<Schema, DatabaseError> {
        let read_txn = self.begin_read()?;
        let registry = read_txn.open_table(SCHEMA_COLUMNS)?;

        let mut schema = Schema::new();
        for result in registry.iter()? {
            let (table, value) = result?;
            let columns: BTreeSet<String> = rmp_serde::from_slice(value.value())?;
            schema = schema.with_columns(table.value(), columns);
        }

        Ok(schema)
    }
}
