use redb::TableDefinition;

/// Column registry: table name -> msgpack Vec of declared column names
pub const SCHEMA_COLUMNS: TableDefinition<&str, &[u8]> = TableDefinition::new("schema_columns");

/// Legacy DAM asset records
pub const DAM_TABLE: &str = "tx_dam";

/// FAL file records
pub const FILE_TABLE: &str = "sys_file";

/// FAL per-file metadata records
pub const METADATA_TABLE: &str = "sys_file_metadata";

/// File column holding the uid of the DAM record the file was migrated from
pub const MIGRATED_DAM_UID: &str = "_migrateddamuid";

/// Metadata column referencing the owning file uid
pub const METADATA_FILE: &str = "file";

/// File column holding the last modification timestamp
pub const FILE_TSTAMP: &str = "tstamp";

/// Definition for a content table: uid -> Row (msgpack)
pub fn row_table(name: &str) -> TableDefinition<'_, u64, &'static [u8]> {
    TableDefinition::new(name)
}
