use std::collections::BTreeMap;

use serde_json::Value;

/// A stored table row: column name -> value.
pub type Row = BTreeMap<String, Value>;

/// Column values destined for one update of one row.
pub type Payload = BTreeMap<String, Value>;

/// One row of the migrated-files join: the target metadata and file rows plus
/// every column of the DAM record they originate from.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRecord {
    pub metadata_uid: u64,
    pub file_uid: u64,
    pub dam_uid: u64,
    pub columns: Row,
}

impl LegacyRecord {
    /// Value of a DAM column, `Null` when the record has no such column.
    pub fn column(&self, name: &str) -> Value {
        self.columns.get(name).cloned().unwrap_or(Value::Null)
    }
}

/// Read a column as a uid. Accepts unsigned integers and numeric strings;
/// anything else (including zero and negatives) yields `None`.
pub fn uid_value(row: &Row, column: &str) -> Option<u64> {
    let uid = match row.get(column)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    uid.filter(|uid| *uid > 0)
}
