use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{MappingSet, SchemaFlags};
use crate::storage::models::{LegacyRecord, Payload};
use crate::storage::FILE_TSTAMP;

/// Columns to write to the `sys_file_metadata` row of `record`.
pub fn build_metadata_payload(
    record: &LegacyRecord,
    mappings: &MappingSet,
    flags: SchemaFlags,
) -> Payload {
    let mut payload = Payload::new();

    for (legacy, target) in mappings.base.iter() {
        payload.insert(target.to_string(), record.column(legacy));
    }

    if flags.file_metadata {
        for (legacy, target) in mappings.file_metadata.iter() {
            payload.insert(target.to_string(), record.column(legacy));
        }
    }

    payload
}

/// Columns to write to the `sys_file` row of `record`. Always stamps the
/// modification time.
pub fn build_file_payload(
    record: &LegacyRecord,
    mappings: &MappingSet,
    flags: SchemaFlags,
    now: DateTime<Utc>,
) -> Payload {
    let mut payload = Payload::new();
    payload.insert(FILE_TSTAMP.to_string(), Value::from(now.timestamp()));

    if flags.media {
        for (legacy, target) in mappings.media.iter() {
            payload.insert(target.to_string(), record.column(legacy));
        }
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::Row;
    use serde_json::json;

    fn record(columns: Value) -> LegacyRecord {
        let columns: Row = serde_json::from_value(columns).unwrap();
        LegacyRecord {
            metadata_uid: 10,
            file_uid: 20,
            dam_uid: 5,
            columns,
        }
    }

    fn sunset() -> LegacyRecord {
        record(json!({
            "uid": 5,
            "alt_text": "a",
            "categories": "c",
            "description": "d",
            "hpixels": 5,
            "title": "t",
            "vpixels": 7,
            "caption": "cap",
            "creator": "me",
            "date_cr": 1_000,
            "hidden": 0,
        }))
    }

    #[test]
    fn test_metadata_payload_base_only() {
        let payload = build_metadata_payload(&sunset(), &MappingSet::default(), SchemaFlags::default());

        let expected: Payload = serde_json::from_value(json!({
            "alternative": "a",
            "categories": "c",
            "description": "d",
            "width": 5,
            "title": "t",
            "height": 7,
        }))
        .unwrap();
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_metadata_payload_with_file_metadata_is_superset() {
        let mappings = MappingSet::default();
        let without = build_metadata_payload(&sunset(), &mappings, SchemaFlags::default());
        let with = build_metadata_payload(
            &sunset(),
            &mappings,
            SchemaFlags {
                file_metadata: true,
                media: false,
            },
        );

        for (key, value) in &without {
            assert_eq!(with.get(key), Some(value));
        }
        let added: Vec<&str> = with
            .keys()
            .filter(|k| !without.contains_key(*k))
            .map(String::as_str)
            .collect();
        let mut expected: Vec<&str> = mappings.file_metadata.iter().map(|(_, t)| t).collect();
        expected.sort_unstable();
        assert_eq!(added, expected);
    }

    #[test]
    fn test_metadata_payload_missing_dam_column_is_null() {
        let payload = build_metadata_payload(
            &sunset(),
            &MappingSet::default(),
            SchemaFlags {
                file_metadata: true,
                media: false,
            },
        );
        assert_eq!(payload["content_creation_date"], json!(1_000));
        assert_eq!(payload["publisher"], Value::Null);
    }

    #[test]
    fn test_metadata_payload_ignores_media_flag() {
        let mappings = MappingSet::default();
        let plain = build_metadata_payload(&sunset(), &mappings, SchemaFlags::default());
        let media = build_metadata_payload(
            &sunset(),
            &mappings,
            SchemaFlags {
                file_metadata: false,
                media: true,
            },
        );
        assert_eq!(plain, media);
    }

    #[test]
    fn test_file_payload_only_timestamp_without_media() {
        let now = Utc::now();
        let payload = build_file_payload(
            &sunset(),
            &MappingSet::default(),
            SchemaFlags {
                file_metadata: true,
                media: false,
            },
            now,
        );
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[FILE_TSTAMP], json!(now.timestamp()));
    }

    #[test]
    fn test_file_payload_with_media() {
        let payload = build_file_payload(
            &sunset(),
            &MappingSet::default(),
            SchemaFlags {
                file_metadata: false,
                media: true,
            },
            Utc::now(),
        );
        assert!(payload.contains_key(FILE_TSTAMP));
        assert_eq!(payload["creation_date"], json!(1_000));
        assert_eq!(payload["caption"], json!("cap"));
        assert_eq!(payload.len(), 1 + MappingSet::default().media.len());
    }

    #[test]
    fn test_payloads_follow_pruned_mappings() {
        let mappings = MappingSet {
            base: crate::migration::FieldMapping::from_pairs([("alt_text", "alternative")]),
            ..MappingSet::default()
        };
        let payload = build_metadata_payload(&sunset(), &mappings, SchemaFlags::default());
        assert_eq!(payload.len(), 1);
        assert_eq!(payload["alternative"], json!("a"));
    }
}
