use tracing::debug;

use super::SchemaRegistry;
use crate::storage::{FILE_TABLE, METADATA_TABLE};

/// Metadata columns present on every FAL installation.
const BASE_COLUMNS: &[(&str, &str)] = &[
    ("alt_text", "alternative"),
    ("categories", "categories"),
    ("description", "description"),
    ("hpixels", "width"),
    ("title", "title"),
    ("vpixels", "height"),
];

/// Metadata columns added by the filemetadata extension.
const FILEMETADATA_COLUMNS: &[(&str, &str)] = &[
    ("caption", "caption"),
    ("color_space", "color_space"),
    ("creator", "creator"),
    ("date_cr", "content_creation_date"),
    ("date_mod", "content_modification_date"),
    ("fe_group", "fe_groups"),
    ("file_dl_name", "download_name"),
    ("height_unit", "unit"),
    ("hidden", "visible"),
    ("instructions", "note"),
    ("keywords", "keywords"),
    ("language", "language"),
    ("loc_city", "location_city"),
    ("loc_country", "location_country"),
    ("pages", "pages"),
    ("publisher", "publisher"),
];

/// File columns added by the media extension.
const MEDIA_COLUMNS: &[(&str, &str)] = &[
    ("caption", "caption"),
    ("color_space", "color_space"),
    ("creator", "creator"),
    ("date_cr", "creation_date"),
    ("date_mod", "modification_date"),
    ("fe_group", "fe_groups"),
    ("file_dl_name", "download_name"),
    ("height_unit", "unit"),
    ("hidden", "visible"),
    ("instructions", "note"),
    ("keywords", "keywords"),
    ("language", "language"),
    ("loc_city", "location_city"),
    ("loc_country", "location_country"),
    ("pages", "pages"),
    ("publisher", "publisher"),
];

/// Ordered DAM column -> FAL column correspondence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    pairs: Vec<(String, String)>,
}

impl FieldMapping {
    /// Build a mapping from pairs. A repeated DAM column keeps its first target.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut mapping = Self::default();
        for (legacy, target) in pairs {
            let legacy = legacy.into();
            if mapping.target(&legacy).is_none() {
                mapping.pairs.push((legacy, target.into()));
            }
        }
        mapping
    }

    pub fn base() -> Self {
        Self::from_pairs(BASE_COLUMNS.iter().copied())
    }

    pub fn file_metadata() -> Self {
        Self::from_pairs(FILEMETADATA_COLUMNS.iter().copied())
    }

    pub fn media() -> Self {
        Self::from_pairs(MEDIA_COLUMNS.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn target(&self, legacy: &str) -> Option<&str> {
        self.iter().find(|(l, _)| *l == legacy).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Keep only the pairs whose target column is declared on `table`.
    ///
    /// Dropped pairs are logged at debug level. Applying this to its own
    /// output changes nothing.
    pub fn validate(&self, table: &str, schema: &dyn SchemaRegistry) -> Self {
        let pairs = self
            .pairs
            .iter()
            .filter(|(_, target)| {
                let known = schema.has_column(table, target);
                if !known {
                    debug!(
                        table,
                        field = target.as_str(),
                        "Field {table}:{target} could not be found in schema, will be ignored"
                    );
                }
                known
            })
            .cloned()
            .collect();
        Self { pairs }
    }
}

/// The three mappings a run works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSet {
    /// Always applied to `sys_file_metadata`
    pub base: FieldMapping,
    /// Applied to `sys_file_metadata` when filemetadata is installed
    pub file_metadata: FieldMapping,
    /// Applied to `sys_file` when media is installed
    pub media: FieldMapping,
}

impl Default for MappingSet {
    fn default() -> Self {
        Self {
            base: FieldMapping::base(),
            file_metadata: FieldMapping::file_metadata(),
            media: FieldMapping::media(),
        }
    }
}

impl MappingSet {
    /// Prune each mapping against the table its payload is written to.
    pub fn validate(&self, schema: &dyn SchemaRegistry) -> Self {
        Self {
            base: self.base.validate(METADATA_TABLE, schema),
            file_metadata: self.file_metadata.validate(METADATA_TABLE, schema),
            media: self.media.validate(FILE_TABLE, schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Schema;

    fn metadata_schema(columns: &[&str]) -> Schema {
        Schema::new().with_columns(METADATA_TABLE, columns.iter().copied())
    }

    #[test]
    fn test_validate_keeps_declared_targets() {
        let schema = metadata_schema(&["alternative", "width", "title"]);
        let pruned = FieldMapping::base().validate(METADATA_TABLE, &schema);

        let pairs: Vec<_> = pruned.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("alt_text", "alternative"),
                ("hpixels", "width"),
                ("title", "title")
            ]
        );
    }

    #[test]
    fn test_validate_removes_every_undeclared_target() {
        let schema = metadata_schema(&["alternative"]);
        let mapping = FieldMapping::base();
        let pruned = mapping.validate(METADATA_TABLE, &schema);

        for (legacy, target) in mapping.iter() {
            let kept = pruned.target(legacy).is_some();
            assert_eq!(kept, schema.has_column(METADATA_TABLE, target), "{target}");
        }
    }

    #[test]
    fn test_validate_is_idempotent() {
        let schema = metadata_schema(&["caption", "creator", "note", "unknown"]);
        let once = FieldMapping::file_metadata().validate(METADATA_TABLE, &schema);
        let twice = once.validate(METADATA_TABLE, &schema);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_validate_unknown_table_removes_everything() {
        let schema = metadata_schema(&["alternative"]);
        let pruned = FieldMapping::base().validate("sys_unknown", &schema);
        assert!(pruned.is_empty());
    }

    #[test]
    fn test_validate_does_not_touch_source() {
        let schema = Schema::new();
        let mapping = FieldMapping::media();
        let _ = mapping.validate(FILE_TABLE, &schema);
        assert_eq!(mapping, FieldMapping::media());
    }

    #[test]
    fn test_mapping_set_validates_media_against_file_table() {
        let schema = Schema::new()
            .with_columns(METADATA_TABLE, ["alternative", "caption"])
            .with_columns(FILE_TABLE, ["creation_date"]);
        let set = MappingSet::default().validate(&schema);

        assert_eq!(set.base.iter().collect::<Vec<_>>(), vec![("alt_text", "alternative")]);
        assert_eq!(set.file_metadata.iter().collect::<Vec<_>>(), vec![("caption", "caption")]);
        assert_eq!(set.media.iter().collect::<Vec<_>>(), vec![("date_cr", "creation_date")]);
    }

    #[test]
    fn test_from_pairs_keeps_first_target() {
        let mapping = FieldMapping::from_pairs([("title", "title"), ("title", "headline")]);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.target("title"), Some("title"));
    }
}
