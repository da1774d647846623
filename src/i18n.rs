//! Operator-facing message texts.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "default" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("migrateDamMetadataCommand", "Migrate DAM metadata to FAL metadata"),
    ("foundMigratedFiles", "Found {count} migrated sys_file records"),
    (
        "damTableNotFound",
        "Table {table} not found. DAM was never installed, nothing to migrate.",
    ),
    ("migratedRecords", "Migrated {count} records"),
];

const DE: &[(&str, &str)] = &[
    ("migrateDamMetadataCommand", "DAM-Metadaten nach FAL migrieren"),
    ("foundMigratedFiles", "{count} migrierte sys_file-Datensätze gefunden"),
    (
        "damTableNotFound",
        "Tabelle {table} nicht gefunden. DAM war nie installiert, nichts zu migrieren.",
    ),
    ("migratedRecords", "{count} Datensätze migriert"),
];

/// Message lookup for one locale. Keys missing from the locale fall back
/// to English, unknown keys to the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        let messages = match self.locale {
            Locale::En => EN,
            Locale::De => DE,
        };
        lookup(messages, key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
    }

    /// Translate and substitute the `{name}` placeholder.
    pub fn format(&self, key: &str, name: &str, value: impl Display) -> String {
        self.translate(key)
            .replace(&format!("{{{name}}}"), &value.to_string())
    }
}

fn lookup<'a>(messages: &[(&str, &'static str)], key: &'a str) -> Option<&'a str> {
    messages
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
}
