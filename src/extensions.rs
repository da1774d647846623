//! Installed optional extensions.

use std::collections::BTreeSet;

use crate::migration::ExtensionRegistry;

/// Extension keys reported as installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedExtensions {
    keys: BTreeSet<String>,
}

impl LoadedExtensions {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl ExtensionRegistry for LoadedExtensions {
    fn is_loaded(&self, extension: &str) -> bool {
        self.keys.contains(&extension.trim().to_lowercase())
    }
}
