use thiserror::Error;

use crate::i18n::Locale;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the redb database file
    pub data_dir: String,
    /// Extension keys treated as installed (e.g. `filemetadata`, `media`)
    pub loaded_extensions: Vec<String>,
    pub locale: Locale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            loaded_extensions: Vec::new(),
            locale: Locale::En,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let data_dir = lookup("DATA_DIR").unwrap_or(defaults.data_dir);

        let loaded_extensions: Vec<String> = lookup("LOADED_EXTENSIONS")
            .map(|e| {
                e.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.loaded_extensions);

        let locale = match lookup("LOCALE") {
            Some(value) => value.parse().map_err(ConfigError::ValidationError)?,
            None => defaults.locale,
        };

        let config = Config {
            data_dir,
            loaded_extensions,
            locale,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "DATA_DIR cannot be empty".to_string(),
            ));
        }

        for key in &self.loaded_extensions {
            if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid extension key '{key}' in LOADED_EXTENSIONS"
                )));
            }
        }

        Ok(())
    }
}
