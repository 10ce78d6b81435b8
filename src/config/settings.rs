//! TOML-based configuration.
//!
//! Supports a config file (custom-objects.toml) with environment variable
//! expansion in paths.
//!
//! Example configuration:
//! ```toml
//! [custom_objects]
//! enabled = true
//! item_value_to_contact_relation_limit = 3
//! table_prefix = "mtc_"
//!
//! [sql]
//! dialect = "mysql"
//! alias_scope = "per_fragment"
//!
//! [catalog]
//! path = "${CUSTOM_OBJECTS_HOME}/catalog.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::query::{AliasScope, DepthLimit};
use crate::sql::Dialect;

/// Deepest relationship chain the configuration may ask for.
pub const MAX_RELATION_LIMIT: u32 = DepthLimit::MAX;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub custom_objects: CustomObjectsSettings,
    pub sql: SqlSettings,
    pub catalog: CatalogSettings,
}

/// Plugin settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CustomObjectsSettings {
    /// When false, custom object filters are left to the platform.
    pub enabled: bool,

    /// Deepest chain of relationships followed from a value to a contact.
    pub item_value_to_contact_relation_limit: u32,

    /// Prefix of every table name.
    pub table_prefix: String,
}

impl Default for CustomObjectsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            item_value_to_contact_relation_limit: 3,
            table_prefix: String::new(),
        }
    }
}

impl CustomObjectsSettings {
    pub fn depth_limit(&self) -> Result<DepthLimit, SettingsError> {
        let limit = self.item_value_to_contact_relation_limit;
        if limit > MAX_RELATION_LIMIT {
            return Err(SettingsError::InvalidConfig(format!(
                "item_value_to_contact_relation_limit must be at most {}, got {}",
                MAX_RELATION_LIMIT, limit
            )));
        }
        DepthLimit::new(limit).ok_or_else(|| {
            SettingsError::InvalidConfig(
                "item_value_to_contact_relation_limit must be at least 1".to_string(),
            )
        })
    }
}

/// SQL output settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SqlSettings {
    pub dialect: Dialect,
    pub alias_scope: AliasScope,
}

/// Where object and field definitions live.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog file (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl CatalogSettings {
    /// The catalog path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `CUSTOM_OBJECTS_CONFIG`
    /// 2. `./custom-objects.toml`
    /// 3. `~/.config/custom-objects/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("CUSTOM_OBJECTS_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("custom-objects.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("custom-objects").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.custom_objects.depth_limit()?;

        let prefix = &self.custom_objects.table_prefix;
        if !prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(SettingsError::InvalidConfig(format!(
                "table_prefix '{}' may only contain lowercase letters, digits and '_'",
                prefix
            )));
        }

        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                name.push(ch);
            }
            name
        } else {
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                name.push(ch);
                chars.next();
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
