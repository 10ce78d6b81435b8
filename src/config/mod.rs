//! Configuration: plugin settings, SQL output and catalog location.

mod settings;

pub use settings::{
    expand_env_vars, CatalogSettings, CustomObjectsSettings, Settings, SettingsError, SqlSettings,
    MAX_RELATION_LIMIT,
};
