//! Settings loading from configuration files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults; missing keys keep
//!    their defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `DATAFORM_DEBUG` | `debug` |
//! | `DATAFORM_LOG_LEVEL` | `log_level` |
//! | `DATAFORM_STRICT_RECONSTRUCTION` | `strict_reconstruction` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use dataform_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/dataform.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::{DataformError, DataformResult};
use crate::settings::Settings;

/// Loads settings from a TOML string.
pub fn from_toml_str(toml_str: &str) -> DataformResult<Settings> {
    toml::from_str(toml_str)
        .map_err(|e| DataformError::ConfigurationError(format!("Failed to parse TOML: {e}")))
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> DataformResult<Settings> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        DataformError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> DataformResult<Settings> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> DataformResult<Settings> {
    serde_json::from_str(json_str)
        .map_err(|e| DataformError::ConfigurationError(format!("Failed to parse JSON: {e}")))
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `DATAFORM_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

fn apply_overrides_from(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("DATAFORM_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Some(val) = lookup("DATAFORM_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("DATAFORM_STRICT_RECONSTRUCTION") {
        settings.strict_reconstruction = parse_flag(&val);
    }
}

fn parse_flag(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}
