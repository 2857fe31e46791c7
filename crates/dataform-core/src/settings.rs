//! Settings for dataform.
//!
//! [`Settings`] holds library-wide configuration and [`LazySettings`] is the
//! globally accessible, configure-once instance behind [`SETTINGS`]. Reading
//! settings that were never configured yields the defaults.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{DataformError, DataformResult};

/// Library-wide configuration.
///
/// # Examples
///
/// ```
/// use dataform_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.log_level, "info");
/// assert!(!settings.strict_reconstruction);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enables human-readable log output.
    pub debug: bool,

    /// The tracing filter directive, e.g. `"info"` or `"dataform_record=debug"`.
    pub log_level: String,

    /// When `true`, every cleaned value is handed to the record constructor,
    /// so cleaned names that are not record fields fail reconstruction.
    /// When `false`, such names are dropped before reconstruction.
    pub strict_reconstruction: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            strict_reconstruction: false,
        }
    }
}

/// A lazily-initialized global settings holder.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates an unconfigured holder.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Installs the settings. May be called at most once, and only before
    /// the first read.
    pub fn configure(&self, settings: Settings) -> DataformResult<()> {
        self.inner.set(settings).map_err(|_| {
            DataformError::ConfigurationError("Settings have already been configured".to_string())
        })
    }

    /// Returns the configured settings, falling back to the defaults.
    pub fn get(&self) -> &Settings {
        self.inner.get_or_init(Settings::default)
    }

    /// Returns `true` if settings have been configured or read.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
