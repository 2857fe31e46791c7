//! # dataform-core
//!
//! Core types, settings, and error types shared by the dataform crates.
//! This crate has no dependency on the form layer and provides the foundation
//! for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - The [`Value`] type carried by records and cleaned form data
//! - [`settings`] - Library settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{DataformError, DataformResult, ValidationError};
pub use settings::{Settings, SETTINGS};
pub use value::{FromValue, Value};
