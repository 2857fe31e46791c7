//! Core error types for dataform.
//!
//! [`DataformError`] covers the three failure families of record-backed forms:
//!
//! - configuration errors, raised once when a form type is defined
//!   (unsupported field types, malformed `fields`/`exclude` options,
//!   unknown field names, a form used without a record type);
//! - validation errors, collected per submission;
//! - construction errors, raised when a record cannot be rebuilt from
//!   cleaned data.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists).
///
/// # Examples
///
/// ```
/// use dataform_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required.", "required");
/// assert_eq!(err.to_string(), "This field is required.");
///
/// let mut field_errors = std::collections::HashMap::new();
/// field_errors.insert(
///     "email".to_string(),
///     vec![ValidationError::new("Enter a valid email address.", "invalid")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// assert!(err.to_string().contains("email"));
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: HashMap::new(),
            field_errors,
        }
    }

    /// Builds a compound error from a form's `name -> messages` error map.
    pub fn from_error_map(errors: &HashMap<String, Vec<String>>) -> Self {
        let field_errors = errors
            .iter()
            .map(|(field, messages)| {
                let errs = messages
                    .iter()
                    .map(|m| Self::new(m.clone(), "invalid"))
                    .collect();
                (field.clone(), errs)
            })
            .collect();
        Self::with_field_errors(field_errors)
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut fields: Vec<&String> = self.field_errors.keys().collect();
            fields.sort();
            let mut first = true;
            for field in fields {
                for error in &self.field_errors[field] {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for dataform.
#[derive(Error, Debug)]
pub enum DataformError {
    // ── Configuration (form-type definition time) ────────────────────

    /// The form or record type is improperly configured, e.g. a record
    /// field whose type has no form field mapping.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// The options reference field names that do not resolve to any field.
    #[error("Field error: {0}")]
    FieldError(String),

    /// An option was given in the wrong shape, e.g. a bare name where a
    /// list of names is expected.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    // ── Records ──────────────────────────────────────────────────────

    /// A record instance could not be built from the supplied values.
    #[error("Construction error: {0}")]
    Construction(String),

    /// A record was requested from a form that did not validate.
    #[error("Not valid: {0}")]
    NotValid(String),

    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    // ── Settings / declaration files ─────────────────────────────────

    /// A configuration source is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DataformError {
    /// Returns `true` for errors detected while defining a form type.
    ///
    /// These are developer mistakes: they are raised once, up front, and are
    /// never expected while handling a submission.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ImproperlyConfigured(_)
                | Self::FieldError(_)
                | Self::InvalidOption(_)
                | Self::ConfigurationError(_)
        )
    }
}

impl From<ValidationError> for DataformError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, DataformError>`.
pub type DataformResult<T> = Result<T, DataformError>;
