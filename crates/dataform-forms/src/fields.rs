//! Form field definitions and type-level cleaning.
//!
//! Each [`FormFieldDef`] describes a single form field: its type, widget,
//! label, help text and error messages. The [`FormFieldType`] enum is the
//! field's class; [`clean_field_value`] dispatches on it to coerce raw
//! submitted strings into [`Value`]s.

use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use dataform_core::Value;

use crate::widgets::WidgetType;

/// An ordered mapping of field name to field definition.
pub type FieldSet = IndexMap<String, FormFieldDef>;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid regex"));
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

const fn default_strip() -> bool {
    true
}

/// The class of a form field, including type-specific parameters.
///
/// Declarations name classes by their snake_case `type` tag, e.g.
/// `{ type = "email" }` or `{ type = "char", max_length = 20 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormFieldType {
    /// A character (string) field.
    Char {
        /// Minimum length (characters).
        #[serde(default)]
        min_length: Option<usize>,
        /// Maximum length (characters).
        #[serde(default)]
        max_length: Option<usize>,
        /// Whether to strip leading/trailing whitespace.
        #[serde(default = "default_strip")]
        strip: bool,
    },
    /// An integer field.
    Integer {
        /// Minimum allowed value.
        #[serde(default)]
        min_value: Option<i64>,
        /// Maximum allowed value.
        #[serde(default)]
        max_value: Option<i64>,
    },
    /// A floating-point field.
    Float {
        /// Minimum allowed value.
        #[serde(default)]
        min_value: Option<f64>,
        /// Maximum allowed value.
        #[serde(default)]
        max_value: Option<f64>,
    },
    /// A boolean field (true/false).
    Boolean,
    /// A date field (YYYY-MM-DD).
    Date,
    /// A date-time field (YYYY-MM-DDTHH:MM:SS).
    #[serde(rename = "datetime")]
    DateTime,
    /// A time field (HH:MM:SS).
    Time,
    /// An email address field.
    Email,
    /// A URL field.
    Url,
    /// A slug field (letters, numbers, hyphens, underscores).
    Slug,
    /// A UUID field.
    Uuid,
    /// A single-choice field.
    Choice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
}

impl FormFieldType {
    /// An unconstrained, whitespace-stripping character field.
    pub const fn char() -> Self {
        Self::Char {
            min_length: None,
            max_length: None,
            strip: true,
        }
    }

    /// An unbounded integer field.
    pub const fn integer() -> Self {
        Self::Integer {
            min_value: None,
            max_value: None,
        }
    }

    /// An unbounded float field.
    pub const fn float() -> Self {
        Self::Float {
            min_value: None,
            max_value: None,
        }
    }

    /// Returns the class name of this field type.
    pub const fn class_name(&self) -> &'static str {
        match self {
            Self::Char { .. } => "CharField",
            Self::Integer { .. } => "IntegerField",
            Self::Float { .. } => "FloatField",
            Self::Boolean => "BooleanField",
            Self::Date => "DateField",
            Self::DateTime => "DateTimeField",
            Self::Time => "TimeField",
            Self::Email => "EmailField",
            Self::Url => "URLField",
            Self::Slug => "SlugField",
            Self::Uuid => "UUIDField",
            Self::Choice { .. } => "ChoiceField",
        }
    }

    /// Returns `true` for types whose empty value is the empty string.
    const fn is_text_like(&self) -> bool {
        matches!(
            self,
            Self::Char { .. } | Self::Email | Self::Url | Self::Slug
        )
    }
}

/// Complete definition of a form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFieldDef {
    /// The field name (HTML name attribute).
    pub name: String,
    /// The field type, controlling parsing and coercion.
    pub field_type: FormFieldType,
    /// Whether this field is required.
    pub required: bool,
    /// Default/initial value.
    pub initial: Option<Value>,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// The widget type used for presentation.
    pub widget: WidgetType,
    /// Custom error messages keyed by error code (`required`, `invalid`).
    pub error_messages: HashMap<String, String>,
    /// Whether the field is disabled (shown but not editable).
    pub disabled: bool,
}

impl FormFieldDef {
    /// Creates a new `FormFieldDef` with sensible defaults.
    ///
    /// The field is required by default, uses the default widget for its
    /// type, and is labelled with its name.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let widget = default_widget_for_field_type(&field_type);
        let label = name.replace('_', " ");
        Self {
            name,
            field_type,
            required: true,
            initial: None,
            help_text: String::new(),
            label,
            widget,
            error_messages: HashMap::new(),
            disabled: false,
        }
    }

    /// Sets whether this field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget type.
    #[must_use]
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Sets a custom error message for a given code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Merges a map of custom error messages over the existing ones.
    #[must_use]
    pub fn error_messages(mut self, messages: HashMap<String, String>) -> Self {
        self.error_messages.extend(messages);
        self
    }

    /// Sets whether this field is disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns the custom message for `code`, or `default`.
    fn message(&self, code: &str, default: impl FnOnce() -> String) -> String {
        self.error_messages
            .get(code)
            .cloned()
            .unwrap_or_else(default)
    }
}

/// Returns the default widget type for a given form field type.
pub const fn default_widget_for_field_type(field_type: &FormFieldType) -> WidgetType {
    match field_type {
        FormFieldType::Char { .. } | FormFieldType::Slug | FormFieldType::Uuid => {
            WidgetType::TextInput
        }
        FormFieldType::Integer { .. } | FormFieldType::Float { .. } => WidgetType::NumberInput,
        FormFieldType::Boolean => WidgetType::CheckboxInput,
        FormFieldType::Date => WidgetType::DateInput,
        FormFieldType::DateTime => WidgetType::DateTimeInput,
        FormFieldType::Time => WidgetType::TimeInput,
        FormFieldType::Email => WidgetType::EmailInput,
        FormFieldType::Url => WidgetType::UrlInput,
        FormFieldType::Choice { .. } => WidgetType::Select,
    }
}

/// Cleans (validates and coerces) a raw form input string into a typed `Value`.
///
/// 1. Required check (if `required` and the value is empty or missing)
/// 2. Empty optional values become the initial value, or the type's empty value
/// 3. Type coercion (string -> i64, date, etc.)
/// 4. Type-specific constraint validation (min/max, patterns, choices)
///
/// A custom `invalid` message replaces the coercion error of the type.
/// Returns the cleaned `Value` or a list of error messages.
pub fn clean_field_value(field: &FormFieldDef, raw: Option<&str>) -> Result<Value, Vec<String>> {
    let raw_str = raw.unwrap_or("");
    let is_empty = raw_str.is_empty();

    if field.required && is_empty {
        return Err(vec![
            field.message("required", || "This field is required.".to_string())
        ]);
    }

    if is_empty {
        if let Some(initial) = &field.initial {
            return Ok(initial.clone());
        }
        return Ok(match field.field_type {
            ref t if t.is_text_like() => Value::String(String::new()),
            FormFieldType::Boolean => Value::Bool(false),
            _ => Value::Null,
        });
    }

    let mut errors = Vec::new();
    let invalid = |default: &str| field.message("invalid", || default.to_string());

    let value = match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            strip,
        } => {
            let s = if *strip { raw_str.trim() } else { raw_str };
            let len = s.chars().count();
            if let Some(min) = min_length {
                if len < *min {
                    errors.push(format!(
                        "Ensure this value has at least {min} characters (it has {len})."
                    ));
                }
            }
            if let Some(max) = max_length {
                if len > *max {
                    errors.push(format!(
                        "Ensure this value has at most {max} characters (it has {len})."
                    ));
                }
            }
            Value::String(s.to_string())
        }

        FormFieldType::Integer {
            min_value,
            max_value,
        } => match raw_str.trim().parse::<i64>() {
            Ok(n) => {
                if let Some(min) = min_value {
                    if n < *min {
                        errors.push(format!(
                            "Ensure this value is greater than or equal to {min}."
                        ));
                    }
                }
                if let Some(max) = max_value {
                    if n > *max {
                        errors.push(format!("Ensure this value is less than or equal to {max}."));
                    }
                }
                Value::Int(n)
            }
            Err(_) => {
                errors.push(invalid("Enter a whole number."));
                Value::Null
            }
        },

        FormFieldType::Float {
            min_value,
            max_value,
        } => match raw_str.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => {
                if let Some(min) = min_value {
                    if n < *min {
                        errors.push(format!(
                            "Ensure this value is greater than or equal to {min}."
                        ));
                    }
                }
                if let Some(max) = max_value {
                    if n > *max {
                        errors.push(format!("Ensure this value is less than or equal to {max}."));
                    }
                }
                Value::Float(n)
            }
            _ => {
                errors.push(invalid("Enter a number."));
                Value::Null
            }
        },

        FormFieldType::Boolean => {
            let val = matches!(raw_str.to_lowercase().as_str(), "true" | "1" | "yes" | "on");
            if field.required && !val {
                errors.push(field.message("required", || "This field is required.".to_string()));
            }
            Value::Bool(val)
        }

        FormFieldType::Date => match chrono::NaiveDate::parse_from_str(raw_str, "%Y-%m-%d") {
            Ok(d) => Value::Date(d),
            Err(_) => {
                errors.push(invalid("Enter a valid date."));
                Value::Null
            }
        },

        FormFieldType::DateTime => {
            let result = chrono::NaiveDateTime::parse_from_str(raw_str, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw_str, "%Y-%m-%dT%H:%M"))
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw_str, "%Y-%m-%d %H:%M:%S"))
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw_str, "%Y-%m-%d %H:%M"));
            match result {
                Ok(dt) => Value::DateTime(dt),
                Err(_) => {
                    errors.push(invalid("Enter a valid date/time."));
                    Value::Null
                }
            }
        }

        FormFieldType::Time => {
            let result = chrono::NaiveTime::parse_from_str(raw_str, "%H:%M:%S")
                .or_else(|_| chrono::NaiveTime::parse_from_str(raw_str, "%H:%M"));
            match result {
                Ok(t) => Value::Time(t),
                Err(_) => {
                    errors.push(invalid("Enter a valid time."));
                    Value::Null
                }
            }
        }

        FormFieldType::Email => {
            let s = raw_str.trim();
            if !EMAIL_RE.is_match(s) {
                errors.push(invalid("Enter a valid email address."));
            }
            Value::String(s.to_string())
        }

        FormFieldType::Url => {
            let s = raw_str.trim();
            if !URL_RE.is_match(s) {
                errors.push(invalid("Enter a valid URL."));
            }
            Value::String(s.to_string())
        }

        FormFieldType::Slug => {
            if !SLUG_RE.is_match(raw_str) {
                errors.push(invalid(
                    "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens.",
                ));
            }
            Value::String(raw_str.to_string())
        }

        FormFieldType::Uuid => match uuid::Uuid::parse_str(raw_str.trim()) {
            Ok(u) => Value::Uuid(u),
            Err(_) => {
                errors.push(invalid("Enter a valid UUID."));
                Value::Null
            }
        },

        FormFieldType::Choice { choices } => {
            if !choices.iter().any(|(v, _)| v == raw_str) {
                errors.push(field.message("invalid_choice", || {
                    format!("Select a valid choice. {raw_str} is not one of the available choices.")
                }));
            }
            Value::String(raw_str.to_string())
        }
    };

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}
