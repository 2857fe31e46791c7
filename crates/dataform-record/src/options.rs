//! Form options: the declared configuration block of a record form and its
//! validated, normalized form.
//!
//! [`RecordFormMeta`] is what an author writes, either with builder methods
//! or in a TOML file. [`RecordFormOptions`] is what a defined form type
//! keeps: selections are plain name lists, and the `"__all__"` sentinel has
//! been turned into "no restriction".

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use dataform_core::{DataformError, DataformResult};
use dataform_forms::{FormFieldType, WidgetType};

use crate::fields_for::FormFieldCallback;
use crate::record::{Record, RecordMeta};

/// Sentinel for `fields` meaning "every field of the record".
pub const ALL_FIELDS: &str = "__all__";

/// A field selection as declared: one bare name or a list of names.
///
/// Only the list form is meaningful. A bare name is accepted by the type so
/// that the common mistake of writing `fields = "name"` can be reported with
/// a corrective message; the one bare name that is valid is
/// [`ALL_FIELDS`] for `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldSelection {
    /// A single bare name.
    Name(String),
    /// A list of names.
    Names(Vec<String>),
}

impl From<&str> for FieldSelection {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for FieldSelection {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Vec<String>> for FieldSelection {
    fn from(names: Vec<String>) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<&str>> for FieldSelection {
    fn from(names: Vec<&str>) -> Self {
        Self::Names(names.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for FieldSelection {
    fn from(names: &[&str]) -> Self {
        Self::Names(names.iter().map(|n| (*n).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldSelection {
    fn from(names: [&str; N]) -> Self {
        Self::Names(names.iter().map(|n| (*n).to_string()).collect())
    }
}

/// The declared configuration block of a record form.
///
/// # Examples
///
/// ```
/// use dataform_record::{RecordFormMeta, WidgetType};
///
/// let meta = RecordFormMeta::new()
///     .fields(["name", "bio"])
///     .widget("bio", WidgetType::Textarea)
///     .label("name", "Full name");
/// assert!(meta.widgets.contains_key("bio"));
///
/// let from_file = RecordFormMeta::from_toml_str(
///     r#"
///     fields = ["name", "bio"]
///     [widgets]
///     bio = "textarea"
///     "#,
/// )
/// .unwrap();
/// assert_eq!(from_file.fields, meta.fields);
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordFormMeta {
    /// The record type the form is built from.
    #[serde(skip)]
    pub model: Option<&'static RecordMeta>,
    /// Fields to include, in order.
    pub fields: Option<FieldSelection>,
    /// Fields to leave out.
    pub exclude: Option<FieldSelection>,
    /// Widget overrides keyed by field name.
    pub widgets: HashMap<String, WidgetType>,
    /// Label overrides keyed by field name.
    pub labels: HashMap<String, String>,
    /// Help text overrides keyed by field name.
    pub help_texts: HashMap<String, String>,
    /// Error message overrides keyed by field name, then error code.
    pub error_messages: HashMap<String, HashMap<String, String>>,
    /// Field class overrides keyed by field name.
    pub field_classes: HashMap<String, FormFieldType>,
    /// Replaces the type table when deriving fields.
    #[serde(skip)]
    pub formfield_callback: Option<FormFieldCallback>,
}

impl fmt::Debug for RecordFormMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFormMeta")
            .field("model", &self.model.map(|m| m.name))
            .field("fields", &self.fields)
            .field("exclude", &self.exclude)
            .field("widgets", &self.widgets)
            .field("labels", &self.labels)
            .field("help_texts", &self.help_texts)
            .field("error_messages", &self.error_messages)
            .field("field_classes", &self.field_classes)
            .field("formfield_callback", &self.formfield_callback.is_some())
            .finish()
    }
}

impl RecordFormMeta {
    /// Creates an empty configuration block with no record type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration block from TOML.
    ///
    /// The record type and callback cannot be expressed in TOML; set them
    /// with [`model`](Self::model) and
    /// [`formfield_callback`](Self::formfield_callback).
    pub fn from_toml_str(toml_str: &str) -> DataformResult<Self> {
        toml::from_str(toml_str).map_err(|e| {
            DataformError::ConfigurationError(format!("Failed to parse form options: {e}"))
        })
    }

    /// Sets the record type.
    #[must_use]
    pub fn model<R: Record>(mut self) -> Self {
        self.model = Some(R::meta());
        self
    }

    /// Sets the fields to include.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<FieldSelection>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Sets the fields to exclude.
    #[must_use]
    pub fn exclude(mut self, exclude: impl Into<FieldSelection>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    /// Overrides the widget of one field.
    #[must_use]
    pub fn widget(mut self, field: impl Into<String>, widget: WidgetType) -> Self {
        self.widgets.insert(field.into(), widget);
        self
    }

    /// Overrides the label of one field.
    #[must_use]
    pub fn label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field.into(), label.into());
        self
    }

    /// Overrides the help text of one field.
    #[must_use]
    pub fn help_text(mut self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.help_texts.insert(field.into(), text.into());
        self
    }

    /// Overrides one error message of one field.
    #[must_use]
    pub fn error_message(
        mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.error_messages
            .entry(field.into())
            .or_default()
            .insert(code.into(), message.into());
        self
    }

    /// Overrides the field class of one field.
    #[must_use]
    pub fn field_class(mut self, field: impl Into<String>, field_type: FormFieldType) -> Self {
        self.field_classes.insert(field.into(), field_type);
        self
    }

    /// Sets the derivation callback.
    #[must_use]
    pub fn formfield_callback(mut self, callback: FormFieldCallback) -> Self {
        self.formfield_callback = Some(callback);
        self
    }

    /// Validates the block and normalizes it into [`RecordFormOptions`].
    ///
    /// `form_name` is used in the error raised when `fields` or `exclude`
    /// is a bare name.
    pub fn normalize(self, form_name: &str) -> DataformResult<RecordFormOptions> {
        let fields = match self.fields {
            None => None,
            Some(FieldSelection::Name(name)) if name == ALL_FIELDS => None,
            Some(FieldSelection::Name(name)) => return Err(bare_name_error(form_name, "fields", &name)),
            Some(FieldSelection::Names(names)) => Some(names),
        };
        let exclude = match self.exclude {
            None => None,
            Some(FieldSelection::Name(name)) => {
                return Err(bare_name_error(form_name, "exclude", &name))
            }
            Some(FieldSelection::Names(names)) => Some(names),
        };

        Ok(RecordFormOptions {
            model: self.model,
            fields,
            exclude,
            widgets: self.widgets,
            labels: self.labels,
            help_texts: self.help_texts,
            error_messages: self.error_messages,
            field_classes: self.field_classes,
            formfield_callback: self.formfield_callback,
        })
    }
}

fn bare_name_error(form_name: &str, option: &str, value: &str) -> DataformError {
    DataformError::InvalidOption(format!(
        "{form_name}.Meta.{option} cannot be a string. Did you mean to type: ('{value}',)?"
    ))
}

/// The validated options of a defined record form type.
#[derive(Clone, Default)]
pub struct RecordFormOptions {
    /// The record type, if any.
    pub model: Option<&'static RecordMeta>,
    /// Fields to include, in order. `None` means every field.
    pub fields: Option<Vec<String>>,
    /// Fields to leave out.
    pub exclude: Option<Vec<String>>,
    /// Widget overrides keyed by field name.
    pub widgets: HashMap<String, WidgetType>,
    /// Label overrides keyed by field name.
    pub labels: HashMap<String, String>,
    /// Help text overrides keyed by field name.
    pub help_texts: HashMap<String, String>,
    /// Error message overrides keyed by field name, then error code.
    pub error_messages: HashMap<String, HashMap<String, String>>,
    /// Field class overrides keyed by field name.
    pub field_classes: HashMap<String, FormFieldType>,
    /// Replaces the type table when deriving fields.
    pub formfield_callback: Option<FormFieldCallback>,
}

impl fmt::Debug for RecordFormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFormOptions")
            .field("model", &self.model.map(|m| m.name))
            .field("fields", &self.fields)
            .field("exclude", &self.exclude)
            .field("formfield_callback", &self.formfield_callback.is_some())
            .finish_non_exhaustive()
    }
}

impl RecordFormOptions {
    /// Returns `true` if `name` is listed in `exclude`.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|exclude| exclude.iter().any(|n| n == name))
    }

    /// Returns `true` if `name` passes the `fields` restriction.
    pub fn is_included(&self, name: &str) -> bool {
        self.fields
            .as_ref()
            .map_or(true, |fields| fields.iter().any(|n| n == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_conversions() {
        assert_eq!(FieldSelection::from("name"), FieldSelection::Name("name".into()));
        assert_eq!(
            FieldSelection::from(["a", "b"]),
            FieldSelection::Names(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            FieldSelection::from(vec!["a"]),
            FieldSelection::Names(vec!["a".into()])
        );
    }

    #[test]
    fn test_all_fields_sentinel_normalizes_to_none() {
        let opts = RecordFormMeta::new().fields(ALL_FIELDS).normalize("F").unwrap();
        assert!(opts.fields.is_none());
        assert!(opts.is_included("anything"));
    }

    #[test]
    fn test_bare_fields_name_rejected() {
        let err = RecordFormMeta::new()
            .fields("name")
            .normalize("PersonForm")
            .unwrap_err();
        assert!(matches!(err, DataformError::InvalidOption(_)));
        assert_eq!(
            err.to_string(),
            "Invalid option: PersonForm.Meta.fields cannot be a string. Did you mean to type: ('name',)?"
        );
    }

    #[test]
    fn test_bare_exclude_name_rejected() {
        let err = RecordFormMeta::new()
            .exclude("age")
            .normalize("PersonForm")
            .unwrap_err();
        assert!(err.to_string().contains("PersonForm.Meta.exclude cannot be a string"));
    }

    #[test]
    fn test_include_exclude_predicates() {
        let opts = RecordFormMeta::new()
            .fields(["a", "b"])
            .exclude(["b"])
            .normalize("F")
            .unwrap();
        assert!(opts.is_included("a"));
        assert!(!opts.is_included("c"));
        assert!(opts.is_excluded("b"));
        assert!(!opts.is_excluded("a"));
    }

    #[test]
    fn test_error_message_builder_merges() {
        let meta = RecordFormMeta::new()
            .error_message("age", "required", "Needed.")
            .error_message("age", "invalid", "Digits.");
        assert_eq!(meta.error_messages["age"].len(), 2);
    }

    #[test]
    fn test_from_toml_full() {
        let meta = RecordFormMeta::from_toml_str(
            r#"
            fields = ["name", "email", "bio"]
            exclude = ["secret"]

            [widgets]
            bio = "textarea"

            [labels]
            name = "Full name"

            [help_texts]
            email = "We never share it."

            [error_messages.name]
            required = "Tell us your name."

            [field_classes]
            email = { type = "email" }
            "#,
        )
        .unwrap();
        assert_eq!(
            meta.fields,
            Some(FieldSelection::Names(vec![
                "name".into(),
                "email".into(),
                "bio".into()
            ]))
        );
        assert_eq!(meta.widgets["bio"], WidgetType::Textarea);
        assert_eq!(meta.labels["name"], "Full name");
        assert_eq!(meta.error_messages["name"]["required"], "Tell us your name.");
        assert_eq!(meta.field_classes["email"], FormFieldType::Email);
        assert!(meta.model.is_none());
    }

    #[test]
    fn test_from_toml_bare_string_is_kept_for_normalize() {
        let meta = RecordFormMeta::from_toml_str(r#"fields = "name""#).unwrap();
        assert_eq!(meta.fields, Some(FieldSelection::Name("name".into())));
        assert!(meta.normalize("F").is_err());
    }

    #[test]
    fn test_from_toml_unknown_key() {
        let err = RecordFormMeta::from_toml_str("colour = 1").unwrap_err();
        assert!(matches!(err, DataformError::ConfigurationError(_)));
    }
}
