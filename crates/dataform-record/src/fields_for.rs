//! Deriving form fields from a record type.
//!
//! [`fields_for_record`] walks a [`RecordMeta`] in declaration order and
//! produces one [`FormFieldDef`] per retained field. Field classes come from
//! a fixed type table ([`form_field_type_for`]) unless a per-field class
//! override or a derivation callback is configured.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use dataform_core::{DataformError, DataformResult};
use dataform_forms::{FieldSet, FormFieldDef, FormFieldType, WidgetType};

use crate::options::RecordFormOptions;
use crate::record::{RecordField, RecordFieldType, RecordMeta};

/// A derivation callback. Returning `None` omits the field from the form.
pub type FormFieldCallback =
    Arc<dyn Fn(&RecordField, &FieldOverrides) -> Option<FormFieldDef> + Send + Sync>;

/// The overrides configured for a single field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOverrides {
    /// Widget override.
    pub widget: Option<WidgetType>,
    /// Label override.
    pub label: Option<String>,
    /// Help text override.
    pub help_text: Option<String>,
    /// Error messages keyed by code.
    pub error_messages: Option<HashMap<String, String>>,
    /// Field class override.
    pub field_class: Option<FormFieldType>,
}

impl FieldOverrides {
    /// Collects the overrides that `options` holds for `name`.
    pub fn for_field(options: &RecordFormOptions, name: &str) -> Self {
        Self {
            widget: options.widgets.get(name).copied(),
            label: options.labels.get(name).cloned(),
            help_text: options.help_texts.get(name).cloned(),
            error_messages: options.error_messages.get(name).cloned(),
            field_class: options.field_classes.get(name).cloned(),
        }
    }

    /// Applies widget, label, help text and error messages to `field`.
    #[must_use]
    pub fn apply(&self, mut field: FormFieldDef) -> FormFieldDef {
        if let Some(widget) = self.widget {
            field.widget = widget;
        }
        if let Some(label) = &self.label {
            field.label.clone_from(label);
        }
        if let Some(help_text) = &self.help_text {
            field.help_text.clone_from(help_text);
        }
        if let Some(messages) = &self.error_messages {
            field = field.error_messages(messages.clone());
        }
        field
    }
}

/// The result of deriving fields from a record type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedFields {
    /// Derived fields in order. `None` marks a name requested through
    /// `fields` that produced no field.
    pub fields: IndexMap<String, Option<FormFieldDef>>,
    /// Names the callback chose to omit.
    pub omitted: Vec<String>,
}

impl DerivedFields {
    /// Returns the names that were requested but have no field, in order.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, field)| field.is_none())
            .map(|(name, _)| name.as_str())
    }

    /// Drops the unresolved names and returns the field set.
    pub fn into_field_set(self) -> FieldSet {
        self.fields
            .into_iter()
            .filter_map(|(name, field)| field.map(|f| (name, f)))
            .collect()
    }
}

/// Returns the form field class for a record field type.
///
/// # Errors
///
/// Returns [`DataformError::ImproperlyConfigured`] for
/// [`RecordFieldType::Other`].
pub fn form_field_type_for(field: &RecordField) -> DataformResult<FormFieldType> {
    match field.field_type {
        RecordFieldType::Text => Ok(FormFieldType::char()),
        RecordFieldType::Integer => Ok(FormFieldType::integer()),
        RecordFieldType::Float => Ok(FormFieldType::float()),
        RecordFieldType::Boolean => Ok(FormFieldType::Boolean),
        RecordFieldType::Date => Ok(FormFieldType::Date),
        RecordFieldType::DateTime => Ok(FormFieldType::DateTime),
        RecordFieldType::Time => Ok(FormFieldType::Time),
        RecordFieldType::Other(type_name) => Err(DataformError::ImproperlyConfigured(format!(
            "Unsupported type {type_name} for field {}",
            field.name
        ))),
    }
}

/// Builds the default form field for a record field.
///
/// A class override replaces the type table lookup. The field is required
/// unless the record field is nullable or has a default; boolean fields are
/// never required, since a required checkbox could not submit `false`.
pub fn default_form_field(
    field: &RecordField,
    overrides: &FieldOverrides,
) -> DataformResult<FormFieldDef> {
    let field_type = match &overrides.field_class {
        Some(class) => class.clone(),
        None => form_field_type_for(field)?,
    };
    let required = !field.is_optional() && field_type != FormFieldType::Boolean;
    let form_field = FormFieldDef::new(field.name, field_type).required(required);
    Ok(overrides.apply(form_field))
}

/// Derives form fields for `meta` as configured by `options`.
///
/// Fields are visited in declaration order; a field is skipped when
/// `options.fields` is set and does not name it, or when `options.exclude`
/// names it. If `options.fields` is set, the result is then reordered to
/// follow it, dropping excluded and omitted names. Requested names that
/// produced no field map to `None`.
///
/// # Errors
///
/// Returns [`DataformError::ImproperlyConfigured`] when a retained field has
/// an unsupported type and neither a class override nor a callback covers
/// it.
pub fn fields_for_record(
    meta: &RecordMeta,
    options: &RecordFormOptions,
) -> DataformResult<DerivedFields> {
    let mut derived: IndexMap<String, FormFieldDef> = IndexMap::new();
    let mut omitted = Vec::new();

    for field in &meta.fields {
        if !options.is_included(field.name) || options.is_excluded(field.name) {
            continue;
        }

        let overrides = FieldOverrides::for_field(options, field.name);
        let form_field = match &options.formfield_callback {
            Some(callback) => callback(field, &overrides),
            None => Some(default_form_field(field, &overrides)?),
        };

        match form_field {
            Some(form_field) => {
                derived.insert(field.name.to_string(), form_field);
            }
            None => {
                tracing::debug!(record = meta.name, field = field.name, "field omitted by callback");
                omitted.push(field.name.to_string());
            }
        }
    }

    let fields: IndexMap<String, Option<FormFieldDef>> = match &options.fields {
        Some(include) => include
            .iter()
            .filter(|name| !options.is_excluded(name) && !omitted.contains(name))
            .map(|name| (name.clone(), derived.get(name).cloned()))
            .collect(),
        None => derived
            .into_iter()
            .map(|(name, field)| (name, Some(field)))
            .collect(),
    };

    tracing::debug!(record = meta.name, omitted = omitted.len(), "derived form fields");
    Ok(DerivedFields { fields, omitted })
}
