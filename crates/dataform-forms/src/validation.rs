//! Validation pipeline for form processing.
//!
//! 1. Field-level validation (type coercion and per-field constraints)
//! 2. Form-level cross-field validation (async hook)
//! 3. Post-clean hook
//!
//! Errors accumulate rather than short-circuiting, so all validation
//! issues are reported at once.

use std::collections::HashMap;

use dataform_core::{DataformResult, Value};

use crate::fields::{clean_field_value, FieldSet};
use crate::form::{ErrorMap, Form};

/// Performs field-level validation for all fields.
///
/// Each field's raw value is cleaned with [`clean_field_value`]; successes
/// land in `cleaned_data` and failures in `errors`. Disabled fields skip
/// cleaning and contribute their initial value: the form's `initial` entry
/// if present, else the field's own.
pub fn clean_fields(
    fields: &FieldSet,
    initial: &HashMap<String, Value>,
    raw_data: &HashMap<String, Option<String>>,
    cleaned_data: &mut HashMap<String, Value>,
    errors: &mut ErrorMap,
) {
    for field in fields.values() {
        if field.disabled {
            if let Some(value) = initial.get(&field.name).or(field.initial.as_ref()) {
                cleaned_data.insert(field.name.clone(), value.clone());
            }
            continue;
        }

        let raw = raw_data.get(&field.name).and_then(|v| v.as_deref());

        match clean_field_value(field, raw) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}

/// Runs the full pipeline of `form` and returns its errors as a list of
/// `(field_name, messages)` pairs sorted by field name. An empty list means
/// the form is valid.
///
/// # Errors
///
/// Propagates the error of the form's post-clean hook.
pub async fn full_clean(form: &mut dyn Form) -> DataformResult<Vec<(String, Vec<String>)>> {
    if form.is_valid().await? {
        return Ok(Vec::new());
    }
    let mut errors: Vec<(String, Vec<String>)> = form
        .errors()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    errors.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(errors)
}
