//! Moving values between record instances and forms.
//!
//! [`record_to_map`] flattens an instance into initial form values;
//! [`from_cleaned`] turns cleaned form values back into a record, either by
//! replacing fields on an existing instance or by constructing a new one.

use std::collections::HashMap;

use indexmap::IndexMap;

use dataform_core::{DataformResult, Value};

use crate::record::Record;

/// Returns the instance's field values in declaration order.
///
/// When `fields` is given only the named fields are returned. Names in
/// `exclude` are never returned, even when `fields` also names them.
///
/// # Examples
///
/// ```
/// use dataform_record::{record_to_map, Record, Value};
///
/// #[derive(Record)]
/// struct Point {
///     x: i64,
///     y: i64,
///     z: i64,
/// }
///
/// let p = Point { x: 1, y: 2, z: 3 };
/// let fields = vec!["x".to_string(), "y".to_string()];
/// let exclude = vec!["y".to_string()];
/// let map = record_to_map(&p, Some(&fields), Some(&exclude));
/// assert_eq!(map.len(), 1);
/// assert_eq!(map["x"], Value::Int(1));
/// ```
pub fn record_to_map<R: Record>(
    instance: &R,
    fields: Option<&[String]>,
    exclude: Option<&[String]>,
) -> IndexMap<String, Value> {
    instance
        .field_values()
        .into_iter()
        .filter(|(name, _)| fields.map_or(true, |f| f.iter().any(|n| n == name)))
        .filter(|(name, _)| !exclude.is_some_and(|e| e.iter().any(|n| n == name)))
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Builds a record from cleaned values.
///
/// With an existing instance, the result is a copy of it with exactly the
/// cleaned fields replaced. Without one, the cleaned values are the full
/// set of constructor arguments.
///
/// # Errors
///
/// Returns [`DataformError::Construction`](dataform_core::DataformError::Construction)
/// when a name is not a field, a required field is missing, or a value has
/// the wrong type.
pub fn from_cleaned<R: Record>(
    existing: Option<&R>,
    cleaned: HashMap<String, Value>,
) -> DataformResult<R> {
    match existing {
        Some(instance) => instance.replace(cleaned),
        None => R::from_values(&cleaned),
    }
}
