//! Record types: immutable structs described by a static field list.
//!
//! A [`Record`] knows its [`RecordMeta`] (name plus ordered
//! [`RecordField`]s), can flatten itself into name/value pairs, and can be
//! rebuilt from a name-to-value map. `#[derive(Record)]` generates all three.
//!
//! Construction is strict: a name that is not a field, a missing field that
//! has no default, and a value of the wrong type are all
//! [`DataformError::Construction`] errors.

use std::collections::HashMap;
use std::fmt;

use dataform_core::{DataformError, DataformResult, FromValue, Value};

/// The primitive type tag of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordFieldType {
    /// Text (`String`).
    Text,
    /// Integer (`i16`, `i32`, `i64`, `u32`).
    Integer,
    /// Real number (`f32`, `f64`).
    Float,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time of day.
    DateTime,
    /// Time of day.
    Time,
    /// Any other type, carrying its name as written in source.
    Other(&'static str),
}

impl fmt::Display for RecordFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "String",
            Self::Integer => "i64",
            Self::Float => "f64",
            Self::Boolean => "bool",
            Self::Date => "NaiveDate",
            Self::DateTime => "NaiveDateTime",
            Self::Time => "NaiveTime",
            Self::Other(name) => name,
        };
        f.write_str(name)
    }
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    /// The field name.
    pub name: &'static str,
    /// The field's type tag.
    pub field_type: RecordFieldType,
    /// The field is an `Option<T>`.
    pub nullable: bool,
    /// The field may be omitted at construction time.
    pub has_default: bool,
}

impl RecordField {
    /// Creates a non-nullable field without a default.
    pub const fn new(name: &'static str, field_type: RecordFieldType) -> Self {
        Self {
            name,
            field_type,
            nullable: false,
            has_default: false,
        }
    }

    /// Marks the field as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the field as having a default.
    #[must_use]
    pub const fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Returns `true` if construction can proceed without this field.
    pub const fn is_optional(&self) -> bool {
        self.nullable || self.has_default
    }
}

/// Static description of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    /// The record type's name.
    pub name: &'static str,
    /// Fields in declaration order.
    pub fields: Vec<RecordField>,
}

impl RecordMeta {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if `name` is one of the record's fields.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

/// An immutable data record that forms can be derived from.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use dataform_record::{Record, Value};
///
/// #[derive(Debug, Clone, PartialEq, Record)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// let p = Point { x: 1, y: 2 };
/// assert_eq!(Point::meta().name, "Point");
///
/// let moved = p.replace(HashMap::from([("y".to_string(), Value::Int(5))])).unwrap();
/// assert_eq!(moved, Point { x: 1, y: 5 });
/// ```
pub trait Record: Sized + Send + Sync + 'static {
    /// Returns the static description of this record type.
    fn meta() -> &'static RecordMeta;

    /// Returns every field's value, in declaration order.
    fn field_values(&self) -> Vec<(&'static str, Value)>;

    /// Constructs a record from a full set of field values.
    fn from_values(values: &HashMap<String, Value>) -> DataformResult<Self>;

    /// Returns a copy of `self` with the given fields replaced.
    ///
    /// Names that are not fields of the record are rejected.
    fn replace(&self, changes: HashMap<String, Value>) -> DataformResult<Self> {
        let meta = Self::meta();
        reject_unknown(meta, &changes)?;
        let mut values: HashMap<String, Value> = self
            .field_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        values.extend(changes);
        Self::from_values(&values)
    }
}

/// Fails if `values` names anything that is not a field of `meta`.
///
/// Unknown names are reported in sorted order.
pub fn reject_unknown(meta: &RecordMeta, values: &HashMap<String, Value>) -> DataformResult<()> {
    let mut unknown: Vec<&str> = values
        .keys()
        .map(String::as_str)
        .filter(|name| !meta.has_field(name))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(DataformError::Construction(format!(
        "{}() got unexpected keyword argument(s): {}",
        meta.name,
        unknown.join(", ")
    )))
}

fn convert<T: FromValue>(meta: &RecordMeta, name: &str, value: &Value) -> DataformResult<T> {
    T::from_value(value).map_err(|e| {
        let detail = match e {
            DataformError::Construction(msg) => msg,
            other => other.to_string(),
        };
        DataformError::Construction(format!("{}.{name}: {detail}", meta.name))
    })
}

/// Takes a required field.
pub fn take_field<T: FromValue>(
    meta: &RecordMeta,
    values: &HashMap<String, Value>,
    name: &str,
) -> DataformResult<T> {
    match values.get(name) {
        Some(value) => convert(meta, name, value),
        None => Err(DataformError::Construction(format!(
            "{}() missing required argument: '{name}'",
            meta.name
        ))),
    }
}

/// Takes an `Option<T>` field; absence and `Null` both yield `None`.
pub fn take_optional_field<T: FromValue>(
    meta: &RecordMeta,
    values: &HashMap<String, Value>,
    name: &str,
) -> DataformResult<Option<T>> {
    match values.get(name) {
        Some(value) => convert(meta, name, value),
        None => Ok(None),
    }
}

/// Takes a field that has a default; absence and `Null` both yield
/// `T::default()`.
pub fn take_default_field<T: FromValue + Default>(
    meta: &RecordMeta,
    values: &HashMap<String, Value>,
    name: &str,
) -> DataformResult<T> {
    match values.get(name) {
        Some(Value::Null) | None => Ok(T::default()),
        Some(value) => convert(meta, name, value),
    }
}
