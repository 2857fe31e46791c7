//! Value types for record fields and cleaned form data.
//!
//! The [`Value`] enum is the currency passed between records and forms:
//! records flatten their fields into values, form fields clean raw input into
//! values, and records are rebuilt from values through [`FromValue`].

use std::fmt;

use crate::error::{DataformError, DataformResult};

/// A dynamically typed field value.
///
/// # Examples
///
/// ```
/// use dataform_core::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v, Value::Int(42));
///
/// let v = Value::from("hello");
/// assert_eq!(v, Value::String("hello".to_string()));
///
/// let v = Value::from(None::<i64>);
/// assert_eq!(v, Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// No value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A date without time.
    Date(chrono::NaiveDate),
    /// A date and time without timezone.
    DateTime(chrono::NaiveDateTime),
    /// A time without date.
    Time(chrono::NaiveTime),
    /// A UUID value.
    Uuid(uuid::Uuid),
    /// A JSON value.
    Json(serde_json::Value),
    /// A list of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if this is [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns a short name for the variant, used in conversion errors.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::String(_) => "String",
            Self::Date(_) => "Date",
            Self::DateTime(_) => "DateTime",
            Self::Time(_) => "Time",
            Self::Uuid(_) => "Uuid",
            Self::Json(_) => "Json",
            Self::List(_) => "List",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, ""),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Time(t) => write!(f, "{t}"),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Json(j) => write!(f, "{j}"),
            Self::List(vals) => {
                write!(f, "[")?;
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(v: chrono::NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(v: chrono::NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<chrono::NaiveTime> for Value {
    fn from(v: chrono::NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

// ── FromValue ──────────────────────────────────────────────────────────

/// Conversion from a [`Value`] back into a typed Rust value.
///
/// Used when a record is rebuilt from cleaned form data.
pub trait FromValue: Sized {
    /// Attempts to convert a value reference to this type.
    fn from_value(value: &Value) -> DataformResult<Self>;
}

fn mismatch<T>(expected: &str, value: &Value) -> DataformResult<T> {
    Err(DataformError::Construction(format!(
        "Expected {expected}, got {}",
        value.kind()
    )))
}

impl FromValue for Value {
    fn from_value(value: &Value) -> DataformResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            _ => mismatch("Bool", value),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            _ => mismatch("Int", value),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Int(i) => Self::try_from(*i).map_err(|e| {
                DataformError::Construction(format!("Int value out of i32 range: {e}"))
            }),
            _ => mismatch("Int", value),
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Int(i) => Self::try_from(*i).map_err(|e| {
                DataformError::Construction(format!("Int value out of i16 range: {e}"))
            }),
            _ => mismatch("Int", value),
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Int(i) => Self::try_from(*i).map_err(|e| {
                DataformError::Construction(format!("Int value out of u32 range: {e}"))
            }),
            _ => mismatch("Int", value),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(i) => Ok(*i as Self),
            _ => mismatch("Float", value),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> DataformResult<Self> {
        #[allow(clippy::cast_possible_truncation)]
        f64::from_value(value).map(|f| f as Self)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => mismatch("String", value),
        }
    }
}

impl FromValue for chrono::NaiveDate {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Date(d) => Ok(*d),
            _ => mismatch("Date", value),
        }
    }
}

impl FromValue for chrono::NaiveDateTime {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::DateTime(dt) => Ok(*dt),
            _ => mismatch("DateTime", value),
        }
    }
}

impl FromValue for chrono::NaiveTime {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Time(t) => Ok(*t),
            _ => mismatch("Time", value),
        }
    }
}

impl FromValue for uuid::Uuid {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Uuid(u) => Ok(*u),
            Value::String(s) => Self::parse_str(s)
                .map_err(|e| DataformError::Construction(format!("Invalid UUID: {e}"))),
            _ => mismatch("Uuid", value),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Json(j) => Ok(j.clone()),
            _ => mismatch("Json", value),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => mismatch("List", value),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> DataformResult<Self> {
        match value {
            Value::Null => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7_i32), Value::Int(7));
        assert_eq!(Value::from(1.5_f64), Value::Float(1.5));
        assert_eq!(Value::from("x"), Value::String("x".into()));
        assert_eq!(Value::from(None::<String>), Value::Null);
    }

    #[test]
    fn test_from_vec_builds_list() {
        let v = Value::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            v,
            Value::List(vec![Value::String("a".into()), Value::String("b".into())])
        );
    }

    #[test]
    fn test_from_value_mismatch_is_construction_error() {
        let err = i64::from_value(&Value::String("nope".into())).unwrap_err();
        assert!(matches!(err, DataformError::Construction(_)));
        assert!(err.to_string().contains("Expected Int, got String"));
    }

    #[test]
    fn test_from_value_i32_range() {
        assert_eq!(i32::from_value(&Value::Int(12)).unwrap(), 12);
        assert!(i32::from_value(&Value::Int(i64::MAX)).is_err());
    }

    #[test]
    fn test_float_accepts_int() {
        assert!((f64::from_value(&Value::Int(3)).unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_option_from_null() {
        assert_eq!(Option::<String>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(&Value::String("a".into())).unwrap(),
            Some("a".to_string())
        );
    }

    #[test]
    fn test_vec_round_trip_through_list() {
        let v = Value::from(vec![1_i64, 2, 3]);
        assert_eq!(Vec::<i64>::from_value(&v).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_display_datetime_uses_iso_separator() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(Value::DateTime(dt).to_string(), "2024-01-15T10:30:00");
        assert_eq!(Value::Null.to_string(), "");
    }
}
