// Substitution values and their classification
//
// A value keeps its native form (string, number, boolean, timestamp, UUID,
// list, assoc) until a varspec actually references it; classification then
// resolves it to one of four shapes and applies the fixed string
// conversions.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::{ExpandError, Result};

/// Map of variable names to substitution values passed to
/// [`expand`](crate::expand).
pub type Substitutions = HashMap<String, Value>;

/// A substitution value.
///
/// Scalar variants are normalized to a fixed string form at expansion time:
/// decimal for numbers, `true`/`false` for booleans, `yyyy-MM-ddTHH:mm:ss`
/// with a `Z` or `±HH:MM` suffix for timestamps, hyphenated lowercase for
/// UUIDs. `Null` and empty `List`/`Assoc` values expand to nothing, exactly
/// like a missing key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<FixedOffset>),
    Uuid(Uuid),
    List(Vec<Value>),
    /// Ordered key/value pairs; iteration (and therefore explode output)
    /// follows insertion order.
    Assoc(Vec<(String, Value)>),
}

impl Value {
    /// Builds a `List` from anything convertible to values.
    pub fn list<I, T>(items: I) -> Value
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds an `Assoc` from key/value pairs, preserving their order.
    pub fn assoc<I, K, T>(pairs: I) -> Value
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Value::Assoc(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Shape of a defined, non-empty value as seen by the renderer.
pub(crate) enum Shape<'a> {
    Scalar(String),
    List(&'a [Value]),
    Assoc(&'a [(String, Value)]),
}

/// Classifies a value for one varspec. `None` means the value is undefined
/// for suppression purposes (null or an empty composite); nested
/// collections surface later, when an element fails [`scalar_string`].
pub(crate) fn classify(value: &Value, col: usize) -> Result<Option<Shape<'_>>> {
    match value {
        Value::Null => Ok(None),
        Value::List(items) if items.is_empty() => Ok(None),
        Value::List(items) => Ok(Some(Shape::List(items))),
        Value::Assoc(pairs) if pairs.is_empty() => Ok(None),
        Value::Assoc(pairs) => Ok(Some(Shape::Assoc(pairs))),
        scalar => Ok(Some(Shape::Scalar(scalar_string(scalar, col)?))),
    }
}

/// Fixed string conversion for native scalar values. Anything that is not a
/// scalar here is an unsupported element shape (a nested collection or an
/// explicit null inside a composite) and fails with the offending shape and
/// the column of the triggering varspec.
pub(crate) fn scalar_string(value: &Value, col: usize) -> Result<String> {
    match value {
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(x) => Ok(x.to_string()),
        Value::Text(s) => Ok(s.clone()),
        Value::Timestamp(t) => Ok(t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Value::Uuid(u) => Ok(u.to_string()),
        Value::Null => Err(ExpandError::Type {
            col,
            found: "null".to_string(),
        }),
        Value::List(_) => Err(ExpandError::Type {
            col,
            found: "nested list".to_string(),
        }),
        Value::Assoc(_) => Err(ExpandError::Type {
            col,
            found: "nested assoc".to_string(),
        }),
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t.fixed_offset())
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items.into_iter().map(Value::Text).collect())
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::list(items)
    }
}

impl From<Vec<(String, String)>> for Value {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Value::assoc(pairs)
    }
}

impl From<Vec<(&str, &str)>> for Value {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Value::assoc(pairs)
    }
}

// JSON interop: substitution files map directly onto Value, with object key
// order preserved so assoc expansion is deterministic.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Assoc(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
