//! Raw override values
//!
//! Values arrive from JSON files and the command line before anything is
//! known about the field they will be bound to. [`RawValue`] is the small
//! tagged union the override store carries; coercion to a declared shape
//! happens later, in [`crate::coerce`].

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A single scalar override value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Convert a JSON scalar. Returns `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::UInt(u))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// A value held by the override store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl RawValue {
    /// Convert a JSON value found in a configuration section.
    ///
    /// Objects, and arrays holding anything but scalars, are not
    /// representable and yield `None`. A `null` array element becomes an
    /// empty string, so it binds as `""` in a text list and fails coercion
    /// for any other element kind.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => Some(Scalar::Str(String::new())),
                    other => Scalar::from_json(other),
                })
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            Value::Object(_) => None,
            scalar => Scalar::from_json(scalar).map(Self::Scalar),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short description used in conversion errors.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Scalar(Scalar::Str(s)) => format!("string {s:?}"),
            Self::Scalar(Scalar::Bool(b)) => format!("flag {b}"),
            Self::Scalar(other) => format!("number {other}"),
            Self::List(items) => format!("list of {} item(s)", items.len()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Scalar(s) => write!(f, "{s}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<Scalar> for RawValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::from(s))
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}
