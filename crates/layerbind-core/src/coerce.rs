//! Coercion of raw overrides to declared field shapes
//!
//! One function per shape: scalars go through locale-invariant conversion,
//! lists accept a native sequence or a single comma-delimited string, curves
//! are parsed from their string form.

use crate::curve::Curve;
use crate::field::{FieldValue, ScalarKind, Shape};
use crate::value::{RawValue, Scalar};
use crate::{Error, Result};

/// Separator of list items given as one string.
pub const LIST_SEPARATOR: char = ',';

/// Coerce `raw` to `shape`. `key` is only used for error reporting.
pub fn coerce(key: &str, shape: &Shape, raw: &RawValue) -> Result<FieldValue> {
    match shape {
        Shape::Scalar(kind) => match raw {
            RawValue::Scalar(scalar) => coerce_scalar(key, *kind, scalar),
            other => Err(conversion(key, shape, other.describe())),
        },
        Shape::List { element, .. } => coerce_list(key, *element, raw),
        Shape::Curve => coerce_curve(key, raw),
    }
}

/// Split a delimited list string. The empty string is the empty list.
pub fn split_list(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split(LIST_SEPARATOR).collect()
    }
}

fn coerce_list(key: &str, element: ScalarKind, raw: &RawValue) -> Result<FieldValue> {
    let items = match raw {
        RawValue::Scalar(Scalar::Str(text)) => split_list(text)
            .into_iter()
            .map(|piece| coerce_scalar(key, element, &Scalar::from(piece)))
            .collect::<Result<Vec<_>>>()?,
        RawValue::List(items) => items
            .iter()
            .map(|item| coerce_scalar(key, element, item))
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(Error::Conversion {
                key: key.to_string(),
                expected: format!("list of {element}"),
                found: other.describe(),
            });
        }
    };
    Ok(FieldValue::List(items))
}

fn coerce_curve(key: &str, raw: &RawValue) -> Result<FieldValue> {
    match raw {
        RawValue::Scalar(Scalar::Str(text)) => text
            .parse::<Curve>()
            .map(FieldValue::Curve)
            .map_err(|source| Error::Curve {
                key: key.to_string(),
                source,
            }),
        other => Err(conversion(key, &Shape::Curve, other.describe())),
    }
}

/// Convert one scalar to `kind`.
pub fn coerce_scalar(key: &str, kind: ScalarKind, scalar: &Scalar) -> Result<FieldValue> {
    let fail = || Error::Conversion {
        key: key.to_string(),
        expected: kind.to_string(),
        found: RawValue::Scalar(scalar.clone()).describe(),
    };

    match kind {
        ScalarKind::Bool => to_bool(scalar).map(FieldValue::Bool).ok_or_else(fail),
        ScalarKind::Int { min, max } => to_i64(scalar)
            .filter(|i| (min..=max).contains(i))
            .map(FieldValue::Int)
            .ok_or_else(fail),
        ScalarKind::UInt { max } => to_u64(scalar)
            .filter(|u| *u <= max)
            .map(FieldValue::UInt)
            .ok_or_else(fail),
        ScalarKind::Float => to_f64(scalar).map(FieldValue::Float).ok_or_else(fail),
        ScalarKind::Text => Ok(FieldValue::Text(scalar.to_string())),
        ScalarKind::Enum(variants) => to_variant(scalar, variants)
            .map(|v| FieldValue::Text(v.to_string()))
            .ok_or_else(fail),
    }
}

fn conversion(key: &str, shape: &Shape, found: String) -> Error {
    Error::Conversion {
        key: key.to_string(),
        expected: shape.to_string(),
        found,
    }
}

fn to_bool(scalar: &Scalar) -> Option<bool> {
    match scalar {
        Scalar::Bool(b) => Some(*b),
        Scalar::Int(i) => Some(*i != 0),
        Scalar::UInt(u) => Some(*u != 0),
        Scalar::Float(x) => Some(*x != 0.0),
        Scalar::Str(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
    }
}

/// Floats round half to even, matching invariant numeric conversion.
fn float_to_i128(x: f64) -> Option<i128> {
    if !x.is_finite() {
        return None;
    }
    let rounded = x.round_ties_even();
    if rounded.abs() > 1e30 {
        return None;
    }
    Some(rounded as i128)
}

fn to_i128(scalar: &Scalar) -> Option<i128> {
    match scalar {
        Scalar::Bool(b) => Some(i128::from(*b)),
        Scalar::Int(i) => Some(i128::from(*i)),
        Scalar::UInt(u) => Some(i128::from(*u)),
        Scalar::Float(x) => float_to_i128(*x),
        Scalar::Str(s) => s.trim().parse::<i128>().ok(),
    }
}

fn to_i64(scalar: &Scalar) -> Option<i64> {
    to_i128(scalar).and_then(|i| i64::try_from(i).ok())
}

fn to_u64(scalar: &Scalar) -> Option<u64> {
    to_i128(scalar).and_then(|i| u64::try_from(i).ok())
}

fn to_f64(scalar: &Scalar) -> Option<f64> {
    match scalar {
        Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Scalar::Int(i) => Some(*i as f64),
        Scalar::UInt(u) => Some(*u as f64),
        Scalar::Float(x) => Some(*x),
        Scalar::Str(s) => s.trim().parse::<f64>().ok(),
    }
}

fn to_variant(scalar: &Scalar, variants: &'static [&'static str]) -> Option<&'static str> {
    match scalar {
        Scalar::Str(s) => variants.iter().copied().find(|v| *v == s.trim()),
        Scalar::Int(i) => usize::try_from(*i).ok().and_then(|i| variants.get(i).copied()),
        Scalar::UInt(u) => usize::try_from(*u).ok().and_then(|i| variants.get(i).copied()),
        Scalar::Bool(_) | Scalar::Float(_) => None,
    }
}
