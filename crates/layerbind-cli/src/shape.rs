//! Parsing of field shapes and field declarations given on the command line

use layerbind_core::{Configurable, ConfigurableScalar, Curve, FieldDescriptor, FieldSpec, FieldValue, ScalarKind, Shape};

use crate::error::{CliError, Result};

/// Parse `bool`, `u16`, `list<text>`, `array<i32>`, `enum:Low|High`, ...
pub fn parse_shape(text: &str) -> Result<Shape> {
    let text = text.trim();
    if text == "curve" {
        return Ok(Curve::SHAPE);
    }
    if let Some(inner) = text.strip_prefix("list<").and_then(|rest| rest.strip_suffix('>')) {
        return Ok(Shape::List {
            element: parse_kind(inner)?,
            fixed: false,
        });
    }
    if let Some(inner) = text.strip_prefix("array<").and_then(|rest| rest.strip_suffix('>')) {
        return Ok(Shape::List {
            element: parse_kind(inner)?,
            fixed: true,
        });
    }
    parse_kind(text).map(Shape::Scalar)
}

fn parse_kind(text: &str) -> Result<ScalarKind> {
    let kind = match text.trim() {
        "bool" => bool::KIND,
        "i8" => i8::KIND,
        "i16" => i16::KIND,
        "i32" => i32::KIND,
        "i64" | "int" => i64::KIND,
        "u8" => u8::KIND,
        "u16" => u16::KIND,
        "u32" => u32::KIND,
        "u64" | "uint" => u64::KIND,
        "float" | "f64" | "f32" => f64::KIND,
        "text" | "string" => String::KIND,
        other => match other.strip_prefix("enum:") {
            Some(variants) => ScalarKind::Enum(leak_variants(variants)?),
            None => return Err(CliError::user(format!("Unknown shape '{other}'"))),
        },
    };
    Ok(kind)
}

fn leak_variants(list: &str) -> Result<&'static [&'static str]> {
    let variants: Vec<&'static str> = list
        .split('|')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(leak)
        .collect();
    if variants.is_empty() {
        return Err(CliError::user("Enum shape needs at least one variant"));
    }
    Ok(Box::leak(variants.into_boxed_slice()))
}

// Field identities are `'static`; the few strings built from arguments live
// for the rest of the process anyway.
fn leak(text: &str) -> &'static str {
    Box::leak(text.to_string().into_boxed_str())
}

/// Options of a field declared on the command line.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions<'a> {
    pub alias: Option<&'a str>,
    pub performance: Option<&'a str>,
}

/// Build a descriptor for the dotted `key` with the given shape.
///
/// The default value is what an unset field of that shape reads as.
pub fn descriptor(key: &str, shape: Shape, options: FieldOptions<'_>) -> Result<FieldDescriptor> {
    let (owner, name) = key
        .rsplit_once('.')
        .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
        .ok_or_else(|| CliError::user(format!("Field key '{key}' must look like Owner.Field")))?;

    let mut spec = FieldSpec::new(leak(owner), leak(name));
    if let Some(alias) = options.alias {
        spec = spec.alias(leak(alias));
    }
    if let Some(literal) = options.performance {
        spec = spec.performance(leak(literal));
    }
    Ok(FieldDescriptor::new(spec, shape, default_for(&shape)))
}

/// Parse a `KEY` or `KEY=SHAPE` declaration. Shape defaults to text.
pub fn parse_declaration(declaration: &str) -> Result<FieldDescriptor> {
    let (key, shape) = match declaration.split_once('=') {
        Some((key, shape)) => (key, parse_shape(shape)?),
        None => (declaration, Shape::Scalar(ScalarKind::Text)),
    };
    descriptor(key.trim(), shape, FieldOptions::default())
}

fn default_for(shape: &Shape) -> FieldValue {
    match shape {
        Shape::Scalar(ScalarKind::Bool) => FieldValue::Bool(false),
        Shape::Scalar(ScalarKind::Int { .. }) => FieldValue::Int(0),
        Shape::Scalar(ScalarKind::UInt { .. }) => FieldValue::UInt(0),
        Shape::Scalar(ScalarKind::Float) => FieldValue::Float(0.0),
        Shape::Scalar(ScalarKind::Text) => FieldValue::Text(String::new()),
        Shape::Scalar(ScalarKind::Enum(variants)) => {
            FieldValue::Text(variants.first().copied().unwrap_or_default().to_string())
        }
        Shape::List { .. } => FieldValue::List(Vec::new()),
        Shape::Curve => FieldValue::Curve(Curve::unconfigured()),
    }
}
