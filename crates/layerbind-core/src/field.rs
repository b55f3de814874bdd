//! Configurable field declarations
//!
//! A component declares each configurable field as a `static` [`Setting`]:
//!
//! ```ignore
//! use layerbind_core::{FieldSpec, Setting};
//!
//! static PORT: Setting<u16> = Setting::new(
//!     FieldSpec::new("net.Listener", "Configuration_Port")
//!         .alias("port")
//!         .performance("9000"),
//!     8080,
//! );
//! ```
//!
//! The field's key is its owner path followed by its name with the
//! `Configuration_` prefix stripped (`net.Listener.Port`). The declared shape
//! comes from the value type through [`Configurable`].

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::curve::Curve;
use crate::manager;
use crate::resolved::ResolvedValues;

/// Prefix stripped from field names to form the public key segment.
pub const FIELD_PREFIX: &str = "Configuration_";

/// Primitive kinds a scalar or list element can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int { min: i64, max: i64 },
    UInt { max: u64 },
    Float,
    Text,
    /// One of a fixed set of variant names
    Enum(&'static [&'static str]),
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int { min, max } => write!(f, "integer in [{min}, {max}]"),
            Self::UInt { max } => write!(f, "unsigned integer in [0, {max}]"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("string"),
            Self::Enum(variants) => write!(f, "one of {}", variants.join("|")),
        }
    }
}

/// Declared shape of a field, selecting its coercion function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar(ScalarKind),
    /// Sequence of scalars; `fixed` for boxed slices, growable otherwise
    List { element: ScalarKind, fixed: bool },
    Curve,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::List { element, fixed: false } => write!(f, "list of {element}"),
            Self::List { element, fixed: true } => write!(f, "array of {element}"),
            Self::Curve => f.write_str("curve"),
        }
    }
}

/// A value after coercion to a declared shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
    Curve(Curve),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Curve(curve) => write!(f, "{curve}"),
        }
    }
}

/// Types that can back a configurable field.
pub trait Configurable: Sized {
    /// Shape the binder coerces raw overrides to.
    const SHAPE: Shape;

    /// Extract a value of this type from a coerced value.
    fn from_value(value: &FieldValue) -> Option<Self>;

    /// The coerced representation of this value.
    fn to_value(&self) -> FieldValue;
}

/// Types usable as list elements.
pub trait ConfigurableScalar: Configurable {
    const KIND: ScalarKind;
}

macro_rules! configurable_signed {
    ($($ty:ty),+) => {$(
        impl Configurable for $ty {
            const SHAPE: Shape = Shape::Scalar(Self::KIND);

            fn from_value(value: &FieldValue) -> Option<Self> {
                match value {
                    FieldValue::Int(i) => <$ty>::try_from(*i).ok(),
                    FieldValue::UInt(u) => <$ty>::try_from(*u).ok(),
                    _ => None,
                }
            }

            fn to_value(&self) -> FieldValue {
                FieldValue::Int(*self as i64)
            }
        }

        impl ConfigurableScalar for $ty {
            const KIND: ScalarKind = ScalarKind::Int {
                min: <$ty>::MIN as i64,
                max: <$ty>::MAX as i64,
            };
        }
    )+};
}

macro_rules! configurable_unsigned {
    ($($ty:ty),+) => {$(
        impl Configurable for $ty {
            const SHAPE: Shape = Shape::Scalar(Self::KIND);

            fn from_value(value: &FieldValue) -> Option<Self> {
                match value {
                    FieldValue::UInt(u) => <$ty>::try_from(*u).ok(),
                    FieldValue::Int(i) => <$ty>::try_from(*i).ok(),
                    _ => None,
                }
            }

            fn to_value(&self) -> FieldValue {
                FieldValue::UInt(*self as u64)
            }
        }

        impl ConfigurableScalar for $ty {
            const KIND: ScalarKind = ScalarKind::UInt { max: <$ty>::MAX as u64 };
        }
    )+};
}

configurable_signed!(i8, i16, i32, i64);
configurable_unsigned!(u8, u16, u32, u64, usize);

impl Configurable for bool {
    const SHAPE: Shape = Shape::Scalar(Self::KIND);

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl ConfigurableScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;
}

impl Configurable for f64 {
    const SHAPE: Shape = Shape::Scalar(Self::KIND);

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl ConfigurableScalar for f64 {
    const KIND: ScalarKind = ScalarKind::Float;
}

impl Configurable for f32 {
    const SHAPE: Shape = Shape::Scalar(Self::KIND);

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(x) => Some(*x as f32),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(f64::from(*self))
    }
}

impl ConfigurableScalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float;
}

impl Configurable for String {
    const SHAPE: Shape = Shape::Scalar(Self::KIND);

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl ConfigurableScalar for String {
    const KIND: ScalarKind = ScalarKind::Text;
}

impl Configurable for Curve {
    const SHAPE: Shape = Shape::Curve;

    fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Curve(curve) => Some(curve.clone()),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Curve(self.clone())
    }
}

fn list_items<T: ConfigurableScalar>(value: &FieldValue) -> Option<Vec<T>> {
    match value {
        FieldValue::List(items) => items.iter().map(T::from_value).collect(),
        _ => None,
    }
}

impl<T: ConfigurableScalar> Configurable for Vec<T> {
    const SHAPE: Shape = Shape::List {
        element: T::KIND,
        fixed: false,
    };

    fn from_value(value: &FieldValue) -> Option<Self> {
        list_items(value)
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::List(self.iter().map(Configurable::to_value).collect())
    }
}

impl<T: ConfigurableScalar> Configurable for Box<[T]> {
    const SHAPE: Shape = Shape::List {
        element: T::KIND,
        fixed: true,
    };

    fn from_value(value: &FieldValue) -> Option<Self> {
        list_items(value).map(Vec::into_boxed_slice)
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::List(self.iter().map(Configurable::to_value).collect())
    }
}

/// Implement [`Configurable`] for a fieldless enum, keyed by variant name.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Mode { Fast, Safe }
/// layerbind_core::configurable_enum!(Mode { Fast, Safe });
/// ```
#[macro_export]
macro_rules! configurable_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::Configurable for $ty {
            const SHAPE: $crate::Shape = $crate::Shape::Scalar(
                <Self as $crate::ConfigurableScalar>::KIND,
            );

            fn from_value(value: &$crate::FieldValue) -> Option<Self> {
                match value {
                    $crate::FieldValue::Text(name) => match name.as_str() {
                        $(stringify!($variant) => Some($ty::$variant),)+
                        _ => None,
                    },
                    _ => None,
                }
            }

            fn to_value(&self) -> $crate::FieldValue {
                match self {
                    $($ty::$variant => $crate::FieldValue::Text(stringify!($variant).to_string()),)+
                }
            }
        }

        impl $crate::ConfigurableScalar for $ty {
            const KIND: $crate::ScalarKind =
                $crate::ScalarKind::Enum(&[$(stringify!($variant)),+]);
        }
    };
}

/// Static identity and options of one configurable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    owner: &'static str,
    name: &'static str,
    alias: Option<&'static str>,
    performance: Option<&'static str>,
}

impl FieldSpec {
    /// Declare a field `name` owned by the type at `owner`.
    ///
    /// `owner` may use `.` or `::` separators; `module_path!()` works.
    pub const fn new(owner: &'static str, name: &'static str) -> Self {
        Self {
            owner,
            name,
            alias: None,
            performance: None,
        }
    }

    /// Short command-line name looked up before the full key.
    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Literal substituted in performance-test mode, coerced like an override.
    pub const fn performance(mut self, literal: &'static str) -> Self {
        self.performance = Some(literal);
        self
    }

    pub fn owner(&self) -> String {
        self.owner.replace("::", ".")
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field name with the conventional prefix removed.
    pub fn public_name(&self) -> &'static str {
        self.name.strip_prefix(FIELD_PREFIX).unwrap_or(self.name)
    }

    pub fn alias_name(&self) -> Option<&'static str> {
        self.alias
    }

    pub fn performance_literal(&self) -> Option<&'static str> {
        self.performance
    }

    /// Fully-qualified override key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.owner(), self.public_name())
    }
}

/// A field as seen by the binder: identity, declared shape, and the value it
/// holds before any override is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub spec: FieldSpec,
    pub shape: Shape,
    pub default: FieldValue,
}

impl FieldDescriptor {
    pub fn new(spec: FieldSpec, shape: Shape, default: FieldValue) -> Self {
        Self {
            spec,
            shape,
            default,
        }
    }

    pub fn key(&self) -> String {
        self.spec.key()
    }
}

/// A configurable field.
///
/// Reads go to the currently published configuration; a field that was never
/// bound reads as its compiled-in default.
pub struct Setting<T> {
    spec: FieldSpec,
    default: T,
    key: OnceLock<String>,
}

impl<T> Setting<T> {
    pub const fn new(spec: FieldSpec, default: T) -> Self {
        Self {
            spec,
            default,
            key: OnceLock::new(),
        }
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn key(&self) -> &str {
        self.key.get_or_init(|| self.spec.key())
    }
}

impl<T: Configurable + Clone> Setting<T> {
    /// Descriptor registered with a component.
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor::new(self.spec, T::SHAPE, self.default.to_value())
    }

    /// Current value from the process-wide manager.
    pub fn get(&self) -> T {
        match manager::global() {
            Some(manager) => self.get_from(&manager.current().values),
            None => self.default.clone(),
        }
    }

    /// Value recorded in `values`, or the default when the field is unset.
    pub fn get_from(&self, values: &ResolvedValues) -> T {
        values
            .get(self.key())
            .and_then(T::from_value)
            .unwrap_or_else(|| self.default.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("spec", &self.spec)
            .field("default", &self.default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mode {
        Fast,
        Safe,
    }
    crate::configurable_enum!(Mode { Fast, Safe });

    #[test]
    fn key_strips_prefix_and_normalizes_owner() {
        let spec = FieldSpec::new("app::net::Listener", "Configuration_Port");
        assert_eq!(spec.key(), "app.net.Listener.Port");
        assert_eq!(spec.public_name(), "Port");
    }

    #[test]
    fn key_without_prefix_uses_name() {
        assert_eq!(FieldSpec::new("a.B", "Retries").key(), "a.B.Retries");
    }

    #[test]
    fn shapes_follow_types() {
        assert_eq!(bool::SHAPE, Shape::Scalar(ScalarKind::Bool));
        assert_eq!(
            <Vec<u8>>::SHAPE,
            Shape::List {
                element: ScalarKind::UInt { max: 255 },
                fixed: false
            }
        );
        assert_eq!(
            <Box<[i16]>>::SHAPE,
            Shape::List {
                element: ScalarKind::Int { min: -32768, max: 32767 },
                fixed: true
            }
        );
        assert_eq!(Curve::SHAPE, Shape::Curve);
        assert_eq!(Mode::SHAPE, Shape::Scalar(ScalarKind::Enum(&["Fast", "Safe"])));
    }

    #[test]
    fn enum_from_variant_name() {
        assert_eq!(Mode::from_value(&FieldValue::Text("Safe".into())), Some(Mode::Safe));
        assert_eq!(Mode::from_value(&FieldValue::Text("safe".into())), None);
        assert_eq!(Mode::from_value(&FieldValue::Text("Fast".into())), Some(Mode::Fast));
    }

    #[test]
    fn descriptor_carries_default_value() {
        static HOSTS: Setting<Vec<String>> =
            Setting::new(FieldSpec::new("t.Client", "Configuration_Hosts").alias("hosts"), Vec::new());
        let descriptor = HOSTS.descriptor();
        assert_eq!(descriptor.key(), "t.Client.Hosts");
        assert_eq!(descriptor.default, FieldValue::List(Vec::new()));
        assert_eq!(descriptor.spec.alias_name(), Some("hosts"));
        assert_eq!(Mode::Safe.to_value(), FieldValue::Text("Safe".into()));
    }

    #[test]
    fn unbound_setting_reads_default() {
        static RETRIES: Setting<u32> = Setting::new(FieldSpec::new("t.Client", "Retries"), 3);
        assert_eq!(RETRIES.get_from(&ResolvedValues::default()), 3);
        assert_eq!(RETRIES.key(), "t.Client.Retries");
    }
}
