//! Component registration
//!
//! A component is a named group of configurable fields bound together.
//! Most components are a [`ComponentManifest`] listing `static` settings;
//! anything that discovers its fields another way implements [`Component`].

use std::fmt;

use crate::field::{Configurable, FieldDescriptor, Setting};

/// Failure to enumerate a component's fields.
///
/// Holds every cause found; the binder reports the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanError {
    causes: Vec<String>,
}

impl ScanError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            causes: vec![cause.into()],
        }
    }

    pub fn push(&mut self, cause: impl Into<String>) {
        self.causes.push(cause.into());
    }

    pub fn first(&self) -> Option<&str> {
        self.causes.first().map(String::as_str)
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first().unwrap_or("field enumeration failed"))
    }
}

impl std::error::Error for ScanError {}

/// A named set of configurable fields.
pub trait Component: Send + Sync {
    /// Name used in the registration set and the snapshot.
    fn name(&self) -> &str;

    /// Every field of the component.
    fn fields(&self) -> Result<Vec<FieldDescriptor>, ScanError>;
}

/// A component assembled from explicitly listed settings.
#[derive(Debug, Clone)]
pub struct ComponentManifest {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl ComponentManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Register a `static` setting.
    pub fn field<T: Configurable + Clone>(mut self, setting: &'static Setting<T>) -> Self {
        self.fields.push(setting.descriptor());
        self
    }

    /// Register a descriptor built by hand.
    pub fn descriptor(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }
}

impl Component for ComponentManifest {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Result<Vec<FieldDescriptor>, ScanError> {
        Ok(self.fields.clone())
    }
}
