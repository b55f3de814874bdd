//! The published result of a binding pass

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::behavior::ErrorBehaviorMap;
use crate::field::FieldValue;
use crate::loader::LoadedOverrides;
use crate::snapshot::ConfigSnapshot;

/// Coerced value of every bound field, by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedValues {
    values: HashMap<String, FieldValue>,
}

impl ResolvedValues {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.values.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Immutable configuration state readers observe.
///
/// A new `Resolved` is built beside the current one on every bind and reload
/// and swapped in whole.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    /// Overrides the values were resolved from
    pub overrides: Arc<LoadedOverrides>,
    pub values: ResolvedValues,
    pub snapshot: ConfigSnapshot,
    pub error_behaviors: ErrorBehaviorMap,
    /// Incremented on every publish
    pub generation: u64,
}

impl Resolved {
    /// Positional command-line arguments, in order.
    pub fn positional_args(&self) -> &[String] {
        self.overrides.command_line.positional()
    }

    pub fn is_performance_test(&self) -> bool {
        self.overrides.command_line.is_performance_test()
    }
}
