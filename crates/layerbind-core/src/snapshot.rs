//! Configuration snapshot
//!
//! A diagnostic tree of every bound value, grouped component → owner type →
//! field. It is rebuilt as a side effect of binding and can be exported as
//! JSON; nothing ever reads it back.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Result;
use crate::field::FieldValue;

/// Values applied to the fields of one owner type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypeConfig {
    fields: BTreeMap<String, FieldValue>,
}

impl TypeConfig {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Owner types of one component.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComponentConfig {
    types: BTreeMap<String, TypeConfig>,
}

impl ComponentConfig {
    pub fn get(&self, owner: &str) -> Option<&TypeConfig> {
        self.types.get(owner)
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeConfig)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The whole tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
    components: BTreeMap<String, ComponentConfig>,
}

impl ConfigSnapshot {
    /// Record the value applied to `owner.field` of `component`.
    pub fn record(&mut self, component: &str, owner: &str, field: &str, value: FieldValue) {
        self.components
            .entry(component.to_string())
            .or_default()
            .types
            .entry(owner.to_string())
            .or_default()
            .fields
            .insert(field.to_string(), value);
    }

    /// Drop everything recorded for `component` before it is rebound.
    pub fn remove_component(&mut self, component: &str) {
        self.components.remove(component);
    }

    pub fn component(&self, name: &str) -> Option<&ComponentConfig> {
        self.components.get(name)
    }

    pub fn field(&self, component: &str, owner: &str, field: &str) -> Option<&FieldValue> {
        self.component(component)?.get(owner)?.get(field)
    }

    pub fn components(&self) -> impl Iterator<Item = (&str, &ComponentConfig)> {
        self.components.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Pretty-printed JSON export.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
