//! The override store
//!
//! A flat map from dotted keys to raw values. It is rebuilt from scratch on
//! every load and never mutated once published.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde_json::Value;

use crate::value::RawValue;
use crate::{Error, Result};

/// Flat mapping from dotted configuration keys to raw values.
///
/// Keys are case-sensitive. The last write for a key wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideStore {
    entries: HashMap<String, RawValue>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge one section of a configuration file.
    ///
    /// An object value one level down expands to dotted keys: `{"Foo":
    /// {"Bar": 1}}` stores `Foo.Bar`. Deeper nesting, or a section that is not
    /// an object, is an [`Error::UnsupportedValue`].
    pub fn merge_section(&mut self, source: &Path, section: &str, value: &Value) -> Result<()> {
        let unsupported = |key: &str| Error::UnsupportedValue {
            path: source.to_path_buf(),
            key: key.to_string(),
        };

        let object = match value {
            Value::Null => return Ok(()),
            Value::Object(object) => object,
            _ => return Err(unsupported(section)),
        };

        for (key, value) in object {
            if let Value::Object(nested) = value {
                for (sub_key, sub_value) in nested {
                    let dotted = format!("{key}.{sub_key}");
                    let raw = RawValue::from_json(sub_value).ok_or_else(|| unsupported(&dotted))?;
                    self.insert(dotted, raw);
                }
            } else {
                let raw = RawValue::from_json(value).ok_or_else(|| unsupported(key))?;
                self.insert(key.clone(), raw);
            }
        }
        Ok(())
    }

    /// Sorted JSON view for diagnostics.
    pub fn to_json(&self) -> Value {
        let sorted: BTreeMap<&str, &RawValue> = self.iter().collect();
        serde_json::to_value(sorted).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_expand_to_dotted_keys() {
        let mut store = OverrideStore::new();
        store
            .merge_section(
                Path::new("Configuration.json"),
                "properties",
                &json!({ "Net.Server": { "Port": 8080, "Hosts": ["a", "b"] }, "Verbose": true }),
            )
            .unwrap();

        assert_eq!(store.get("Net.Server.Port"), Some(&RawValue::Scalar(Scalar::Int(8080))));
        assert_eq!(
            store.get("Net.Server.Hosts"),
            Some(&RawValue::List(vec![Scalar::from("a"), Scalar::from("b")]))
        );
        assert_eq!(store.get("Verbose"), Some(&RawValue::from(true)));
        assert!(!store.contains_key("Net.Server"));
    }

    #[test]
    fn later_merge_wins() {
        let mut store = OverrideStore::new();
        let path = Path::new("Configuration.json");
        store.merge_section(path, "properties", &json!({ "K": 1 })).unwrap();
        store.merge_section(path, "debug", &json!({ "K": 2 })).unwrap();
        assert_eq!(store.get("K"), Some(&RawValue::Scalar(Scalar::Int(2))));
    }

    #[test]
    fn null_is_stored_as_null() {
        let mut store = OverrideStore::new();
        store
            .merge_section(Path::new("c.json"), "properties", &json!({ "K": null }))
            .unwrap();
        assert_eq!(store.get("K"), Some(&RawValue::Null));
    }

    #[test]
    fn doubly_nested_object_is_rejected() {
        let mut store = OverrideStore::new();
        let err = store
            .merge_section(
                Path::new("c.json"),
                "properties",
                &json!({ "A": { "B": { "C": 1 } } }),
            )
            .unwrap_err();
        match err {
            Error::UnsupportedValue { key, .. } => assert_eq!(key, "A.B"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_object_section_is_rejected() {
        let mut store = OverrideStore::new();
        let err = store
            .merge_section(Path::new("c.json"), "release", &json!([1, 2]))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { ref key, .. } if key == "release"));
    }
}
