//! Resolved property batches.
//!
//! All properties of one key are collected into a [`KeyProperties`] and handed
//! to an editor in a single write.

use std::fmt;

use serde_json::{Map, Value};
use zeroize::Zeroizing;

/// A resolved property value.
#[derive(Clone)]
pub struct PropertyValue {
    pub property: String,
    pub value: Zeroizing<String>,
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyValue")
            .field("property", &self.property)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// The resolved properties for one key, in declaration order.
#[derive(Debug, Clone)]
pub struct KeyProperties {
    pub key: String,
    pub properties: Vec<PropertyValue>,
}

impl KeyProperties {
    /// Start an empty batch for `key`.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            properties: Vec::new(),
        }
    }

    /// Append a resolved property.
    pub fn push(&mut self, property: &str, value: String) {
        self.properties.push(PropertyValue {
            property: property.to_string(),
            value: Zeroizing::new(value),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Value of `property`, if resolved.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.property == property)
            .map(|p| p.value.as_str())
    }

    /// Properties as a JSON object, for backends that store one document per key.
    pub fn to_json(&self) -> Map<String, Value> {
        self.properties
            .iter()
            .map(|p| (p.property.clone(), Value::String(p.value.to_string())))
            .collect()
    }
}

/// Names the key and its properties; values are never shown.
impl fmt::Display for KeyProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.properties.iter().map(|p| p.property.as_str()).collect();
        write!(f, "{}[{}]", self.key, names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_hides_values() {
        let mut batch = KeyProperties::new("db");
        batch.push("username", "bob".to_string());
        batch.push("password", "hunter2".to_string());

        let shown = batch.to_string();
        assert_eq!(shown, "db[username, password]");
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_preserves_push_order() {
        let mut batch = KeyProperties::new("db");
        for p in ["c", "a", "b"] {
            batch.push(p, p.to_uppercase());
        }
        let order: Vec<_> = batch.properties.iter().map(|p| p.property.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert_eq!(batch.get("a"), Some("A"));
    }

    #[test]
    fn test_debug_hides_values() {
        let mut batch = KeyProperties::new("db");
        batch.push("password", "hunter2".to_string());
        assert!(!format!("{:?}", batch).contains("hunter2"));
    }

    #[test]
    fn test_to_json() {
        let mut batch = KeyProperties::new("db");
        batch.push("password", "hunter2".to_string());
        let json = batch.to_json();
        assert_eq!(json["password"], Value::String("hunter2".to_string()));
    }
}
