//! Verification results.
//!
//! What a verifier reports as missing: per ExternalSecret, the keys that
//! still lack properties, in declaration order.

use super::ExternalSecret;
use crate::core::types::{Key, Property};

/// Properties still unresolved for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryError {
    pub key: Key,
    pub properties: Vec<Property>,
}

impl EntryError {
    /// Create an entry for `key` with the given missing properties.
    pub fn new(key: &str, properties: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            properties: properties.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// An ExternalSecret together with its missing entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretError {
    pub external_secret: ExternalSecret,
    pub entry_errors: Vec<EntryError>,
}

impl SecretError {
    /// Total number of missing properties across all keys.
    pub fn missing_properties(&self) -> usize {
        self.entry_errors.iter().map(|e| e.properties.len()).sum()
    }
}
