//! In-memory secret store.
//!
//! Used by tests and by embedders that stage secrets before handing them to a
//! real store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::SecretStore;
use crate::core::types::Payload;
use crate::error::{Result, StoreError};

/// Thread-safe in-memory store keyed by `(namespace, name)`.
///
/// Clones share the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    secrets: Arc<Mutex<BTreeMap<(String, String), Payload>>>,
}

impl Memory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a secret built from string pairs.
    pub fn insert(&self, name: &str, namespace: &str, pairs: &[(&str, &str)]) {
        let data = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect();
        self.lock()
            .insert((namespace.to_string(), name.to_string()), data);
    }

    /// Read one value as a string, if present.
    pub fn value(&self, name: &str, namespace: &str, key: &str) -> Option<String> {
        self.lock()
            .get(&(namespace.to_string(), name.to_string()))
            .and_then(|data| data.get(key))
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<(String, String), Payload>> {
        // A poisoned lock only means another test thread panicked mid-insert.
        self.secrets.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SecretStore for Memory {
    fn get(&self, name: &str, namespace: &str) -> Result<Payload> {
        self.lock()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| {
                StoreError::NotFound {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                }
                .into()
            })
    }

    fn put(&self, name: &str, namespace: &str, data: &Payload) -> Result<()> {
        self.lock()
            .insert((namespace.to_string(), name.to_string()), data.clone());
        Ok(())
    }
}
