//! Desired versus actual state.
//!
//! A verifier reports, per declared ExternalSecret, which properties are not
//! yet present in the store. Keys are grouped in the order they are first
//! declared and properties keep their declaration order.

use std::sync::Arc;

use tracing::debug;

use crate::core::domain::{EntryError, SecretError};
use crate::core::manifest::Manifest;
use crate::core::store::{get_optional, SecretStore};
use crate::error::Result;

/// Produces the list of missing properties.
pub trait Verifier {
    /// Verify every declared secret, optionally only those in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    fn verify(&self, namespace: Option<&str>) -> Result<Vec<SecretError>>;
}

/// Verifies a [`Manifest`] against a [`SecretStore`].
///
/// A property counts as present when its entry exists with a non-empty value.
pub struct StoreVerifier {
    manifest: Manifest,
    store: Arc<dyn SecretStore>,
}

impl StoreVerifier {
    pub fn new(manifest: Manifest, store: Arc<dyn SecretStore>) -> Self {
        Self { manifest, store }
    }
}

impl Verifier for StoreVerifier {
    fn verify(&self, namespace: Option<&str>) -> Result<Vec<SecretError>> {
        let mut results = Vec::new();

        for secret in self.manifest.secrets() {
            if namespace.is_some_and(|ns| ns != secret.namespace) {
                continue;
            }

            let mut entries: Vec<EntryError> = Vec::new();
            for data in &secret.data {
                let payload = get_optional(self.store.as_ref(), &data.key, &secret.namespace)?;
                let present = payload
                    .as_ref()
                    .and_then(|p| p.get(&data.property))
                    .is_some_and(|v| !v.is_empty());
                if present {
                    continue;
                }

                match entries.iter_mut().find(|e| e.key == data.key) {
                    Some(entry) => {
                        if !entry.properties.contains(&data.property) {
                            entry.properties.push(data.property.clone());
                        }
                    }
                    None => entries.push(EntryError {
                        key: data.key.clone(),
                        properties: vec![data.property.clone()],
                    }),
                }
            }

            if !entries.is_empty() {
                debug!(secret = %secret.name, keys = entries.len(), "missing properties");
                results.push(SecretError {
                    external_secret: secret.clone(),
                    entry_errors: entries,
                });
            }
        }

        Ok(results)
    }
}
