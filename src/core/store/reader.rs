//! Retrying secret reads.

use std::sync::Arc;

use tracing::debug;

use super::SecretStore;
use crate::core::retry::RetryPolicy;
use crate::core::types::Payload;
use crate::error::{Error, Result};

/// Reads secrets, retrying while the store reports them as not found.
///
/// Exhausting the retries is not an error: the caller gets `Ok(None)` and
/// decides how to degrade.
#[derive(Clone)]
pub struct SecretReader {
    store: Arc<dyn SecretStore>,
    policy: RetryPolicy,
}

impl SecretReader {
    /// Create a reader over `store` using `policy` for not-found retries.
    pub fn new(store: Arc<dyn SecretStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Fetch a secret's data.
    ///
    /// # Errors
    ///
    /// Returns any store error other than not-found, without retrying.
    pub fn fetch(&self, name: &str, namespace: &str) -> Result<Option<Payload>> {
        let result = self.policy.retry(
            || self.store.get(name, namespace),
            |e| matches!(e, Error::Store(s) if s.is_not_found()),
        );
        match result {
            Ok(data) => Ok(Some(data)),
            Err(Error::Store(e)) if e.is_not_found() => {
                debug!(name, namespace, "secret not found after retries");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for SecretReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretReader")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
