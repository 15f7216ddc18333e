//! Local backend: secrets kept directly in the secret store.
//!
//! The key names the secret; each property is one entry of its data. Existing
//! entries that are not part of the batch are preserved.

use std::sync::Arc;

use tracing::debug;

use super::Editor;
use crate::core::domain::{ExternalSecret, KeyProperties};
use crate::core::store::{get_optional, SecretStore};
use crate::error::Result;

/// Editor writing into a [`SecretStore`].
pub struct Local {
    store: Arc<dyn SecretStore>,
}

impl Local {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }
}

impl Editor for Local {
    fn write(&mut self, secret: &ExternalSecret, properties: &KeyProperties) -> Result<()> {
        let namespace = secret.namespace.as_str();
        let mut data = get_optional(self.store.as_ref(), &properties.key, namespace)?
            .unwrap_or_default();

        for p in &properties.properties {
            data.insert(p.property.clone(), p.value.as_bytes().to_vec());
        }

        debug!(key = %properties.key, namespace, "writing local secret");
        self.store.put(&properties.key, namespace, &data)
    }
}
