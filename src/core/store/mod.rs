//! Secret store access.
//!
//! Abstracts the cluster (or other) store that holds the real secret data.
//! Editors write through it for the `local` backend and template functions
//! read through it via [`SecretReader`].
//!
//! ## Adding a New Store
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file (e.g., `kube.rs`)
//! 3. Re-export from this module
//!
//! ## Example
//!
//! ```ignore
//! struct Cluster { /* ... */ }
//!
//! impl SecretStore for Cluster {
//!     fn get(&self, name: &str, namespace: &str) -> Result<Payload> {
//!         // GET /api/v1/namespaces/{namespace}/secrets/{name}
//!     }
//!     fn put(&self, name: &str, namespace: &str, data: &Payload) -> Result<()> {
//!         // PUT or POST the secret
//!     }
//! }
//! ```

use crate::core::types::Payload;
use crate::error::Result;

mod fs;
mod memory;
mod reader;

pub use fs::Filesystem;
pub use memory::Memory;
pub use reader::SecretReader;

/// Secret store trait.
///
/// Implementations must report absence as `StoreError::NotFound` so that
/// readers can tell it apart from real failures.
pub trait SecretStore: Send + Sync {
    /// Fetch the data of secret `name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the secret does not exist, or
    /// `StoreError::ReadFailed` for any other failure.
    fn get(&self, name: &str, namespace: &str) -> Result<Payload>;

    /// Create or replace secret `name` in `namespace` with `data`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the secret cannot be stored.
    fn put(&self, name: &str, namespace: &str, data: &Payload) -> Result<()>;
}

/// Look up a secret, mapping not-found to `None`.
pub(crate) fn get_optional(
    store: &dyn SecretStore,
    name: &str,
    namespace: &str,
) -> Result<Option<Payload>> {
    match store.get(name, namespace) {
        Ok(data) => Ok(Some(data)),
        Err(crate::error::Error::Store(e)) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
