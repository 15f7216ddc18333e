//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

use std::collections::BTreeMap;

/// A secret resource name, optionally namespace-qualified (`ns.name`).
pub type SecretName = String;

/// A Kubernetes-style namespace.
pub type Namespace = String;

/// A key within an external secret (groups properties written together).
pub type Key = String;

/// A single property name within a key (e.g. `password`).
pub type Property = String;

/// Raw secret data as returned by a secret store.
pub type Payload = BTreeMap<String, Vec<u8>>;
