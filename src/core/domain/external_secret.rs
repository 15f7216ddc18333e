//! ExternalSecret declarations.
//!
//! An ExternalSecret names a secret resource, the backend that manages it,
//! and the (key, property) pairs it expects to find there.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::{Key, Namespace, Property, SecretName};
use crate::error::{EditorError, Error};

/// Secret store integration handling an ExternalSecret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackendKind {
    /// Secrets stored directly in the cluster store.
    Local,
    /// HashiCorp Vault KV engine.
    Vault,
    /// Google Secret Manager.
    GcpSecretsManager,
    /// AWS Secrets Manager.
    AwsSecretsManager,
}

impl BackendKind {
    /// All known backends.
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Local,
        BackendKind::Vault,
        BackendKind::GcpSecretsManager,
        BackendKind::AwsSecretsManager,
    ];

    /// Tag used in ExternalSecret manifests.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Vault => "vault",
            Self::GcpSecretsManager => "gcpSecretsManager",
            Self::AwsSecretsManager => "secretsManager",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| EditorError::UnknownBackend(s.to_string()).into())
    }
}

impl TryFrom<String> for BackendKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackendKind> for String {
    fn from(kind: BackendKind) -> Self {
        kind.tag().to_string()
    }
}

/// One declared (key, property) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEntry {
    pub key: Key,
    pub property: Property,
}

/// A declared external secret resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecret {
    pub name: SecretName,
    /// Empty means "the run's default namespace".
    #[serde(default)]
    pub namespace: Namespace,
    pub backend_type: BackendKind,
    /// GCP project holding the secrets (`gcpSecretsManager`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// AWS region (`secretsManager`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// KV mount path (`vault`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
    #[serde(default)]
    pub data: Vec<DataEntry>,
}

impl ExternalSecret {
    /// Create a declaration with no data entries.
    pub fn new(name: &str, namespace: &str, backend_type: BackendKind) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            backend_type,
            project_id: None,
            region: None,
            mount: None,
            data: Vec::new(),
        }
    }

    /// Append a (key, property) entry.
    pub fn with_entry(mut self, key: &str, property: &str) -> Self {
        self.data.push(DataEntry {
            key: key.to_string(),
            property: property.to_string(),
        });
        self
    }
}
