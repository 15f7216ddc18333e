//! ExternalSecret declarations.
//!
//! The manifest is a YAML list of resources:
//!
//! ```yaml
//! - name: jx-basic-auth-htpasswd
//!   namespace: jx
//!   backendType: local
//!   data:
//!   - key: jx-basic-auth-htpasswd
//!     property: auth
//! - name: lighthouse-oauth-token
//!   backendType: gcpSecretsManager
//!   projectId: my-project
//!   data:
//!   - key: lighthouse-oauth-token
//!     property: oauth
//! ```
//!
//! Resources without a namespace are placed in the default namespace.

use std::path::Path;

use tracing::debug;

use crate::core::domain::ExternalSecret;
use crate::error::{ConfigError, Result};

/// The declared ExternalSecrets, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    secrets: Vec<ExternalSecret>,
}

impl Manifest {
    pub fn new(secrets: Vec<ExternalSecret>, default_namespace: &str) -> Self {
        let secrets = secrets
            .into_iter()
            .map(|mut s| {
                if s.namespace.is_empty() {
                    s.namespace = default_namespace.to_string();
                }
                s
            })
            .collect();
        Self { secrets }
    }

    /// Parse a manifest document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Yaml` if the document is malformed or names an
    /// unknown backend.
    pub fn parse(contents: &str, default_namespace: &str) -> Result<Self> {
        Self::parse_from("<inline>", contents, default_namespace)
    }

    /// Load the manifest at `path`. A missing file declares nothing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path, default_namespace: &str) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no manifest");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;
        let manifest = Self::parse_from(&path.display().to_string(), &contents, default_namespace)?;
        debug!(path = %path.display(), secrets = manifest.secrets.len(), "manifest loaded");
        Ok(manifest)
    }

    fn parse_from(path: &str, contents: &str, default_namespace: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let secrets: Vec<ExternalSecret> =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::Yaml {
                path: path.to_string(),
                source: e,
            })?;
        Ok(Self::new(secrets, default_namespace))
    }

    pub fn secrets(&self) -> &[ExternalSecret] {
        &self.secrets
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}
