//! Settings file management.
//!
//! Handles reading and validating the optional `.backfill.toml` settings
//! file. Every field has a default, so a missing file is the same as an
//! empty one.
//!
//! ```toml
//! [backfill]
//! namespace = "jx"
//! schema = ".backfill/secret-schema.yaml"
//! secrets = ".backfill/external-secrets.yaml"
//! store = ".backfill/store"
//! requirements_dir = "."
//!
//! [retry]
//! attempts = 4
//! base = 5
//! factor = 2
//! jitter = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::retry::RetryPolicy;
use crate::error::{ConfigError, Result};

/// Settings stored in `.backfill.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Locations and defaults
    #[serde(default)]
    pub backfill: Meta,
    /// Backoff for secret lookups made by templates
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// The `[backfill]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    /// Namespace used for resources and unqualified secret names
    pub namespace: String,
    /// Secret schema file
    pub schema: PathBuf,
    /// ExternalSecret manifest
    pub secrets: PathBuf,
    /// Root of the filesystem secret store
    pub store: PathBuf,
    /// Directory holding `jx-requirements.yml`
    pub requirements_dir: PathBuf,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            namespace: constants::DEFAULT_NAMESPACE.to_string(),
            schema: PathBuf::from(constants::SCHEMA_FILE),
            secrets: PathBuf::from(constants::SECRETS_FILE),
            store: PathBuf::from(constants::STORE_DIR),
            requirements_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Path to the settings file in `dir`
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(constants::CONFIG_FILE)
    }

    /// Load settings from the current directory.
    ///
    /// # Errors
    ///
    /// See [`Settings::load_from`].
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load settings from `.backfill.toml` in `dir`, with relative paths
    /// anchored at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file exists but cannot be read,
    /// `ConfigError::Parse` if the TOML is malformed, or
    /// `ConfigError::InvalidValue` if a value is out of range.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        debug!(path = %path.display(), "loading settings");

        let mut settings = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
                path: path.display().to_string(),
                source: e,
            })?;
            Self::parse(&contents)?
        } else {
            debug!("no settings file, using defaults");
            Self::default()
        };

        settings.anchor(dir);
        debug!(
            namespace = %settings.backfill.namespace,
            attempts = settings.retry.attempts,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Parse and validate settings text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` or `ConfigError::InvalidValue`.
    pub fn parse(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    fn anchor(&mut self, dir: &Path) {
        let meta = &mut self.backfill;
        for path in [
            &mut meta.schema,
            &mut meta.secrets,
            &mut meta.store,
            &mut meta.requirements_dir,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// Validate the settings values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let namespace = &self.backfill.namespace;
        if namespace.is_empty() || namespace.contains(constants::NAMESPACE_SEPARATOR) {
            return Err(ConfigError::InvalidValue {
                field: "backfill.namespace".to_string(),
                reason: format!("'{}' is not a namespace name", namespace),
            }
            .into());
        }

        if self.retry.attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.attempts".to_string(),
                reason: "at least one attempt is required".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
