//! Collaborators shared by the commands.
//!
//! Settings come from `.backfill.toml` in the scope's directory; the
//! namespace flag overrides the configured default.

use std::sync::Arc;

use tracing::debug;

use crate::cli::Scope;
use crate::core::config::Settings;
use crate::core::domain::SecretError;
use crate::core::editor::{EditorRegistry, SystemRunner};
use crate::core::manifest::Manifest;
use crate::core::requirements::{FileRequirementsLoader, RequirementsCache};
use crate::core::schema::YamlSchema;
use crate::core::store::{Filesystem, SecretReader, SecretStore};
use crate::core::template::{FunctionLibrary, TemplateEvaluator};
use crate::core::verify::{StoreVerifier, Verifier};
use crate::error::Result;

/// A loaded working directory.
pub struct Workspace {
    pub settings: Settings,
    /// Namespace for resources and unqualified names.
    pub namespace: String,
    /// Namespace to restrict verification to, if one was asked for.
    pub filter: Option<String>,
    store: Arc<dyn SecretStore>,
}

impl Workspace {
    /// Load settings for `scope`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the settings file is invalid.
    pub fn open(scope: &Scope) -> Result<Self> {
        let settings = Settings::load_from(&scope.dir)?;
        let namespace = scope
            .namespace
            .clone()
            .unwrap_or_else(|| settings.backfill.namespace.clone());
        let store: Arc<dyn SecretStore> = Arc::new(Filesystem::new(&settings.backfill.store));
        debug!(namespace = %namespace, store = %settings.backfill.store.display(), "workspace opened");

        Ok(Self {
            settings,
            namespace,
            filter: scope.namespace.clone(),
            store,
        })
    }

    pub fn store(&self) -> Arc<dyn SecretStore> {
        self.store.clone()
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the manifest cannot be read.
    pub fn manifest(&self) -> Result<Manifest> {
        Manifest::load(&self.settings.backfill.secrets, &self.namespace)
    }

    /// Missing properties of the declared secrets.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` or `StoreError`.
    pub fn verify(&self) -> Result<Vec<SecretError>> {
        StoreVerifier::new(self.manifest()?, self.store()).verify(self.filter.as_deref())
    }

    /// # Errors
    ///
    /// Returns `SchemaError` if the schema file is invalid.
    pub fn schema(&self) -> Result<YamlSchema> {
        YamlSchema::load(&self.settings.backfill.schema)
    }

    pub fn evaluator(&self) -> TemplateEvaluator {
        let reader = SecretReader::new(self.store(), self.settings.retry.clone());
        TemplateEvaluator::new(
            FunctionLibrary::new(Arc::new(reader)),
            RequirementsCache::new(
                Box::new(FileRequirementsLoader),
                self.settings.backfill.requirements_dir.clone(),
            ),
        )
    }

    pub fn editors(&self) -> EditorRegistry {
        EditorRegistry::with_defaults(self.store(), Arc::new(SystemRunner))
    }
}
