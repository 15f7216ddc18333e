//! Backend editors.
//!
//! An editor persists the resolved properties of one key to the secret store
//! behind a backend. The orchestrator looks editors up by [`BackendKind`]
//! through an [`EditorRegistry`], which builds each editor at most once per
//! run.
//!
//! ## Adding a New Backend
//!
//! 1. Add a variant to `BackendKind`
//! 2. Implement the `Editor` trait in a new file (e.g., `azure.rs`)
//! 3. Register a factory in `EditorRegistry::with_defaults`, or call
//!    `EditorRegistry::register` from the embedding code

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::core::domain::{BackendKind, ExternalSecret, KeyProperties};
use crate::core::store::SecretStore;
use crate::error::{EditorError, Result};

mod aws;
mod gcp;
mod local;
mod runner;
mod vault;

pub use aws::AwsSecretsManager;
pub use gcp::GcpSecretsManager;
pub use local::Local;
pub use runner::{CommandRunner, SystemRunner};
pub use vault::Vault;

/// Writes resolved properties to a backend.
pub trait Editor {
    /// Persist every property of `properties` for `secret` in one operation.
    ///
    /// # Errors
    ///
    /// Returns `EditorError` or `StoreError` if the write fails; nothing is
    /// reported as written in that case.
    fn write(&mut self, secret: &ExternalSecret, properties: &KeyProperties) -> Result<()>;
}

/// Builds an editor for a backend.
pub trait EditorFactory {
    /// # Errors
    ///
    /// Returns `EditorError` if the backend client cannot be set up.
    fn create(&self) -> Result<Box<dyn Editor>>;
}

impl<F> EditorFactory for F
where
    F: Fn() -> Result<Box<dyn Editor>>,
{
    fn create(&self) -> Result<Box<dyn Editor>> {
        self()
    }
}

/// Per-run editor lookup with memoized construction.
#[derive(Default)]
pub struct EditorRegistry {
    factories: HashMap<BackendKind, Box<dyn EditorFactory>>,
    editors: HashMap<BackendKind, Box<dyn Editor>>,
}

impl EditorRegistry {
    /// A registry with no backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in backend.
    ///
    /// `local` writes to `store`; the CLI-backed editors run through `runner`.
    pub fn with_defaults(store: Arc<dyn SecretStore>, runner: Arc<dyn CommandRunner>) -> Self {
        let mut registry = Self::new();

        registry.register(BackendKind::Local, move || -> Result<Box<dyn Editor>> {
            Ok(Box::new(Local::new(store.clone())))
        });

        let r = runner.clone();
        registry.register(BackendKind::Vault, move || -> Result<Box<dyn Editor>> {
            Ok(Box::new(Vault::new(r.clone())?))
        });

        let r = runner.clone();
        registry.register(
            BackendKind::GcpSecretsManager,
            move || -> Result<Box<dyn Editor>> { Ok(Box::new(GcpSecretsManager::new(r.clone())?)) },
        );

        registry.register(
            BackendKind::AwsSecretsManager,
            move || -> Result<Box<dyn Editor>> {
                Ok(Box::new(AwsSecretsManager::new(runner.clone())?))
            },
        );

        registry
    }

    /// Register (or replace) the factory for `kind`.
    pub fn register(&mut self, kind: BackendKind, factory: impl EditorFactory + 'static) {
        debug!(backend = %kind, "registering editor");
        self.editors.remove(&kind);
        self.factories.insert(kind, Box::new(factory));
    }

    /// The editor for `kind`, created on first use.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Unsupported` if no factory is registered, or the
    /// factory's error. A failed construction is not cached.
    pub fn editor(&mut self, kind: BackendKind) -> Result<&mut dyn Editor> {
        let editor = match self.editors.entry(kind) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let factory = self
                    .factories
                    .get(&kind)
                    .ok_or_else(|| EditorError::Unsupported(kind.to_string()))?;
                info!(backend = %kind, "using {} as the secrets store", kind);
                entry.insert(factory.create()?)
            }
        };
        Ok(editor.as_mut())
    }

    /// Number of editors built so far.
    pub fn created(&self) -> usize {
        self.editors.len()
    }
}

impl std::fmt::Debug for EditorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<_> = self.factories.keys().collect();
        registered.sort();
        let mut created: Vec<_> = self.editors.keys().collect();
        created.sort();
        f.debug_struct("EditorRegistry")
            .field("registered", &registered)
            .field("created", &created)
            .finish()
    }
}

/// Merge `properties` over an existing JSON document.
///
/// Unparseable or non-object documents are replaced.
pub(crate) fn merge_json(existing: Option<&str>, properties: &KeyProperties) -> Map<String, Value> {
    let mut doc = existing
        .and_then(|s| serde_json::from_str::<Value>(s.trim()).ok())
        .and_then(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();
    doc.extend(properties.to_json());
    doc
}

/// Serialize a document for a CLI's stdin.
pub(crate) fn to_document(doc: &Map<String, Value>) -> Result<String> {
    serde_json::to_string(doc)
        .map_err(|e| EditorError::WriteFailed(format!("failed to encode properties: {}", e)).into())
}
