//! Test support utilities for backfill integration tests.
//!
//! Provides an isolated project directory with settings, manifest, schema
//! and a filesystem secret store, plus helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use backfill::core::store::{Filesystem, SecretStore};
use backfill::core::types::Payload;
use tempfile::TempDir;

/// Test environment with an isolated project directory.
///
/// Child processes use `.current_dir()`; no process-global state is
/// mutated, so tests can run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl Test {
    /// Create an empty project with settings for namespace `jx`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let t = Self { dir };
        t.write(".backfill.toml", SETTINGS);
        t
    }

    /// Create a project with the given manifest and schema.
    pub fn with(manifest: &str, schema: &str) -> Self {
        let t = Self::new();
        t.write(".backfill/external-secrets.yaml", manifest);
        t.write(".backfill/secret-schema.yaml", schema);
        t
    }

    /// Write `contents` to `relative` inside the project.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(path, contents).expect("failed to write fixture");
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// The project's secret store.
    pub fn store(&self) -> Filesystem {
        Filesystem::new(self.path(".backfill/store"))
    }

    /// Put a secret into the store.
    pub fn seed(&self, name: &str, namespace: &str, pairs: &[(&str, &str)]) {
        let data: Payload = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect();
        self.store()
            .put(name, namespace, &data)
            .expect("failed to seed secret");
    }

    /// Read one value from the store.
    pub fn value(&self, name: &str, namespace: &str, key: &str) -> Option<String> {
        let data = self.store().get(name, namespace).ok()?;
        data.get(key)
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }
}
