//! HashiCorp Vault backend.
//!
//! Uses the `vault` CLI (authenticated through the usual `VAULT_ADDR` /
//! `VAULT_TOKEN` environment). Each key is a KV path; properties are the
//! fields at that path. Existing fields are read first and kept, then the
//! merged document is written with a single `vault kv put` fed on stdin so
//! values never appear on the command line.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{merge_json, to_document, CommandRunner, Editor};
use crate::core::domain::{ExternalSecret, KeyProperties};
use crate::error::{EditorError, Error, Result};

const BINARY: &str = "vault";

/// Editor for Vault KV secrets.
pub struct Vault {
    runner: Arc<dyn CommandRunner>,
}

impl Vault {
    /// # Errors
    ///
    /// Returns `EditorError::MissingBinary` if the `vault` CLI is unavailable.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Result<Self> {
        runner.ensure(BINARY, "vault")?;
        Ok(Self { runner })
    }

    fn mount_args(secret: &ExternalSecret) -> Vec<String> {
        secret
            .mount
            .as_ref()
            .map(|m| vec![format!("-mount={}", m)])
            .unwrap_or_default()
    }

    /// Current fields at `key`, as a JSON document.
    fn read(&self, secret: &ExternalSecret, key: &str) -> Result<Option<String>> {
        let mut args = vec!["kv".to_string(), "get".to_string(), "-format=json".to_string()];
        args.extend(Self::mount_args(secret));
        args.push(key.to_string());

        match self.runner.run(BINARY, &args, None) {
            Ok(out) => Ok(Some(extract_fields(&out))),
            Err(Error::Backend(EditorError::CommandFailed { reason, .. }))
                if reason.contains("No value found") =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Pull the field map out of `vault kv get -format=json` output (KV v1 or v2).
fn extract_fields(output: &str) -> String {
    let Ok(doc) = serde_json::from_str::<Value>(output) else {
        return String::new();
    };
    let data = &doc["data"];
    let fields = if data.get("metadata").is_some() && data["data"].is_object() {
        &data["data"]
    } else {
        data
    };
    fields.to_string()
}

impl Editor for Vault {
    fn write(&mut self, secret: &ExternalSecret, properties: &KeyProperties) -> Result<()> {
        let existing = self.read(secret, &properties.key)?;
        let doc = merge_json(existing.as_deref(), properties);

        let mut args = vec!["kv".to_string(), "put".to_string()];
        args.extend(Self::mount_args(secret));
        args.push(properties.key.clone());
        args.push("-".to_string());

        debug!(key = %properties.key, fields = doc.len(), "writing vault secret");
        self.runner
            .run(BINARY, &args, Some(&to_document(&doc)?))
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::BackendKind;
    use crate::core::editor::runner::fake::{failure, Recorder};

    fn batch() -> KeyProperties {
        let mut batch = KeyProperties::new("secret/jx/db");
        batch.push("password", "hunter2".to_string());
        batch
    }

    #[test]
    fn test_merges_existing_kv2_fields() {
        let runner = Arc::new(Recorder::default());
        runner.responses.lock().unwrap().push(Ok(
            r#"{"data":{"data":{"username":"bob"},"metadata":{"version":1}}}"#.to_string(),
        ));
        let mut editor = Vault::new(runner.clone()).unwrap();
        let secret = ExternalSecret::new("app", "jx", BackendKind::Vault);

        editor.write(&secret, &batch()).unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1, vec!["kv", "put", "secret/jx/db", "-"]);
        let doc: Value = serde_json::from_str(calls[1].2.as_deref().unwrap()).unwrap();
        assert_eq!(doc["username"], "bob");
        assert_eq!(doc["password"], "hunter2");
        assert!(!calls[1].1.iter().any(|a| a.contains("hunter2")));
    }

    #[test]
    fn test_missing_path_starts_empty() {
        let runner = Arc::new(Recorder::default());
        runner
            .responses
            .lock()
            .unwrap()
            .push(failure("vault", "No value found at secret/data/jx/db"));
        let mut editor = Vault::new(runner.clone()).unwrap();
        let mut secret = ExternalSecret::new("app", "jx", BackendKind::Vault);
        secret.mount = Some("kv".to_string());

        editor.write(&secret, &batch()).unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[1].1, vec!["kv", "put", "-mount=kv", "secret/jx/db", "-"]);
        let doc: Value = serde_json::from_str(calls[1].2.as_deref().unwrap()).unwrap();
        assert_eq!(doc.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_read_failure_aborts_write() {
        let runner = Arc::new(Recorder::default());
        runner
            .responses
            .lock()
            .unwrap()
            .push(failure("vault", "permission denied"));
        let mut editor = Vault::new(runner.clone()).unwrap();
        let secret = ExternalSecret::new("app", "jx", BackendKind::Vault);

        assert!(editor.write(&secret, &batch()).is_err());
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_requires_binary() {
        let runner = Arc::new(Recorder {
            missing: vec!["vault".to_string()],
            ..Recorder::default()
        });
        assert!(Vault::new(runner).is_err());
    }

    #[test]
    fn test_extract_kv1_fields() {
        let fields = extract_fields(r#"{"data":{"token":"abc"}}"#);
        assert_eq!(fields, r#"{"token":"abc"}"#);
    }
}
