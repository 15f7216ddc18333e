//! Google Secret Manager backend, through the `gcloud` CLI.
//!
//! Each key is one secret holding a JSON document of its properties. A key
//! with a single unnamed property stores the raw value instead. New versions
//! are added from stdin; the secret itself is created on first write.

use std::sync::Arc;

use tracing::debug;

use super::{merge_json, to_document, CommandRunner, Editor};
use crate::core::domain::{ExternalSecret, KeyProperties};
use crate::error::{EditorError, Error, Result};

const BINARY: &str = "gcloud";
const BACKEND: &str = "gcpSecretsManager";

/// Editor for Google Secret Manager.
pub struct GcpSecretsManager {
    runner: Arc<dyn CommandRunner>,
}

impl GcpSecretsManager {
    /// # Errors
    ///
    /// Returns `EditorError::MissingBinary` if `gcloud` is unavailable.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Result<Self> {
        runner.ensure(BINARY, BACKEND)?;
        Ok(Self { runner })
    }

    fn gcloud(&self, args: &[&str], stdin: Option<&str>) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.run(BINARY, &args, stdin)
    }

    /// Latest version of `key`, creating the secret if it does not exist.
    fn read_or_create(&self, key: &str, project: &str) -> Result<Option<String>> {
        let latest = self.gcloud(
            &[
                "secrets", "versions", "access", "latest", "--secret", key, "--project", project,
            ],
            None,
        );
        match latest {
            Ok(value) => Ok(Some(value)),
            Err(Error::Backend(EditorError::CommandFailed { reason, .. }))
                if is_not_found(&reason) =>
            {
                debug!(key, project, "creating secret");
                let created = self.gcloud(
                    &[
                        "secrets",
                        "create",
                        key,
                        "--replication-policy=automatic",
                        "--project",
                        project,
                    ],
                    None,
                );
                match created {
                    Ok(_) => Ok(None),
                    Err(Error::Backend(EditorError::CommandFailed { reason, .. }))
                        if is_already_exists(&reason) =>
                    {
                        debug!(key, project, "secret exists without versions");
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }
}

// Also covers an existing secret with no versions: "not found or has no versions".
fn is_not_found(reason: &str) -> bool {
    reason.contains("NOT_FOUND") || reason.contains("not found")
}

fn is_already_exists(reason: &str) -> bool {
    reason.contains("ALREADY_EXISTS") || reason.contains("already exists")
}

fn is_raw(properties: &KeyProperties) -> bool {
    properties.len() == 1 && properties.properties[0].property.is_empty()
}

impl Editor for GcpSecretsManager {
    fn write(&mut self, secret: &ExternalSecret, properties: &KeyProperties) -> Result<()> {
        let project = secret
            .project_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| EditorError::MissingOption {
                option: "projectId".to_string(),
                backend: BACKEND.to_string(),
            })?;

        let existing = self.read_or_create(&properties.key, project)?;

        let payload = if is_raw(properties) {
            properties.properties[0].value.to_string()
        } else {
            to_document(&merge_json(existing.as_deref(), properties))?
        };

        debug!(key = %properties.key, project, "adding secret version");
        self.gcloud(
            &[
                "secrets",
                "versions",
                "add",
                properties.key.as_str(),
                "--project",
                project,
                "--data-file=-",
            ],
            Some(&payload),
        )
        .map(|_| ())
    }
}
