//! AWS Secrets Manager backend, through the `aws` CLI.
//!
//! Each key is a secret id whose `SecretString` is a JSON document of its
//! properties. The secret string is passed on stdin via `file:///dev/stdin`.

use std::sync::Arc;

use tracing::debug;

use super::{merge_json, to_document, CommandRunner, Editor};
use crate::core::domain::{ExternalSecret, KeyProperties};
use crate::error::{EditorError, Error, Result};

const BINARY: &str = "aws";
const BACKEND: &str = "secretsManager";
const STDIN_SOURCE: &str = "file:///dev/stdin";

/// Editor for AWS Secrets Manager.
pub struct AwsSecretsManager {
    runner: Arc<dyn CommandRunner>,
}

impl AwsSecretsManager {
    /// # Errors
    ///
    /// Returns `EditorError::MissingBinary` if the `aws` CLI is unavailable.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Result<Self> {
        runner.ensure(BINARY, BACKEND)?;
        Ok(Self { runner })
    }

    fn aws(&self, secret: &ExternalSecret, args: &[&str], stdin: Option<&str>) -> Result<String> {
        let mut args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        if let Some(region) = secret.region.as_deref().filter(|r| !r.is_empty()) {
            args.push("--region".to_string());
            args.push(region.to_string());
        }
        self.runner.run(BINARY, &args, stdin)
    }

    fn read(&self, secret: &ExternalSecret, key: &str) -> Result<Option<String>> {
        let current = self.aws(
            secret,
            &[
                "secretsmanager",
                "get-secret-value",
                "--secret-id",
                key,
                "--query",
                "SecretString",
                "--output",
                "text",
            ],
            None,
        );
        match current {
            Ok(value) => Ok(Some(value)),
            Err(Error::Backend(EditorError::CommandFailed { reason, .. }))
                if reason.contains("ResourceNotFoundException") =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl Editor for AwsSecretsManager {
    fn write(&mut self, secret: &ExternalSecret, properties: &KeyProperties) -> Result<()> {
        let existing = self.read(secret, &properties.key)?;
        let document = to_document(&merge_json(existing.as_deref(), properties))?;

        let args: [&str; 5] = if existing.is_some() {
            [
                "secretsmanager",
                "put-secret-value",
                "--secret-id",
                properties.key.as_str(),
                "--secret-string",
            ]
        } else {
            [
                "secretsmanager",
                "create-secret",
                "--name",
                properties.key.as_str(),
                "--secret-string",
            ]
        };
        let mut args = args.to_vec();
        args.push(STDIN_SOURCE);

        debug!(key = %properties.key, create = existing.is_none(), "writing aws secret");
        self.aws(secret, &args, Some(&document)).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::BackendKind;
    use crate::core::editor::runner::fake::{failure, Recorder};
    use serde_json::Value;

    fn batch() -> KeyProperties {
        let mut batch = KeyProperties::new("prod/db");
        batch.push("password", "hunter2".to_string());
        batch
    }

    #[test]
    fn test_updates_existing_secret() {
        let runner = Arc::new(Recorder::default());
        runner.respond(Ok("{\"username\":\"bob\"}\n".to_string()));
        let mut editor = AwsSecretsManager::new(runner.clone()).unwrap();
        let mut secret = ExternalSecret::new("app", "jx", BackendKind::AwsSecretsManager);
        secret.region = Some("eu-west-1".to_string());

        editor.write(&secret, &batch()).unwrap();

        assert_eq!(
            runner.args(1),
            vec![
                "secretsmanager",
                "put-secret-value",
                "--secret-id",
                "prod/db",
                "--secret-string",
                "file:///dev/stdin",
                "--region",
                "eu-west-1"
            ]
        );
        let doc: Value = serde_json::from_str(&runner.stdin(1).unwrap()).unwrap();
        assert_eq!(doc["username"], "bob");
        assert_eq!(doc["password"], "hunter2");
    }

    #[test]
    fn test_creates_missing_secret() {
        let runner = Arc::new(Recorder::default());
        runner.respond(failure(
            "aws",
            "An error occurred (ResourceNotFoundException) when calling the GetSecretValue operation",
        ));
        let mut editor = AwsSecretsManager::new(runner.clone()).unwrap();
        let secret = ExternalSecret::new("app", "jx", BackendKind::AwsSecretsManager);

        editor.write(&secret, &batch()).unwrap();

        assert_eq!(runner.args(1)[1], "create-secret");
        assert!(!runner.args(1).contains(&"--region".to_string()));
    }

    #[test]
    fn test_access_denied_is_an_error() {
        let runner = Arc::new(Recorder::default());
        runner.respond(failure("aws", "AccessDeniedException"));
        let mut editor = AwsSecretsManager::new(runner.clone()).unwrap();
        let secret = ExternalSecret::new("app", "jx", BackendKind::AwsSecretsManager);

        assert!(editor.write(&secret, &batch()).is_err());
        assert_eq!(runner.count(), 1);
    }
}
