//! Resolution runs.
//!
//! A run walks the verifier's results in order. For each ExternalSecret it
//! looks up the editor for the backend, resolves every missing property of
//! each key, and writes the key's properties in one batch.
//!
//! Failures carry the secret, key and property (or batch) they belong to.
//! With [`FailurePolicy::FailFast`] the first failure ends the run; with
//! [`FailurePolicy::KeepGoing`] only the failing key is abandoned and all
//! failures are returned together as [`Error::Run`].

use tracing::{debug, info, warn};

use crate::core::domain::{EntryError, KeyProperties, SecretError};
use crate::core::editor::{Editor, EditorRegistry};
use crate::core::input::Input;
use crate::core::resolve::{PropertyResolver, ResolveMode};
use crate::core::schema::SchemaProvider;
use crate::core::template::TemplateEvaluator;
use crate::error::{Error, Result};

/// What to do when a property or key fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure.
    #[default]
    FailFast,
    /// Abandon the failing key and continue with the rest.
    KeepGoing,
}

/// Options for [`run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub mode: ResolveMode,
    pub policy: FailurePolicy,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Keys written to a backend.
    pub written_keys: usize,
    /// Properties contained in those writes.
    pub written_properties: usize,
    /// Properties answered at a prompt.
    pub prompted: usize,
    /// Properties produced by a template.
    pub templated: usize,
    /// Properties left unresolved (templates-only runs).
    pub skipped: usize,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.written_keys == 0 && self.skipped == 0
    }
}

/// A resolution run over verifier results.
#[derive(Debug)]
pub struct Run {
    resolver: PropertyResolver,
    editors: EditorRegistry,
    policy: FailurePolicy,
}

impl Run {
    pub fn new(resolver: PropertyResolver, editors: EditorRegistry) -> Self {
        Self {
            resolver,
            editors,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn editors(&self) -> &EditorRegistry {
        &self.editors
    }

    /// Resolve and write every missing property in `results`.
    ///
    /// # Errors
    ///
    /// Under `FailFast`, the first `Error::Resolve`, `Error::Write` or
    /// `Error::Editor`. Under `KeepGoing`, `Error::Run` with every failure.
    pub fn execute(&mut self, results: &[SecretError]) -> Result<RunReport> {
        let mut report = RunReport::default();
        let mut failures = Vec::new();

        for result in results {
            let secret = &result.external_secret;
            let kind = secret.backend_type;

            let editor = match self.editors.editor(kind) {
                Ok(editor) => editor,
                Err(e) => {
                    fail(
                        self.policy,
                        &mut failures,
                        Error::Editor {
                            secret: secret.name.clone(),
                            backend: kind.to_string(),
                            source: Box::new(e),
                        },
                    )?;
                    continue;
                }
            };

            for entry in &result.entry_errors {
                let batch = match resolve_entry(&mut self.resolver, entry, result) {
                    Ok(batch) => batch,
                    Err(e) => {
                        fail(self.policy, &mut failures, e)?;
                        continue;
                    }
                };

                if batch.is_empty() {
                    debug!(secret = %secret.name, key = %entry.key, "nothing resolved, no write");
                    continue;
                }

                if let Err(e) = write(editor, result, &batch) {
                    fail(self.policy, &mut failures, e)?;
                    continue;
                }

                info!(secret = %secret.name, backend = %kind, batch = %batch, "saved properties");
                report.written_keys += 1;
                report.written_properties += batch.len();
            }
        }

        let stats = self.resolver.stats();
        report.prompted = stats.prompted;
        report.templated = stats.templated;
        report.skipped = stats.skipped;

        if failures.is_empty() {
            Ok(report)
        } else {
            warn!(failures = failures.len(), "run finished with failures");
            Err(Error::Run(failures))
        }
    }
}

fn fail(policy: FailurePolicy, failures: &mut Vec<Error>, error: Error) -> Result<()> {
    match policy {
        FailurePolicy::FailFast => Err(error),
        FailurePolicy::KeepGoing => {
            warn!(error = %error, "continuing after failure");
            failures.push(error);
            Ok(())
        }
    }
}

/// Resolve all properties of one key, in declaration order.
fn resolve_entry(
    resolver: &mut PropertyResolver,
    entry: &EntryError,
    result: &SecretError,
) -> Result<KeyProperties> {
    let secret = &result.external_secret;
    let mut batch = KeyProperties::new(&entry.key);

    for property in &entry.properties {
        let value = resolver
            .resolve(entry, property, secret)
            .map_err(|e| Error::Resolve {
                secret: secret.name.clone(),
                key: entry.key.clone(),
                property: property.clone(),
                source: Box::new(e),
            })?;
        if let Some(value) = value {
            batch.push(property, value);
        }
    }

    Ok(batch)
}

fn write(editor: &mut dyn Editor, result: &SecretError, batch: &KeyProperties) -> Result<()> {
    let secret = &result.external_secret;
    editor.write(secret, batch).map_err(|e| Error::Write {
        secret: secret.name.clone(),
        backend: secret.backend_type.to_string(),
        batch: batch.to_string(),
        source: Box::new(e),
    })
}

/// Resolve and write every missing property in `results`.
///
/// Convenience wrapper building a [`Run`] from its collaborators.
///
/// # Errors
///
/// See [`Run::execute`].
pub fn run(
    results: &[SecretError],
    schema: Box<dyn SchemaProvider>,
    input: Box<dyn Input>,
    evaluator: TemplateEvaluator,
    editors: EditorRegistry,
    options: RunOptions,
) -> Result<RunReport> {
    let resolver = PropertyResolver::new(schema, input, evaluator).with_mode(options.mode);
    Run::new(resolver, editors)
        .with_policy(options.policy)
        .execute(results)
}
