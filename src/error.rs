//! Error types.
//!
//! One enum per concern, collected into [`Error`]. Resolution and write
//! failures are wrapped with the secret, key and property they belong to so a
//! single terminal line is enough to diagnose them.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Backend(#[from] EditorError),

    #[error("verification failed: {0}")]
    Verify(String),

    /// A single property could not be resolved.
    #[error("failed to resolve property {property} for key {key} on ExternalSecret {secret}: {source}")]
    Resolve {
        secret: String,
        key: String,
        property: String,
        #[source]
        source: Box<Error>,
    },

    /// A key's batch could not be written.
    #[error("failed to save properties {batch} on ExternalSecret {secret} using {backend}: {source}")]
    Write {
        secret: String,
        backend: String,
        batch: String,
        #[source]
        source: Box<Error>,
    },

    /// The editor for a backend could not be created.
    #[error("failed to create a secret editor for ExternalSecret {secret} using {backend}: {source}")]
    Editor {
        secret: String,
        backend: String,
        #[source]
        source: Box<Error>,
    },

    /// Every failure collected by a keep-going run.
    #[error("{} secret(s) could not be populated:\n{}", .0.len(), format_failures(.0))]
    Run(Vec<Error>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_failures(failures: &[Error]) -> String {
    failures
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings and requirements loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to load requirements in {dir}: {reason}")]
    Requirements { dir: String, reason: String },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Secret store access.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("secret {name} not found in namespace {namespace}")]
    NotFound { name: String, namespace: String },

    #[error("failed to read secret {name} in namespace {namespace}: {reason}")]
    ReadFailed {
        name: String,
        namespace: String,
        reason: String,
    },

    #[error("failed to write secret {name} in namespace {namespace}: {reason}")]
    WriteFailed {
        name: String,
        namespace: String,
        reason: String,
    },

    #[error("invalid secret {name} in namespace {namespace}: {reason}")]
    InvalidName {
        name: String,
        namespace: String,
        reason: String,
    },
}

impl StoreError {
    /// Whether this is a not-found condition worth retrying.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Template parsing and rendering.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to parse Secret {secret} property {property} with template: {text}: {reason}")]
    Parse {
        secret: String,
        property: String,
        text: String,
        reason: String,
    },

    #[error("failed to evaluate template to create value of Secret {secret} property {property}: {reason}")]
    Render {
        secret: String,
        property: String,
        reason: String,
    },
}

/// Schema lookup.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("failed to load schema {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("failed to find schema property for object {object} property {property}: {reason}")]
    Lookup {
        object: String,
        property: String,
        reason: String,
    },
}

/// Operator input.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("failed to read input for {message}: {reason}")]
    Input { message: String, reason: String },

    #[error("no input available for {0} in non-interactive mode")]
    NonInteractive(String),
}

/// Backend editors.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("unknown backend type: {0}. Supported: local, vault, gcpSecretsManager, secretsManager")]
    UnknownBackend(String),

    #[error("no editor registered for backend {0}")]
    Unsupported(String),

    #[error("{binary} CLI not found on PATH: required by the {backend} backend")]
    MissingBinary { binary: String, backend: String },

    #[error("missing option {option} for the {backend} backend")]
    MissingOption { option: String, backend: String },

    #[error("{program} failed: {reason}")]
    CommandFailed { program: String, reason: String },

    #[error("write failed: {0}")]
    WriteFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
