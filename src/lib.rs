//! Backfill - fill in missing external secret values.
//!
//! A verifier reports which (key, property) pairs declared by ExternalSecret
//! resources are absent from their backing store. Backfill resolves each
//! missing value, either by evaluating a template from the secret schema or
//! by prompting, and writes every key's properties back in one operation
//! through the editor for the resource's backend.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── edit          # Resolve everything, prompting as needed
//! │   ├── populate      # Resolve template-backed values only
//! │   ├── verify        # Report missing properties
//! │   ├── template      # Evaluate a template
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # .backfill.toml settings
//!     ├── domain/       # ExternalSecret, missing entries, resolved batches
//!     ├── manifest      # ExternalSecret declarations
//!     ├── verify        # Desired vs. actual state
//!     ├── schema        # Property questions, help and templates
//!     ├── requirements  # Requirements data for templates
//!     ├── template/     # Tera evaluation and secret lookup functions
//!     ├── resolve       # Template or prompt, per property
//!     ├── editor/       # Backend writers (local, vault, gcp, aws)
//!     ├── store/        # Secret store trait and implementations
//!     ├── retry         # Backoff for secret lookups
//!     └── run           # Orchestration and failure policy
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use backfill::core::editor::{EditorRegistry, SystemRunner};
//! use backfill::core::input::Terminal;
//! use backfill::core::manifest::Manifest;
//! use backfill::core::requirements::{FileRequirementsLoader, RequirementsCache};
//! use backfill::core::retry::RetryPolicy;
//! use backfill::core::schema::YamlSchema;
//! use backfill::core::store::{Filesystem, SecretReader, SecretStore};
//! use backfill::core::template::{FunctionLibrary, TemplateEvaluator};
//! use backfill::core::verify::{StoreVerifier, Verifier};
//! use backfill::{run, RunOptions};
//!
//! # fn main() -> backfill::error::Result<()> {
//! let store: Arc<dyn SecretStore> = Arc::new(Filesystem::new(".backfill/store"));
//! let manifest = Manifest::load(Path::new(".backfill/external-secrets.yaml"), "jx")?;
//! let results = StoreVerifier::new(manifest, store.clone()).verify(None)?;
//!
//! let reader = SecretReader::new(store.clone(), RetryPolicy::default());
//! let evaluator = TemplateEvaluator::new(
//!     FunctionLibrary::new(Arc::new(reader)),
//!     RequirementsCache::new(Box::new(FileRequirementsLoader), "."),
//! );
//! let report = run(
//!     &results,
//!     Box::new(YamlSchema::load(Path::new(".backfill/secret-schema.yaml"))?),
//!     Box::new(Terminal::new()),
//!     evaluator,
//!     EditorRegistry::with_defaults(store, Arc::new(SystemRunner)),
//!     RunOptions::default(),
//! )?;
//! println!("wrote {} properties", report.written_properties);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::run::{run, FailurePolicy, Run, RunOptions, RunReport};
pub use crate::core::template::{evaluate_template, TemplateEvaluator};
pub use crate::error::{Error, Result};
