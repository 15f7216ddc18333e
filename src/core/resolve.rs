//! Property resolution.
//!
//! Decides, per missing property, whether the value comes from a template or
//! from the operator:
//!
//! - schema property with a `template` → evaluate the template
//! - no schema property → masked prompt `"<key>.<property>"`, no help
//! - `kind: confirm` → yes/no prompt, stored as `"true"` / `"false"`
//! - anything else → masked prompt with the schema's question and help

use tracing::{debug, info};

use crate::core::domain::{EntryError, ExternalSecret};
use crate::core::input::Input;
use crate::core::schema::{PropertySpec, SchemaProvider};
use crate::core::template::TemplateEvaluator;
use crate::error::{Result, SchemaError};

/// Whether properties without a template may prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Prompt for anything that has no template.
    #[default]
    Interactive,
    /// Only evaluate templates; everything else is skipped.
    TemplatesOnly,
}

/// Counters for a resolver's work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub prompted: usize,
    pub templated: usize,
    pub skipped: usize,
}

/// Resolves missing property values.
pub struct PropertyResolver {
    schema: Box<dyn SchemaProvider>,
    input: Box<dyn Input>,
    evaluator: TemplateEvaluator,
    mode: ResolveMode,
    stats: ResolveStats,
}

impl PropertyResolver {
    pub fn new(
        schema: Box<dyn SchemaProvider>,
        input: Box<dyn Input>,
        evaluator: TemplateEvaluator,
    ) -> Self {
        Self {
            schema,
            input,
            evaluator,
            mode: ResolveMode::default(),
            stats: ResolveStats::default(),
        }
    }

    pub fn with_mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// Resolve `property` of `entry` for `secret`.
    ///
    /// Returns `Ok(None)` when the property was skipped (templates-only mode
    /// and no template).
    ///
    /// # Errors
    ///
    /// Returns `SchemaError`, `TemplateError` or `PromptError` from the
    /// respective collaborator.
    pub fn resolve(
        &mut self,
        entry: &EntryError,
        property: &str,
        secret: &ExternalSecret,
    ) -> Result<Option<String>> {
        let spec = self
            .schema
            .find_property(&secret.name, property)
            .map_err(|e| SchemaError::Lookup {
                object: secret.name.clone(),
                property: property.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(template) = spec.as_ref().and_then(|s| s.template.as_deref()) {
            debug!(secret = %secret.name, key = %entry.key, property, "resolving from template");
            let value = self
                .evaluator
                .evaluate(&secret.namespace, &secret.name, property, template)?;
            self.stats.templated += 1;
            return Ok(Some(value));
        }

        if self.mode == ResolveMode::TemplatesOnly {
            info!(secret = %secret.name, key = %entry.key, property, "no template, skipping");
            self.stats.skipped += 1;
            return Ok(None);
        }

        let generic = property_message(entry, property);
        let value = match spec {
            None => self.input.pick_password(&generic, "")?,
            Some(spec) if spec.is_confirm() => {
                let answer = self.input.confirm(
                    question_or(&spec, &generic),
                    &spec.help,
                    default_answer(&spec),
                )?;
                answer.to_string()
            }
            Some(spec) => self
                .input
                .pick_password(question_or(&spec, &generic), &spec.help)?,
        };
        self.stats.prompted += 1;
        Ok(Some(value))
    }
}

impl std::fmt::Debug for PropertyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyResolver")
            .field("mode", &self.mode)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Generic prompt for a property with no schema: `key.property`.
pub fn property_message(entry: &EntryError, property: &str) -> String {
    format!("{}.{}", entry.key, property)
}

fn question_or<'a>(spec: &'a PropertySpec, fallback: &'a str) -> &'a str {
    if spec.question.is_empty() {
        fallback
    } else {
        &spec.question
    }
}

fn default_answer(spec: &PropertySpec) -> bool {
    matches!(
        spec.default_value.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "yes" | "y")
    )
}
