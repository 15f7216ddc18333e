//! Template evaluation.
//!
//! Property values can be derived from other secrets with a Tera template:
//!
//! ```text
//! {{ htpasswdSecret(name="jx-basic-auth-user-password", username_key="username", password_key="password") }}
//! https://{{ Requirements.ingress.domain }}/hook
//! ```
//!
//! All of Tera's built-in filters, tests and functions are available next to
//! the secret lookup functions in [`functions`]. Rendering is strict: a
//! reference to an undefined variable fails the evaluation. The only variable
//! in scope is `Requirements`, which always has a `storage` entry.

pub mod functions;

use tera::{Context as TeraContext, Tera};
use tracing::{debug, trace};

use crate::core::requirements::RequirementsCache;
use crate::error::{Result, TemplateError};

pub use functions::{FunctionLibrary, Scope};

const TEMPLATE_NAME: &str = "value.tmpl";

/// Renders property templates.
///
/// Built-ins and escaping are configured once on a base instance; each
/// evaluation clones it and adds the lookup functions for its own scope.
pub struct TemplateEvaluator {
    base: Tera,
    library: FunctionLibrary,
    requirements: RequirementsCache,
}

impl TemplateEvaluator {
    pub fn new(library: FunctionLibrary, requirements: RequirementsCache) -> Self {
        let mut base = Tera::default();
        base.autoescape_on(vec![]);
        Self {
            base,
            library,
            requirements,
        }
    }

    /// Evaluate `text` to produce the value of `property` of secret
    /// `secret_name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Parse` for syntax errors,
    /// `TemplateError::Render` for rendering failures (including undefined
    /// variables), or `ConfigError` if the requirements cannot be loaded.
    pub fn evaluate(
        &mut self,
        namespace: &str,
        secret_name: &str,
        property: &str,
        text: &str,
    ) -> Result<String> {
        debug!(namespace, secret = secret_name, property, "evaluating template");

        let scope = Scope::new(namespace, secret_name, property);
        let mut tera = self.base.clone();
        self.library.register(&mut tera, &scope);

        tera.add_raw_template(TEMPLATE_NAME, text)
            .map_err(|e| TemplateError::Parse {
                secret: secret_name.to_string(),
                property: property.to_string(),
                text: text.to_string(),
                reason: describe(&e),
            })?;

        let requirements = self.requirements.get()?;
        let mut context = TeraContext::new();
        context.insert("Requirements", requirements);

        let value = tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| TemplateError::Render {
                secret: secret_name.to_string(),
                property: property.to_string(),
                reason: describe(&e),
            })?;

        trace!(secret = secret_name, property, len = value.len(), "template rendered");
        Ok(value)
    }
}

impl std::fmt::Debug for TemplateEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEvaluator")
            .field("library", &self.library)
            .field("requirements", &self.requirements)
            .finish_non_exhaustive()
    }
}

/// Evaluate a single template with `evaluator`.
///
/// # Errors
///
/// See [`TemplateEvaluator::evaluate`].
pub fn evaluate_template(
    evaluator: &mut TemplateEvaluator,
    namespace: &str,
    secret_name: &str,
    property: &str,
    text: &str,
) -> Result<String> {
    evaluator.evaluate(namespace, secret_name, property, text)
}

/// Flatten a Tera error chain into one line, dropping the internal template name.
fn describe(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }

    let quoted = format!("'{}'", TEMPLATE_NAME);
    messages
        .iter()
        .map(|m| {
            m.replace(&format!("Failed to render {}", quoted), "")
                .replace(&format!("Failed to parse {}", quoted), "")
                .replace(&format!(" while rendering {}", quoted), "")
                .trim()
                .to_string()
        })
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join(": ")
}
