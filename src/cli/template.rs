//! Template command.
//!
//! Evaluate a value template against the workspace's store and requirements
//! and print the result, without writing anything.

use crate::cli::{output, Scope, Workspace};
use crate::core::template::evaluate_template;
use crate::error::Result;

/// Print the value `text` produces for `property` of `secret`.
pub fn execute(scope: &Scope, secret: &str, property: &str, text: &str) -> Result<()> {
    let workspace = Workspace::open(scope)?;
    let mut evaluator = workspace.evaluator();
    let value = evaluate_template(&mut evaluator, &workspace.namespace, secret, property, text)?;
    output::data(&value);
    Ok(())
}
