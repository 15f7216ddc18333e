//! Verify command.
//!
//! List the properties declared by ExternalSecrets that the store does not
//! have yet. Exits with an error when anything is missing.

use serde_json::json;

use crate::cli::{output, Scope, Workspace};
use crate::core::domain::SecretError;
use crate::error::{Error, Result};

/// Report missing properties.
pub fn execute(scope: &Scope, json: bool) -> Result<()> {
    let workspace = Workspace::open(scope)?;
    let results = workspace.verify()?;

    if json {
        output::data(&serde_json::to_string_pretty(&to_json(&results))?);
    } else if results.is_empty() {
        output::success("all secrets are populated");
    } else {
        for result in &results {
            let secret = &result.external_secret;
            output::section(&format!("{} ({})", secret.name, secret.namespace));
            output::kv("backend", secret.backend_type);
            for entry in &result.entry_errors {
                for property in &entry.properties {
                    output::list_item(&format!("{}.{}", output::key(&entry.key), property));
                }
            }
        }
        output::blank();
    }

    let missing: usize = results.iter().map(SecretError::missing_properties).sum();
    if missing > 0 {
        return Err(Error::Verify(format!(
            "{} properties missing across {} secrets",
            missing,
            results.len()
        )));
    }
    Ok(())
}

fn to_json(results: &[SecretError]) -> serde_json::Value {
    let secrets: Vec<_> = results
        .iter()
        .map(|r| {
            let secret = &r.external_secret;
            json!({
                "name": secret.name,
                "namespace": secret.namespace,
                "backendType": secret.backend_type,
                "missing": r.entry_errors.iter().map(|e| json!({
                    "key": e.key,
                    "properties": e.properties,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "secrets": secrets,
        "count": results.len(),
    })
}
