//! Secret schema.
//!
//! A schema describes how to ask for (or derive) each property of each
//! secret: the question, the help text, an optional template, and a `kind`
//! label that selects the prompt style.
//!
//! ```yaml
//! apiVersion: gitops.jenkins-x.io/v1alpha1
//! kind: Schema
//! spec:
//!   objects:
//!   - name: jx-basic-auth-htpasswd
//!     properties:
//!     - name: auth
//!       question: basic auth htpasswd line
//!       template: '{{ htpasswdSecret(name="jx-basic-auth-user-password", username_key="username", password_key="password") }}'
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::{KIND_CONFIRM, LABEL_KIND};
use crate::error::{Result, SchemaError};

/// Metadata for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    pub name: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Template producing the value instead of prompting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Default answer for confirmation prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl PropertySpec {
    /// The `kind` label, if set.
    pub fn kind(&self) -> Option<&str> {
        self.labels.get(LABEL_KIND).map(String::as_str)
    }

    pub fn is_confirm(&self) -> bool {
        self.kind() == Some(KIND_CONFIRM)
    }
}

/// All properties of one secret object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

/// Source of property metadata.
pub trait SchemaProvider {
    /// Find the spec for `property` of `object`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the lookup itself fails. A property that is
    /// simply not described is `Ok(None)`.
    fn find_property(&self, object: &str, property: &str) -> Result<Option<PropertySpec>>;
}

#[derive(Debug, Default, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    spec: SchemaSpec,
}

#[derive(Debug, Default, Deserialize)]
struct SchemaSpec {
    #[serde(default)]
    objects: Vec<ObjectSpec>,
}

/// Schema loaded from a YAML document.
#[derive(Debug, Clone, Default)]
pub struct YamlSchema {
    objects: Vec<ObjectSpec>,
}

impl YamlSchema {
    /// Build a schema from objects directly.
    pub fn new(objects: Vec<ObjectSpec>) -> Self {
        Self { objects }
    }

    /// Parse a schema document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` if the YAML is malformed.
    pub fn parse(contents: &str) -> Result<Self> {
        let doc: SchemaDocument = serde_yaml::from_str(contents).map_err(|e| SchemaError::Load {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(doc.spec.objects))
    }

    /// Load a schema file. A missing file is an empty schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading schema");
        if !path.exists() {
            debug!("no schema file, every property will be prompted for");
            return Ok(Self::default());
        }
        let load_failed = |reason: String| SchemaError::Load {
            path: path.display().to_string(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let doc: SchemaDocument =
            serde_yaml::from_str(&contents).map_err(|e| load_failed(e.to_string()))?;

        debug!(objects = doc.spec.objects.len(), "schema loaded");
        Ok(Self::new(doc.spec.objects))
    }

    pub fn objects(&self) -> &[ObjectSpec] {
        &self.objects
    }
}

impl SchemaProvider for YamlSchema {
    fn find_property(&self, object: &str, property: &str) -> Result<Option<PropertySpec>> {
        Ok(self
            .objects
            .iter()
            .find(|o| o.name == object)
            .and_then(|o| o.properties.iter().find(|p| p.name == property))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"
apiVersion: gitops.jenkins-x.io/v1alpha1
kind: Schema
spec:
  objects:
  - name: jx-basic-auth-user-password
    properties:
    - name: username
      question: Admin username
      help: Used to log in to the dashboard
    - name: enabled
      question: Enable basic auth?
      defaultValue: "true"
      labels:
        kind: confirm
  - name: jx-basic-auth-htpasswd
    properties:
    - name: auth
      template: '{{ auth(name="jx-basic-auth-user-password", username_key="username", password_key="password") }}'
"#;

    #[test]
    fn test_find_property() {
        let schema = YamlSchema::parse(SCHEMA).unwrap();
        let spec = schema
            .find_property("jx-basic-auth-user-password", "username")
            .unwrap()
            .unwrap();
        assert_eq!(spec.question, "Admin username");
        assert_eq!(spec.help, "Used to log in to the dashboard");
        assert_eq!(spec.kind(), None);
        assert!(spec.template.is_none());
    }

    #[test]
    fn test_confirm_kind_and_default() {
        let schema = YamlSchema::parse(SCHEMA).unwrap();
        let spec = schema
            .find_property("jx-basic-auth-user-password", "enabled")
            .unwrap()
            .unwrap();
        assert!(spec.is_confirm());
        assert_eq!(spec.default_value.as_deref(), Some("true"));
    }

    #[test]
    fn test_template_property() {
        let schema = YamlSchema::parse(SCHEMA).unwrap();
        let spec = schema
            .find_property("jx-basic-auth-htpasswd", "auth")
            .unwrap()
            .unwrap();
        assert!(spec.template.unwrap().contains("auth("));
    }

    #[test]
    fn test_unknown_object_or_property() {
        let schema = YamlSchema::parse(SCHEMA).unwrap();
        assert!(schema.find_property("nope", "username").unwrap().is_none());
        assert!(schema
            .find_property("jx-basic-auth-user-password", "nope")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_file_is_empty_schema() {
        let tmp = TempDir::new().unwrap();
        let schema = YamlSchema::load(&tmp.path().join("missing.yaml")).unwrap();
        assert!(schema.objects().is_empty());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("schema.yaml");
        std::fs::write(&path, "spec: [unclosed").unwrap();
        assert!(YamlSchema::load(&path).is_err());
    }
}
