//! Test fixtures and constants.

/// Settings: namespace `jx`, a single lookup attempt so tests never sleep.
pub const SETTINGS: &str = r#"[backfill]
namespace = "jx"

[retry]
attempts = 1
jitter = false
"#;

/// Two local ExternalSecrets: one templated key, one that needs a prompt.
pub const MANIFEST: &str = r#"
- name: jx-basic-auth-htpasswd
  backendType: local
  data:
  - key: jx-basic-auth-htpasswd
    property: auth
- name: lighthouse-hmac-token
  backendType: local
  data:
  - key: lighthouse-hmac-token
    property: hmac
"#;

/// Only the templated secret of [`MANIFEST`].
pub const TEMPLATED_MANIFEST: &str = r#"
- name: jx-basic-auth-htpasswd
  backendType: local
  data:
  - key: jx-basic-auth-htpasswd
    property: auth
"#;

/// Schema deriving the htpasswd line from the basic auth credentials.
pub const SCHEMA: &str = r#"
apiVersion: gitops.jenkins-x.io/v1alpha1
kind: Schema
spec:
  objects:
  - name: jx-basic-auth-htpasswd
    properties:
    - name: auth
      question: basic auth htpasswd line
      template: '{{ htpasswdSecret(name="jx-basic-auth-user-password", username_key="username", password_key="password") }}'
  - name: lighthouse-hmac-token
    properties:
    - name: hmac
      question: HMAC token used to validate webhooks
"#;

/// The credentials [`SCHEMA`] reads.
pub const BASIC_AUTH: &[(&str, &str)] = &[("username", "admin"), ("password", "s3cr3t")];

/// Requirements with the ingress domain under `spec`.
pub const REQUIREMENTS: &str = r#"
apiVersion: core.jenkins-x.io/v4beta1
kind: Requirements
spec:
  cluster:
    provider: gke
  ingress:
    domain: example.com
"#;
