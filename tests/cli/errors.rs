//! Error output and exit codes.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_invalid_settings() {
    let t = Test::new();
    t.write(".backfill.toml", "[backfill]\nnamespace = \"a.b\"\n");

    t.cmd()
        .arg("verify")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("backfill.namespace"));
}

#[test]
fn test_unknown_backend_in_manifest() {
    let t = Test::with("- name: x\n  backendType: azureKeyVault\n", "");

    t.cmd()
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend type: azureKeyVault"));
}

#[test]
fn test_gcp_without_project() {
    let manifest = r#"
- name: token
  backendType: gcpSecretsManager
  data:
  - key: token
    property: value
"#;
    let schema = r#"
spec:
  objects:
  - name: token
    properties:
    - name: value
      template: 'static'
"#;
    let t = Test::with(manifest, schema);

    // Either gcloud is missing or the project is; both are reported.
    t.cmd()
        .arg("populate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("gcpSecretsManager"));
}

#[test]
fn test_completions() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backfill"));
}
