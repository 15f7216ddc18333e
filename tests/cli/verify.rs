//! Tests for `backfill verify`.

use crate::support::*;

#[test]
fn test_verify_lists_missing_properties() {
    let t = Test::with(MANIFEST, SCHEMA);

    let output = t.verify();
    assert_failure(&output);
    assert_stderr_contains(&output, "jx-basic-auth-htpasswd.auth");
    assert_stderr_contains(&output, "lighthouse-hmac-token.hmac");
    assert_stderr_contains(&output, "2 properties missing across 2 secrets");
    assert_stderr_contains(&output, "run: backfill edit");
}

#[test]
fn test_verify_passes_when_populated() {
    let t = Test::with(MANIFEST, SCHEMA);
    t.seed("jx-basic-auth-htpasswd", "jx", &[("auth", "admin:hash")]);
    t.seed("lighthouse-hmac-token", "jx", &[("hmac", "abc")]);

    let output = t.verify();
    assert_success(&output);
    assert_stderr_contains(&output, "all secrets are populated");
}

#[test]
fn test_verify_json() {
    let t = Test::with(MANIFEST, SCHEMA);
    t.seed("lighthouse-hmac-token", "jx", &[("hmac", "abc")]);

    let output = t.verify_json();
    assert_failure(&output);

    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["count"], 1);
    assert_eq!(doc["secrets"][0]["name"], "jx-basic-auth-htpasswd");
    assert_eq!(doc["secrets"][0]["namespace"], "jx");
    assert_eq!(doc["secrets"][0]["backendType"], "local");
    assert_eq!(doc["secrets"][0]["missing"][0]["properties"][0], "auth");
}

#[test]
fn test_verify_namespace_filter() {
    let t = Test::with(MANIFEST, SCHEMA);

    t.cmd()
        .args(["verify", "--ns", "tools"])
        .assert()
        .success();
}

#[test]
fn test_verify_without_manifest() {
    let t = Test::new();

    let output = t.verify();
    assert_success(&output);
}
