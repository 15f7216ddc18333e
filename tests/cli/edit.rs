//! Tests for `backfill edit`.

use crate::support::*;

#[test]
fn test_edit_without_terminal_fails_on_prompt() {
    let t = Test::with(MANIFEST, SCHEMA);
    t.seed("jx-basic-auth-user-password", "jx", BASIC_AUTH);

    let output = t.edit();
    assert_failure(&output);
    assert_stderr_contains(&output, "property hmac");
    assert_stderr_contains(&output, "ExternalSecret lighthouse-hmac-token");
    assert_stderr_contains(&output, "non-interactive");
    assert_stderr_contains(&output, "backfill populate");

    // Secrets before the failing one are already saved.
    assert!(t.value("jx-basic-auth-htpasswd", "jx", "auth").is_some());
}

#[test]
fn test_edit_keep_going_reports_every_failure() {
    let t = Test::with(MANIFEST, SCHEMA);

    let output = t.cmd().args(["edit", "--keep-going"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "1 secret(s) could not be populated");
    assert!(t.value("jx-basic-auth-htpasswd", "jx", "auth").is_some());
}

#[test]
fn test_edit_with_only_templates_needs_no_terminal() {
    let t = Test::with(TEMPLATED_MANIFEST, SCHEMA);
    t.seed("jx-basic-auth-user-password", "jx", BASIC_AUTH);

    let output = t.edit();
    assert_success(&output);
    let line = t.value("jx-basic-auth-htpasswd", "jx", "auth").unwrap();
    assert_htpasswd(&line, "admin", "s3cr3t");
}
