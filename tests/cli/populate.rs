//! Tests for `backfill populate`.

use crate::support::*;

#[test]
fn test_populate_writes_templated_values() {
    let t = Test::with(MANIFEST, SCHEMA);
    t.seed("jx-basic-auth-user-password", "jx", BASIC_AUTH);

    let output = t.populate();
    assert_success(&output);
    assert_stderr_contains(&output, "saved 1 properties across 1 keys");
    assert_stderr_contains(&output, "1 properties have no template");

    let line = t.value("jx-basic-auth-htpasswd", "jx", "auth").unwrap();
    assert_htpasswd(&line, "admin", "s3cr3t");
    assert!(t.value("lighthouse-hmac-token", "jx", "hmac").is_none());
}

#[test]
fn test_populate_is_idempotent() {
    let t = Test::with(TEMPLATED_MANIFEST, SCHEMA);
    t.seed("jx-basic-auth-user-password", "jx", BASIC_AUTH);

    assert_success(&t.populate());
    let first = t.value("jx-basic-auth-htpasswd", "jx", "auth").unwrap();

    let output = t.populate();
    assert_success(&output);
    assert_stderr_contains(&output, "all secrets are populated");
    // A second run must not re-hash.
    assert_eq!(t.value("jx-basic-auth-htpasswd", "jx", "auth").unwrap(), first);

    assert_success(&t.verify());
}

#[test]
fn test_populate_missing_source_writes_empty_value() {
    let t = Test::with(TEMPLATED_MANIFEST, SCHEMA);

    let output = t.populate();
    assert_success(&output);
    assert_eq!(
        t.value("jx-basic-auth-htpasswd", "jx", "auth").as_deref(),
        Some("")
    );
}

#[test]
fn test_populate_keeps_other_properties() {
    let t = Test::with(TEMPLATED_MANIFEST, SCHEMA);
    t.seed("jx-basic-auth-user-password", "jx", BASIC_AUTH);
    t.seed("jx-basic-auth-htpasswd", "jx", &[("owner", "platform")]);

    assert_success(&t.populate());
    assert_eq!(
        t.value("jx-basic-auth-htpasswd", "jx", "owner").as_deref(),
        Some("platform")
    );
    assert!(t.value("jx-basic-auth-htpasswd", "jx", "auth").is_some());
}
