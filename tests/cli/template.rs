//! Tests for `backfill template`.

use crate::support::*;

#[test]
fn test_template_reads_secret() {
    let t = Test::new();
    t.seed("db", "jx", &[("password", "hunter2")]);

    let output = t.template("app", "dsn", r#"postgres://app:{{ secret(name="db", key="password") }}@db"#);
    assert_success(&output);
    assert_stdout_contains(&output, "postgres://app:hunter2@db");
}

#[test]
fn test_template_qualified_name() {
    let t = Test::new();
    t.seed("creds", "tools", &[("u", "bob"), ("p", "hunter2")]);

    let output = t.template(
        "app",
        "auth",
        r#"{{ auth(name="tools.creds", username_key="u", password_key="p") }}"#,
    );
    assert_success(&output);
    assert_stdout_contains(&output, "bob:hunter2");
}

#[test]
fn test_template_requirements() {
    let t = Test::new();
    t.write("jx-requirements.yml", REQUIREMENTS);

    let output = t.template("app", "url", "https://hook.{{ Requirements.ingress.domain }}/");
    assert_success(&output);
    assert_stdout_contains(&output, "https://hook.example.com/");
}

#[test]
fn test_template_undefined_variable_fails() {
    let t = Test::new();

    t.cmd()
        .args(["template", "--secret", "app", "--property", "url", "{{ Nope.domain }}"])
        .assert()
        .failure()
        .stderr(predicates::str::contains(
            "failed to evaluate template to create value of Secret app property url",
        ));
}

#[test]
fn test_template_namespace_flag() {
    let t = Test::new();
    t.seed("db", "staging", &[("password", "stg")]);

    t.cmd()
        .args([
            "template",
            "--ns",
            "staging",
            "--secret",
            "app",
            "--property",
            "p",
            r#"{{ secret(name="db", key="password") }}"#,
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("stg"));
}
