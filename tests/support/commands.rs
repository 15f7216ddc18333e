//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a backfill command running in the project directory.
    ///
    /// Logging and colors are turned off so output assertions are stable.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("backfill").expect("failed to find backfill binary");
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("BACKFILL_LOG");
        cmd.env_remove("BACKFILL_NAMESPACE");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `backfill verify`.
    pub fn verify(&self) -> Output {
        self.cmd()
            .arg("verify")
            .output()
            .expect("failed to run backfill verify")
    }

    /// Shortcut for `backfill verify --json`.
    pub fn verify_json(&self) -> Output {
        self.cmd()
            .args(["verify", "--json"])
            .output()
            .expect("failed to run backfill verify --json")
    }

    /// Shortcut for `backfill populate`.
    pub fn populate(&self) -> Output {
        self.cmd()
            .arg("populate")
            .output()
            .expect("failed to run backfill populate")
    }

    /// Shortcut for `backfill edit`.
    pub fn edit(&self) -> Output {
        self.cmd()
            .arg("edit")
            .output()
            .expect("failed to run backfill edit")
    }

    /// Shortcut for `backfill template`.
    pub fn template(&self, secret: &str, property: &str, text: &str) -> Output {
        self.cmd()
            .args(["template", "--secret", secret, "--property", property, text])
            .output()
            .expect("failed to run backfill template")
    }
}
