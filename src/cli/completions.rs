//! Completions command.

use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};

use crate::cli::{Cli, Shell};
use crate::error::Result;

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
        }
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write(shell: Shell, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    generate(CompletionShell::from(shell), &mut cmd, "backfill", out);
}

/// Generate shell completions.
pub fn execute(shell: Shell) -> Result<()> {
    write(shell, &mut std::io::stdout());
    Ok(())
}
