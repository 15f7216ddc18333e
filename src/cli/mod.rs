//! Command-line interface.

pub mod completions;
pub mod edit;
pub mod output;
pub mod populate;
pub mod template;
pub mod verify;
mod workspace;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use workspace::Workspace;

/// Backfill - fill in missing external secret values.
#[derive(Parser)]
#[command(
    name = "backfill",
    about = "Resolve missing external secret values and write them back to their stores",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to look and which namespace to work in.
#[derive(Args, Debug, Clone, Default)]
pub struct Scope {
    /// Only handle ExternalSecrets in this namespace (default: all)
    #[arg(long = "ns", env = "BACKFILL_NAMESPACE")]
    pub namespace: Option<String>,

    /// Directory containing .backfill.toml
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Prompt for every missing secret value and write it back
    Edit {
        #[command(flatten)]
        scope: Scope,
        /// Keep going after a failed key and report all failures at the end
        #[arg(long)]
        keep_going: bool,
    },

    /// Fill in missing values that have a template, without prompting
    Populate {
        #[command(flatten)]
        scope: Scope,
        /// Keep going after a failed key and report all failures at the end
        #[arg(long)]
        keep_going: bool,
    },

    /// List missing secret properties
    Verify {
        #[command(flatten)]
        scope: Scope,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a value template and print the result
    Template {
        /// Secret the value is for
        #[arg(long)]
        secret: String,
        /// Property the value is for
        #[arg(long)]
        property: String,
        #[command(flatten)]
        scope: Scope,
        /// Template text
        text: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Edit { scope, keep_going } => edit::execute(&scope, keep_going),
        Populate { scope, keep_going } => populate::execute(&scope, keep_going),
        Verify { scope, json } => verify::execute(&scope, json),
        Template {
            secret,
            property,
            scope,
            text,
        } => template::execute(&scope, &secret, &property, &text),
        Completions { shell } => completions::execute(shell),
    }
}
