//! Backfill - fill in missing external secret values.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use backfill::cli::output;
use backfill::cli::{execute, Cli};
use backfill::error::{EditorError, Error, PromptError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("BACKFILL_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("backfill=debug")
        } else {
            EnvFilter::new("backfill=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute(cli.command) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

/// A follow-up for errors the operator can act on.
fn suggestion(error: &Error) -> Option<&'static str> {
    let root = match error {
        Error::Resolve { source, .. } | Error::Write { source, .. } | Error::Editor { source, .. } => {
            source.as_ref()
        }
        other => other,
    };
    match root {
        Error::Verify(_) => Some("run: backfill edit"),
        Error::Prompt(PromptError::NonInteractive(_)) => {
            Some("run backfill edit from a terminal, or backfill populate for templated values")
        }
        Error::Backend(EditorError::MissingBinary { .. }) => {
            Some("install the backend CLI and make sure it is on PATH")
        }
        Error::Backend(EditorError::MissingOption { .. }) => {
            Some("set the option on the ExternalSecret in the manifest")
        }
        Error::Run(_) => Some("fix the failures above and run again; completed keys are not repeated"),
        _ => None,
    }
}
