//! Edit command.
//!
//! Resolve every missing property, prompting for values that have no
//! template, and write each key back through its backend.

use crate::cli::{output, Scope, Workspace};
use crate::core::input::{Input, Terminal};
use crate::core::resolve::ResolveMode;
use crate::core::run::{run, FailurePolicy, RunOptions, RunReport};
use crate::error::Result;

/// Prompt for and save every missing value.
pub fn execute(scope: &Scope, keep_going: bool) -> Result<()> {
    let report = resolve(
        scope,
        Box::new(Terminal::new()),
        options(ResolveMode::Interactive, keep_going),
    )?;
    if let Some(report) = report {
        summarize(&report);
    }
    Ok(())
}

pub(crate) fn options(mode: ResolveMode, keep_going: bool) -> RunOptions {
    RunOptions {
        mode,
        policy: if keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        },
    }
}

/// Verify, then run the resolution over whatever is missing.
///
/// Returns `None` when nothing was missing.
pub(crate) fn resolve(
    scope: &Scope,
    input: Box<dyn Input>,
    options: RunOptions,
) -> Result<Option<RunReport>> {
    let workspace = Workspace::open(scope)?;
    let results = workspace.verify()?;

    if results.is_empty() {
        output::success("all secrets are populated");
        return Ok(None);
    }

    let report = run(
        &results,
        Box::new(workspace.schema()?),
        input,
        workspace.evaluator(),
        workspace.editors(),
        options,
    )?;
    Ok(Some(report))
}

pub(crate) fn summarize(report: &RunReport) {
    if report.written_keys > 0 {
        output::success(&format!(
            "saved {} properties across {} keys",
            output::count(report.written_properties),
            output::count(report.written_keys)
        ));
    }
    if report.templated > 0 {
        output::kv("templated", report.templated);
    }
    if report.prompted > 0 {
        output::kv("prompted", report.prompted);
    }
}
