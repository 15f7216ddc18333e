//! Populate command.
//!
//! Fill in missing properties that have a template. Never prompts; values
//! that would need an answer are left for `backfill edit`.

use crate::cli::edit::{options, resolve, summarize};
use crate::cli::{output, Scope};
use crate::core::input::NoInput;
use crate::core::resolve::ResolveMode;
use crate::error::Result;

/// Save every missing value that a template can produce.
pub fn execute(scope: &Scope, keep_going: bool) -> Result<()> {
    let Some(report) = resolve(
        scope,
        Box::new(NoInput),
        options(ResolveMode::TemplatesOnly, keep_going),
    )?
    else {
        return Ok(());
    };

    summarize(&report);
    if report.skipped > 0 {
        output::warn(&format!(
            "{} properties have no template and were left empty",
            output::count(report.skipped)
        ));
        output::hint("run: backfill edit");
    }
    Ok(())
}
