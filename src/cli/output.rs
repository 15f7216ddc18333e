//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: keys, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info
//!
//! Status lines go to stderr so that `data` output on stdout stays pipeable.

use console::style;
use std::fmt::Display;

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ saved 3 properties`
pub fn success(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✓").green(), msg);
    } else {
        eprintln!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ failed to parse settings`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("⚠").yellow(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint message (cyan).
///
/// Example: `→ run: backfill edit`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a bold section header.
fn header(title: &str) {
    if colors_enabled() {
        eprintln!("{}", style(title).bold());
    } else {
        eprintln!("{}", title);
    }
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  backend:  vault`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        eprintln!("  {}  {}", style(label).dim(), style(value).bold());
    } else {
        eprintln!("  {}  {}", label, value);
    }
}

/// Print a list item with bullet.
pub fn list_item(item: &str) {
    eprintln!("  • {}", item);
}

/// Print a horizontal rule separator.
fn rule() {
    let line = "─".repeat(RULE_WIDTH);
    if colors_enabled() {
        eprintln!("{}", style(line).dim());
    } else {
        eprintln!("{}", line);
    }
}

/// Format a key name in cyan.
pub fn key(k: &str) -> String {
    if colors_enabled() {
        style(k).cyan().to_string()
    } else {
        k.to_string()
    }
}

/// Format a count in bold.
pub fn count(n: usize) -> String {
    if colors_enabled() {
        style(n).bold().to_string()
    } else {
        n.to_string()
    }
}

/// Print an empty line.
pub fn blank() {
    eprintln!();
}

/// Print raw data to stdout (template output, JSON).
pub fn data(content: &str) {
    println!("{}", content);
}

/// Print a section header with a separator line.
pub fn section(title: &str) {
    blank();
    header(title);
    rule();
}
