//! Operator input.
//!
//! The resolver asks for values through the [`Input`] trait so that runs can
//! be driven by a terminal, a script, or a test.

use std::io::{self, IsTerminal};

use console::style;
use dialoguer::{Confirm, Password};

use crate::error::{PromptError, Result};

/// Source of operator-supplied values.
pub trait Input {
    /// Ask for a masked secret value.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if input fails or the operator aborts.
    fn pick_password(&mut self, message: &str, help: &str) -> Result<String>;

    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if input fails or the operator aborts.
    fn confirm(&mut self, message: &str, help: &str, default: bool) -> Result<bool>;
}

/// Interactive terminal prompts.
///
/// Help text is printed as a hint line above the prompt.
#[derive(Debug, Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    fn ensure_interactive(message: &str) -> Result<()> {
        if io::stdin().is_terminal() {
            Ok(())
        } else {
            Err(PromptError::NonInteractive(message.to_string()).into())
        }
    }

    fn show_help(help: &str) {
        if !help.is_empty() {
            eprintln!("{} {}", style("→").cyan(), style(help).dim());
        }
    }
}

impl Input for Terminal {
    fn pick_password(&mut self, message: &str, help: &str) -> Result<String> {
        Self::ensure_interactive(message)?;
        Self::show_help(help);
        Password::new()
            .with_prompt(message)
            .interact()
            .map_err(|e| {
                PromptError::Input {
                    message: message.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn confirm(&mut self, message: &str, help: &str, default: bool) -> Result<bool> {
        Self::ensure_interactive(message)?;
        Self::show_help(help);
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(|e| {
                PromptError::Input {
                    message: message.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

/// Input that never prompts; every question fails.
///
/// Used for non-interactive runs where prompting would block.
#[derive(Debug, Default)]
pub struct NoInput;

impl Input for NoInput {
    fn pick_password(&mut self, message: &str, _help: &str) -> Result<String> {
        Err(PromptError::NonInteractive(message.to_string()).into())
    }

    fn confirm(&mut self, message: &str, _help: &str, _default: bool) -> Result<bool> {
        Err(PromptError::NonInteractive(message.to_string()).into())
    }
}
