//! External command execution for CLI-backed editors.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::trace;

use crate::error::{EditorError, Result};

/// Runs backend CLIs (`vault`, `gcloud`, `aws`).
pub trait CommandRunner: Send + Sync {
    /// Check that `binary` can be executed.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::MissingBinary` if it cannot.
    fn ensure(&self, binary: &str, backend: &str) -> Result<()>;

    /// Run `program` with `args`, feeding `stdin` if given, and return stdout.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::CommandFailed` with the trimmed stderr if the
    /// command cannot start or exits unsuccessfully.
    fn run(&self, program: &str, args: &[String], stdin: Option<&str>) -> Result<String>;
}

/// Runs commands on the local system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn ensure(&self, binary: &str, backend: &str) -> Result<()> {
        which::which(binary).map_err(|_| EditorError::MissingBinary {
            binary: binary.to_string(),
            backend: backend.to_string(),
        })?;
        Ok(())
    }

    fn run(&self, program: &str, args: &[String], stdin: Option<&str>) -> Result<String> {
        trace!(program, args = args.len(), "running command");

        let failed = |reason: String| EditorError::CommandFailed {
            program: program.to_string(),
            reason,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failed(e.to_string()))?;

        // The pipe is dropped before waiting so the child sees EOF.
        let written = match (stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => pipe.write_all(input.as_bytes()),
            _ => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(failed(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            })
            .into());
        }

        written.map_err(|e| failed(format!("failed to write stdin: {}", e)))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
