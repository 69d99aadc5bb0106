//! Interpreter subprocess launch and wait.
//!
//! The child inherits the parent's console so the wrapped script's output and
//! prompts flow straight through. The launcher surfaces the child's
//! termination to its caller; exit-code policy (the host exits with the
//! child's code, signal deaths map to 1) lives in [`exit_code`].

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;

use crate::error::LaunchError;

/// Placeholder in an argument template replaced by the encoded script.
pub const SCRIPT_PLACEHOLDER: &str = "{encoded-command}";

/// Generator-supplied interpreter invocation template.
#[derive(Debug, Clone)]
pub struct InterpreterSpec {
    /// Executable filename handed to the locator (not necessarily a path).
    pub filename: String,
    /// Argument pattern; one entry is the [`SCRIPT_PLACEHOLDER`].
    pub args: Vec<String>,
    /// Generator-pinned absolute path. When set, the locator search is
    /// skipped entirely.
    pub fixed_path: Option<PathBuf>,
}

impl InterpreterSpec {
    /// The stock template for PowerShell Core, matching what generated hosts
    /// have always passed: no profile, no logo, script via encoded command.
    pub fn pwsh() -> Self {
        let mut args = vec!["-NoProfile".to_string(), "-NoLogo".to_string()];
        if cfg!(windows) {
            args.push("-WindowStyle".to_string());
            args.push("Hidden".to_string());
        }
        args.push("-EncodedCommand".to_string());
        args.push(SCRIPT_PLACEHOLDER.to_string());
        Self {
            filename: pwsh_filename().to_string(),
            args,
            fixed_path: None,
        }
    }

    /// Concrete argument list for one launch.
    pub fn render_args(&self, encoded_script: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                if arg == SCRIPT_PLACEHOLDER {
                    encoded_script.to_string()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }
}

#[cfg(windows)]
fn pwsh_filename() -> &'static str {
    "pwsh.exe"
}

#[cfg(not(windows))]
fn pwsh_filename() -> &'static str {
    "pwsh"
}

/// Spawn the interpreter and block until it exits.
pub async fn launch(interpreter: &Path, args: &[String]) -> Result<ExitStatus, LaunchError> {
    tracing::debug!(interpreter = %interpreter.display(), "starting interpreter");
    let mut child = Command::new(interpreter)
        .args(args)
        .stdin(std::process::Stdio::inherit())
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .spawn()
        .map_err(LaunchError::Spawn)?;
    let status = child.wait().await.map_err(LaunchError::Wait)?;
    tracing::debug!(code = status.code(), "interpreter exited");
    Ok(status)
}

/// Host exit code for a finished child: the child's own code, or 1 when the
/// child died without one (killed by a signal).
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
