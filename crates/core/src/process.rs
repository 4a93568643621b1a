//! Process execution utilities
//!
//! Provides a unified interface for running external commands with:
//! - Typed command descriptors that can be inspected before execution
//! - Output capture
//! - Directory context
//! - Streaming output for long builds

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandResult {
    /// Create from std::process::Output
    #[must_use]
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Get combined output (stdout + stderr)
    #[must_use]
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// A fully described external command: program, arguments, and the
/// directory it runs in.
///
/// Descriptions are built up front so callers can log or compare the
/// exact invocation before anything is spawned, and record it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from `dir` instead of the caller's working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The program this command runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The working directory this command runs in, if one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The full argument vector, program included.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut v = Vec::with_capacity(1 + self.args.len());
        v.push(self.program.clone());
        v.extend(self.args.iter().cloned());
        v
    }

    /// Check that the command is runnable: a non-empty program, and an
    /// existing working directory when one is set.
    pub fn validate(&self) -> Result<()> {
        if self.program.is_empty() {
            return Err(Error::invalid_command("command has no program"));
        }
        if let Some(dir) = &self.cwd {
            if !dir.is_dir() {
                return Err(Error::invalid_command(format!(
                    "working directory does not exist: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run the command and capture its output.
    pub fn run(&self) -> Result<CommandResult> {
        self.validate()?;
        tracing::debug!(command = %self, "running command");

        let output = self
            .build()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.spawn_error(&e))?;

        let result = CommandResult::from_output(output);
        tracing::debug!(
            program = %self.program,
            exit_code = result.exit_code,
            "command finished"
        );
        Ok(result)
    }

    /// Run the command with inherited stdio and return its exit code.
    ///
    /// Used for long-running build steps whose output should stream
    /// straight to the console.
    pub fn run_streaming(&self) -> Result<i32> {
        self.validate()?;
        tracing::debug!(command = %self, "running command (streaming)");

        let status = self
            .build()
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| self.spawn_error(&e))?;

        Ok(status.code().unwrap_or(-1))
    }

    /// Run the command and fail unless it exits zero.
    pub fn run_checked(&self) -> Result<()> {
        let code = self.run_streaming()?;
        if code != 0 {
            return Err(Error::command_failed(&self.program, code));
        }
        Ok(())
    }

    fn spawn_error(&self, e: &std::io::Error) -> Error {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::command_not_found(&self.program)
        } else {
            Error::process(format!("failed to execute {}: {e}", self.program))
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Check if a command exists in PATH
#[must_use]
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Get the path to a command
#[must_use]
pub fn which_command(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[test]
    fn test_command_exists_echo() {
        assert!(command_exists("echo"));
    }

    #[test]
    fn test_command_exists_nonexistent() {
        assert!(!command_exists("nonexistent_command_12345"));
    }

    #[test]
    fn test_run_captures_stdout() {
        let result = CommandSpec::new("echo").arg("hello").run().unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn test_run_nonzero_exit() {
        let result = CommandSpec::new("false").run().unwrap();
        assert!(!result.success);
        assert_ne!(result.exit_code, 0);
    }

    #[test]
    fn test_run_checked_reports_failure() {
        let err = CommandSpec::new("false").run_checked().unwrap_err();
        assert_eq!(err.code, ErrorCode::CommandFailed);
        assert!(CommandSpec::new("true").run_checked().is_ok());
    }

    #[test]
    fn test_missing_program_maps_to_not_found() {
        let err = CommandSpec::new("definitely-not-a-real-binary-xyz")
            .run()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CommandNotFound);
    }

    #[test]
    fn test_argv_includes_program() {
        let spec = CommandSpec::new("make").args(["-j6", "all"]);
        assert_eq!(spec.argv(), vec!["make", "-j6", "all"]);
        assert_eq!(spec.to_string(), "make -j6 all");
    }

    #[test]
    fn test_validate_empty_program() {
        assert!(CommandSpec::new("").validate().is_err());
    }

    #[test]
    fn test_validate_missing_cwd() {
        let spec = CommandSpec::new("echo").current_dir("/no/such/dir/exists/here");
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_cwd_applies() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = CommandSpec::new("pwd")
            .current_dir(dir.path())
            .run()
            .unwrap();
        let reported = Path::new(result.stdout.trim()).canonicalize().unwrap();
        assert_eq!(reported, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_command_result_combined_output() {
        let result = CommandResult {
            success: true,
            exit_code: 0,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert!(result.combined_output().contains("out"));
        assert!(result.combined_output().contains("err"));
    }
}
