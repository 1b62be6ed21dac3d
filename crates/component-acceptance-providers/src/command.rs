// crates/component-acceptance-providers/src/command.rs
// ============================================================================
// Module: Command Runner
// Description: Process execution seam for the deployment driver.
// Purpose: Run engine commands and capture their status and output.
// Dependencies: component-acceptance-core, tracing
// ============================================================================

//! ## Overview
//! [`CommandRunner`] is the seam between the Atmos driver and the operating
//! system. [`ProcessRunner`] spawns real processes with stdin closed and both
//! output streams captured; tests substitute a scripted runner.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use component_acceptance_core::DriverError;
use tracing::debug;

// ============================================================================
// SECTION: Command Types
// ============================================================================

/// A fully resolved command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Working directory, if not inherited.
    pub current_dir: Option<PathBuf>,
    /// Extra environment variables.
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    /// Creates a command with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: BTreeMap::new(),
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns a successful output with the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Returns the exit status rendered for error messages.
    #[must_use]
    pub fn status_label(&self) -> String {
        self.code.map_or_else(|| "signal".to_string(), |code| format!("code {code}"))
    }

    /// Converts the output into a [`DriverError::CommandFailed`].
    #[must_use]
    pub fn failure(&self, command: &CommandSpec) -> DriverError {
        DriverError::CommandFailed {
            command: command.to_string(),
            status: self.status_label(),
            stderr: self.stderr.trim().to_string(),
        }
    }
}

// ============================================================================
// SECTION: Runner Contract
// ============================================================================

/// Executes commands on behalf of a driver.
pub trait CommandRunner {
    /// Runs `command` to completion. A non-zero exit is not an error here.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Spawn`] when the process cannot be started.
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput, DriverError>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput, DriverError> {
        debug!(%command, "spawning command");
        let mut process = Command::new(&command.program);
        process.args(&command.args);
        process.envs(&command.env);
        if let Some(dir) = &command.current_dir {
            process.current_dir(dir);
        }
        process.stdin(Stdio::null());
        let output = process.output().map_err(|err| DriverError::Spawn {
            command: command.to_string(),
            reason: err.to_string(),
        })?;
        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(%command, status = %result.status_label(), "command finished");
        Ok(result)
    }
}
