// crates/component-acceptance-providers/src/atmos.rs
// ============================================================================
// Module: Atmos Deployment Driver
// Description: Deploys, plans, reads, and destroys components through Atmos.
// Purpose: Implement the deployment driver contract on the Atmos CLI.
// Dependencies: component-acceptance-core, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`AtmosDriver`] shells out to
//! `atmos terraform <subcommand> <component> -s <stack> -- <native args>`.
//! Descriptor variables are forwarded as `-var name=value` to every command
//! that evaluates configuration (deploy, plan, destroy). The plan uses
//! `-detailed-exitcode`, so exit code 2 means changes are pending.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use component_acceptance_core::ApplySummary;
use component_acceptance_core::ComponentDescriptor;
use component_acceptance_core::DeploymentDriver;
use component_acceptance_core::DriverError;
use component_acceptance_core::OutputSet;
use component_acceptance_core::PlanOutcome;
use tracing::info;
use tracing::warn;

use crate::command::CommandOutput;
use crate::command::CommandRunner;
use crate::command::CommandSpec;
use crate::command::ProcessRunner;
use crate::terraform::format_var;
use crate::terraform::parse_apply_summary;
use crate::terraform::parse_output_json;
use crate::terraform::parse_plan_summary;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Plan exit code meaning changes are pending.
const PLAN_CHANGES_EXIT_CODE: i32 = 2;

// ============================================================================
// SECTION: Subcommands
// ============================================================================

/// Atmos terraform subcommands used by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subcommand {
    /// `deploy`: init, apply with auto-approve.
    Deploy,
    /// `output`: read outputs.
    Output,
    /// `destroy`: destroy with auto-approve.
    Destroy,
    /// `plan`: re-plan.
    Plan,
}

impl Subcommand {
    /// Returns the Atmos subcommand name.
    const fn as_str(self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Output => "output",
            Self::Destroy => "destroy",
            Self::Plan => "plan",
        }
    }

    /// Returns the native engine arguments for the subcommand.
    const fn native_args(self) -> &'static [&'static str] {
        match self {
            Self::Deploy | Self::Destroy => &["-auto-approve"],
            Self::Output => &["-json"],
            Self::Plan => &["-detailed-exitcode", "-input=false"],
        }
    }

    /// Returns true when descriptor variables are forwarded.
    const fn takes_vars(self) -> bool {
        !matches!(self, Self::Output)
    }
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Deployment driver backed by the Atmos CLI.
#[derive(Debug, Clone)]
pub struct AtmosDriver<R = ProcessRunner> {
    /// Command runner.
    runner: R,
    /// Atmos executable.
    binary: String,
    /// Working directory for every invocation.
    base_path: Option<PathBuf>,
    /// Extra environment for every invocation.
    env: BTreeMap<String, String>,
}

impl AtmosDriver<ProcessRunner> {
    /// Creates a driver that spawns `binary` as a child process.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self::with_runner(binary, ProcessRunner)
    }
}

impl<R: CommandRunner> AtmosDriver<R> {
    /// Creates a driver using a custom command runner.
    #[must_use]
    pub fn with_runner(binary: impl Into<String>, runner: R) -> Self {
        Self {
            runner,
            binary: binary.into(),
            base_path: None,
            env: BTreeMap::new(),
        }
    }

    /// Sets the directory Atmos runs in.
    #[must_use]
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Adds environment variables for every invocation.
    #[must_use]
    pub fn envs(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    /// Returns the underlying runner.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Builds the invocation for `subcommand` on `descriptor`.
    fn command(&self, subcommand: Subcommand, descriptor: &ComponentDescriptor) -> CommandSpec {
        let mut spec = CommandSpec::new(self.binary.clone())
            .args([
                "terraform",
                subcommand.as_str(),
                descriptor.component.as_str(),
                "-s",
                descriptor.stack.as_str(),
                "--",
            ])
            .args(subcommand.native_args().iter().copied());
        if subcommand.takes_vars() {
            for (name, value) in &descriptor.vars {
                spec = spec.args(["-var".to_string(), format_var(name, value)]);
            }
        }
        spec.current_dir.clone_from(&self.base_path);
        spec.env.clone_from(&self.env);
        spec
    }

    /// Runs `subcommand` and returns its output, failing on non-zero exit
    /// codes other than those in `accepted`.
    fn execute(
        &self,
        subcommand: Subcommand,
        descriptor: &ComponentDescriptor,
        accepted: &[i32],
    ) -> Result<CommandOutput, DriverError> {
        let command = self.command(subcommand, descriptor);
        let output = self.runner.run(&command)?;
        match output.code {
            Some(code) if code == 0 || accepted.contains(&code) => Ok(output),
            _ => {
                warn!(%command, status = %output.status_label(), "atmos command failed");
                Err(output.failure(&command))
            }
        }
    }
}

impl<R: CommandRunner> DeploymentDriver for AtmosDriver<R> {
    fn deploy(&self, descriptor: &ComponentDescriptor) -> Result<ApplySummary, DriverError> {
        let output = self.execute(Subcommand::Deploy, descriptor, &[])?;
        parse_apply_summary(&output.stdout)
    }

    fn outputs(&self, descriptor: &ComponentDescriptor) -> Result<OutputSet, DriverError> {
        let output = self.execute(Subcommand::Output, descriptor, &[])?;
        parse_output_json(&output.stdout)
    }

    fn destroy(&self, descriptor: &ComponentDescriptor) -> Result<(), DriverError> {
        self.execute(Subcommand::Destroy, descriptor, &[])?;
        Ok(())
    }

    fn plan(&self, descriptor: &ComponentDescriptor) -> Result<PlanOutcome, DriverError> {
        let output = self.execute(Subcommand::Plan, descriptor, &[PLAN_CHANGES_EXIT_CODE])?;
        if output.code != Some(PLAN_CHANGES_EXIT_CODE) {
            return Ok(PlanOutcome::NoChanges);
        }
        let summary = parse_plan_summary(&output.stdout).unwrap_or_default();
        info!(component = %descriptor, %summary, "plan reports pending changes");
        Ok(PlanOutcome::Changes(summary))
    }
}
