// crates/component-acceptance-core/src/driver.rs
// ============================================================================
// Module: Deployment Driver
// Description: Contract for the infrastructure-as-code engine plus a scoped guard.
// Purpose: Deploy, read outputs, plan, and guarantee teardown of a component.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`DeploymentDriver`] is the consumed contract of the deployment engine.
//! [`Deployment`] is armed before deploy is attempted and destroys the
//! component when dropped, so teardown runs on every exit path (including a
//! failed deploy) unless [`TeardownPolicy::Skip`] is configured.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::descriptor::ComponentDescriptor;
use crate::outputs::OutputSet;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by a deployment driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// Engine process could not be started.
    #[error("failed to spawn {command}: {reason}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Spawn failure message.
        reason: String,
    },
    /// Engine process exited unsuccessfully.
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Exit status, rendered (`code 1`, `signal`).
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// Engine output could not be interpreted.
    #[error("unexpected engine output: {0}")]
    Output(String),
}

// ============================================================================
// SECTION: Summaries
// ============================================================================

/// Resource counts reported by an apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    /// Resources created.
    pub added: u32,
    /// Resources updated in place.
    pub changed: u32,
    /// Resources destroyed.
    pub destroyed: u32,
}

impl ApplySummary {
    /// Returns true when the apply touched no resources.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.added == 0 && self.changed == 0 && self.destroyed == 0
    }
}

impl fmt::Display for ApplySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} added, {} changed, {} destroyed", self.added, self.changed, self.destroyed)
    }
}

/// Resource counts proposed by a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Resources to create.
    pub add: u32,
    /// Resources to update in place.
    pub change: u32,
    /// Resources to destroy.
    pub destroy: u32,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to add, {} to change, {} to destroy", self.add, self.change, self.destroy)
    }
}

/// Result of re-planning a deployed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Live state matches configuration.
    NoChanges,
    /// The engine proposes changes.
    Changes(PlanSummary),
}

// ============================================================================
// SECTION: Driver Contract
// ============================================================================

/// Deployment engine contract consumed by the harness.
pub trait DeploymentDriver {
    /// Applies the component with auto-approval.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the apply fails.
    fn deploy(&self, descriptor: &ComponentDescriptor) -> Result<ApplySummary, DriverError>;

    /// Reads the component's declared outputs.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when outputs cannot be read.
    fn outputs(&self, descriptor: &ComponentDescriptor) -> Result<OutputSet, DriverError>;

    /// Destroys the component with auto-approval.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the destroy fails.
    fn destroy(&self, descriptor: &ComponentDescriptor) -> Result<(), DriverError>;

    /// Re-plans the component and reports proposed changes.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the plan fails.
    fn plan(&self, descriptor: &ComponentDescriptor) -> Result<PlanOutcome, DriverError>;
}

// ============================================================================
// SECTION: Scoped Deployment
// ============================================================================

/// Whether a scenario destroys its component on exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownPolicy {
    /// Destroy on every exit path.
    #[default]
    Always,
    /// Leave the component deployed for inspection.
    Skip,
}

/// Scoped handle that destroys its component when released or dropped.
pub struct Deployment<'a, D: DeploymentDriver + ?Sized> {
    /// Driver used for every step.
    driver: &'a D,
    /// Component being deployed.
    descriptor: &'a ComponentDescriptor,
    /// Teardown behavior on release.
    teardown: TeardownPolicy,
    /// Set once teardown has been handled.
    released: bool,
}

impl<'a, D: DeploymentDriver + ?Sized> Deployment<'a, D> {
    /// Arms a deployment guard. Nothing is deployed until [`Self::apply`].
    #[must_use]
    pub const fn arm(
        driver: &'a D,
        descriptor: &'a ComponentDescriptor,
        teardown: TeardownPolicy,
    ) -> Self {
        Self {
            driver,
            descriptor,
            teardown,
            released: false,
        }
    }

    /// Returns the guarded descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &ComponentDescriptor {
        self.descriptor
    }

    /// Deploys the component.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the deploy fails; the guard still tears
    /// down whatever was partially created.
    pub fn apply(&self) -> Result<ApplySummary, DriverError> {
        info!(component = %self.descriptor, "deploying component");
        let summary = self.driver.deploy(self.descriptor)?;
        info!(component = %self.descriptor, %summary, "deploy complete");
        Ok(summary)
    }

    /// Reads the deployed component's outputs.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when outputs cannot be read.
    pub fn outputs(&self) -> Result<OutputSet, DriverError> {
        let outputs = self.driver.outputs(self.descriptor)?;
        info!(component = %self.descriptor, count = outputs.len(), "outputs captured");
        Ok(outputs)
    }

    /// Re-plans the deployed component.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the plan fails.
    pub fn plan(&self) -> Result<PlanOutcome, DriverError> {
        info!(component = %self.descriptor, "re-planning component");
        self.driver.plan(self.descriptor)
    }

    /// Tears the component down and reports the teardown result.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the destroy fails.
    pub fn finish(mut self) -> Result<(), DriverError> {
        self.released = true;
        self.teardown_now()
    }

    /// Runs teardown according to the configured policy.
    fn teardown_now(&self) -> Result<(), DriverError> {
        match self.teardown {
            TeardownPolicy::Always => {
                info!(component = %self.descriptor, "destroying component");
                self.driver.destroy(self.descriptor)
            }
            TeardownPolicy::Skip => {
                warn!(component = %self.descriptor, "teardown skipped; component left deployed");
                Ok(())
            }
        }
    }
}

impl<D: DeploymentDriver + ?Sized> Drop for Deployment<'_, D> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = self.teardown_now() {
            error!(component = %self.descriptor, error = %err, "teardown failed");
        }
    }
}
