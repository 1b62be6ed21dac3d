// crates/component-acceptance-core/src/scenario.rs
// ============================================================================
// Module: Scenario Runner
// Description: Sequences deploy, outputs, live query, checks, drift, teardown.
// Purpose: Run acceptance scenarios against a driver and a provider client.
// Dependencies: serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ScenarioRunner`] executes one [`ScenarioSpec`] at a time. Each scenario
//! arms a [`Deployment`] guard before deploying, so the component is torn
//! down whether the scenario passes, fails an assertion, or fails to deploy.
//! Invariants:
//! - Scenarios run sequentially and share no mutable state.
//! - Drift is checked only after every assertion passed.
//! - A teardown failure fails an otherwise passing scenario.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;
use tracing::info;
use tracing::info_span;

use crate::checks::CheckOutcome;
use crate::checks::CheckReport;
use crate::descriptor::ComponentDescriptor;
use crate::driver::ApplySummary;
use crate::driver::Deployment;
use crate::driver::DeploymentDriver;
use crate::driver::DriverError;
use crate::driver::PlanOutcome;
use crate::driver::PlanSummary;
use crate::driver::TeardownPolicy;
use crate::outputs::OutputError;
use crate::query::QueryError;
use crate::query::ResourceQueryClient;
use crate::query::RetryPolicy;
use crate::query::query_with_retry;
use crate::report::RunReport;
use crate::report::ScenarioReport;
use crate::report::ScenarioStatus;
use crate::topic::TopicOutputs;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that end a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// Deploy failed.
    #[error("deploy failed: {0}")]
    Deploy(DriverError),
    /// Outputs could not be captured or read.
    #[error("outputs unavailable: {0}")]
    Outputs(String),
    /// Provider query failed.
    #[error("provider query failed: {0}")]
    Query(QueryError),
    /// One or more checks failed.
    #[error("{} check(s) failed", .0.len())]
    Assertions(Vec<CheckOutcome>),
    /// Re-plan proposed changes.
    #[error("drift detected: {0}")]
    Drift(PlanSummary),
    /// Re-plan failed.
    #[error("drift check failed: {0}")]
    Plan(DriverError),
    /// A disabled component created, changed, or destroyed resources.
    #[error("disabled component touched resources: {0}")]
    ResourcesCreated(ApplySummary),
    /// Teardown failed after the scenario body succeeded.
    #[error("teardown failed: {0}")]
    Teardown(DriverError),
}

impl From<OutputError> for ScenarioError {
    fn from(err: OutputError) -> Self {
        Self::Outputs(err.to_string())
    }
}

// ============================================================================
// SECTION: Scenario Types
// ============================================================================

/// Scenario behaviors supported by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Deploy the topic, cross-check outputs and live attributes, check drift.
    BasicTopic,
    /// Deploy with `enabled = false` and require that nothing is created.
    EnabledFlag,
}

impl ScenarioKind {
    /// Returns the configuration label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BasicTopic => "basic_topic",
            Self::EnabledFlag => "enabled_flag",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSpec {
    /// Unique scenario name.
    pub name: String,
    /// Scenario behavior.
    pub kind: ScenarioKind,
    /// Component under test.
    pub descriptor: ComponentDescriptor,
    /// Re-plan after checks pass and require zero changes.
    pub drift_check: bool,
}

/// Settings shared by every scenario in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessSettings {
    /// Provider region the component deploys into.
    pub region: String,
    /// Provider partition used when deriving ARNs.
    pub partition: String,
    /// Retry policy for live attribute queries.
    pub retry: RetryPolicy,
    /// Teardown behavior.
    pub teardown: TeardownPolicy,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            region: "us-east-2".to_string(),
            partition: "aws".to_string(),
            retry: RetryPolicy::default(),
            teardown: TeardownPolicy::Always,
        }
    }
}

/// Observations accumulated while a scenario runs.
#[derive(Debug, Default)]
struct Progress {
    /// Checks recorded so far.
    checks: CheckReport,
    /// Apply summary once deploy succeeded.
    apply: Option<ApplySummary>,
    /// Drift outcome once the re-plan ran.
    drift: Option<PlanOutcome>,
    /// Teardown failure observed after an earlier error.
    teardown_error: Option<String>,
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs scenarios against a deployment driver and a provider query client.
pub struct ScenarioRunner<'a> {
    /// Deployment engine.
    driver: &'a dyn DeploymentDriver,
    /// Provider query client.
    client: &'a dyn ResourceQueryClient,
    /// Shared settings.
    settings: HarnessSettings,
}

impl<'a> ScenarioRunner<'a> {
    /// Creates a runner.
    #[must_use]
    pub fn new(
        driver: &'a dyn DeploymentDriver,
        client: &'a dyn ResourceQueryClient,
        settings: HarnessSettings,
    ) -> Self {
        Self {
            driver,
            client,
            settings,
        }
    }

    /// Returns the shared settings.
    #[must_use]
    pub const fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    /// Runs every scenario in order.
    #[must_use]
    pub fn run_all(&self, specs: &[ScenarioSpec]) -> RunReport {
        RunReport::from_reports(specs.iter().map(|spec| self.run(spec)).collect())
    }

    /// Runs a single scenario and reports its outcome.
    #[must_use]
    pub fn run(&self, spec: &ScenarioSpec) -> ScenarioReport {
        let span = info_span!(
            "scenario",
            name = %spec.name,
            kind = %spec.kind,
            component = %spec.descriptor.component,
            stack = %spec.descriptor.stack,
        );
        let _entered = span.enter();
        let started = Instant::now();
        let mut progress = Progress::default();
        let result = match spec.kind {
            ScenarioKind::BasicTopic => self.run_basic_topic(spec, &mut progress),
            ScenarioKind::EnabledFlag => self.run_enabled_flag(spec, &mut progress),
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let (status, error) = match result {
            Ok(()) => {
                info!(duration_ms, "scenario passed");
                (ScenarioStatus::Passed, None)
            }
            Err(err) => {
                error!(duration_ms, error = %err, "scenario failed");
                (ScenarioStatus::Failed, Some(err.to_string()))
            }
        };
        ScenarioReport {
            name: spec.name.clone(),
            kind: spec.kind,
            component: spec.descriptor.component.to_string(),
            stack: spec.descriptor.stack.to_string(),
            status,
            checks: progress.checks,
            apply: progress.apply,
            drift: progress.drift,
            error,
            teardown_error: progress.teardown_error,
            duration_ms,
        }
    }

    /// Deploys the SNS topic, cross-checks it, checks drift, and tears down.
    fn run_basic_topic(
        &self,
        spec: &ScenarioSpec,
        progress: &mut Progress,
    ) -> Result<(), ScenarioError> {
        let deployment = Deployment::arm(self.driver, &spec.descriptor, self.settings.teardown);
        let body = self.basic_topic_steps(&deployment, spec, progress);
        settle(body, deployment.finish(), progress)
    }

    /// Scenario body for [`ScenarioKind::BasicTopic`].
    fn basic_topic_steps(
        &self,
        deployment: &Deployment<'_, dyn DeploymentDriver + 'a>,
        spec: &ScenarioSpec,
        progress: &mut Progress,
    ) -> Result<(), ScenarioError> {
        progress.apply = Some(deployment.apply().map_err(ScenarioError::Deploy)?);
        let outputs = deployment.outputs().map_err(|err| ScenarioError::Outputs(err.to_string()))?;
        let topic = TopicOutputs::read(&outputs)?;
        topic.check_consistency(&mut progress.checks, &self.settings.partition, &self.settings.region);

        let attributes = query_with_retry(self.client, &topic.arn, &self.settings.retry)
            .map_err(ScenarioError::Query)?;
        info!(arn = %topic.arn, count = attributes.len(), "live attributes fetched");
        topic.check_live(&mut progress.checks, &attributes);
        progress.checks.ensure_passed()?;
        check_drift(deployment, spec, progress)
    }

    /// Deploys the component disabled and requires that nothing is created.
    fn run_enabled_flag(
        &self,
        spec: &ScenarioSpec,
        progress: &mut Progress,
    ) -> Result<(), ScenarioError> {
        let descriptor = spec.descriptor.clone().with_var("enabled", Value::Bool(false));
        let deployment = Deployment::arm(self.driver, &descriptor, self.settings.teardown);
        let body = Self::enabled_flag_steps(&deployment, spec, progress);
        settle(body, deployment.finish(), progress)
    }

    /// Scenario body for [`ScenarioKind::EnabledFlag`].
    fn enabled_flag_steps(
        deployment: &Deployment<'_, dyn DeploymentDriver + 'a>,
        spec: &ScenarioSpec,
        progress: &mut Progress,
    ) -> Result<(), ScenarioError> {
        let summary = deployment.apply().map_err(ScenarioError::Deploy)?;
        progress.apply = Some(summary);
        progress.checks.expect_true(
            "disabled component creates no resources",
            summary.is_noop(),
            format!("apply reported {summary}"),
        );
        let outputs = deployment.outputs().map_err(|err| ScenarioError::Outputs(err.to_string()))?;
        let populated = outputs.populated_count();
        progress.checks.expect_true(
            "disabled component exports no values",
            populated == 0,
            format!("{populated} output(s) populated"),
        );
        if !summary.is_noop() {
            return Err(ScenarioError::ResourcesCreated(summary));
        }
        progress.checks.ensure_passed()?;
        check_drift(deployment, spec, progress)
    }
}

/// Re-plans when the scenario asks for it and fails on pending changes.
fn check_drift<D: DeploymentDriver + ?Sized>(
    deployment: &Deployment<'_, D>,
    spec: &ScenarioSpec,
    progress: &mut Progress,
) -> Result<(), ScenarioError> {
    if !spec.drift_check {
        return Ok(());
    }
    let outcome = deployment.plan().map_err(ScenarioError::Plan)?;
    progress.drift = Some(outcome);
    if let PlanOutcome::Changes(summary) = outcome {
        return Err(ScenarioError::Drift(summary));
    }
    info!("no drift detected");
    Ok(())
}

/// Combines a scenario body result with its teardown result.
fn settle(
    body: Result<(), ScenarioError>,
    teardown: Result<(), DriverError>,
    progress: &mut Progress,
) -> Result<(), ScenarioError> {
    match (body, teardown) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(err)) => Err(ScenarioError::Teardown(err)),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(teardown)) => {
            error!(error = %teardown, "teardown failed after scenario error");
            progress.teardown_error = Some(teardown.to_string());
            Err(err)
        }
    }
}
