// crates/component-acceptance-core/src/report.rs
// ============================================================================
// Module: Scenario Reports
// Description: Serializable results of scenario runs.
// Purpose: Surface per-check outcomes, summaries, and errors to callers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ScenarioReport`] is produced for every scenario, pass or fail, and
//! carries whatever was observed before the scenario ended. A [`RunReport`]
//! aggregates scenario reports for a whole invocation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Serialize;

use crate::checks::CheckReport;
use crate::driver::ApplySummary;
use crate::driver::PlanOutcome;
use crate::scenario::ScenarioKind;

// ============================================================================
// SECTION: Scenario Report
// ============================================================================

/// Final status of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Every step and check succeeded.
    Passed,
    /// A step failed or a check did not hold.
    Failed,
}

impl ScenarioStatus {
    /// Returns the lowercase status label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

/// Result of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Scenario kind.
    pub kind: ScenarioKind,
    /// Component identifier.
    pub component: String,
    /// Stack name.
    pub stack: String,
    /// Final status.
    pub status: ScenarioStatus,
    /// Recorded checks.
    pub checks: CheckReport,
    /// Apply summary, when deploy completed.
    pub apply: Option<ApplySummary>,
    /// Drift check outcome, when drift was checked.
    pub drift: Option<PlanOutcome>,
    /// Error that ended the scenario, if any.
    pub error: Option<String>,
    /// Teardown failure reported alongside an earlier error.
    pub teardown_error: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioReport {
    /// Returns true when the scenario passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

// ============================================================================
// SECTION: Run Report
// ============================================================================

/// Aggregate result of a harness invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Scenario reports in execution order.
    pub scenarios: Vec<ScenarioReport>,
    /// Number of passed scenarios.
    pub passed: usize,
    /// Number of failed scenarios.
    pub failed: usize,
}

impl RunReport {
    /// Builds a run report from scenario reports.
    #[must_use]
    pub fn from_reports(scenarios: Vec<ScenarioReport>) -> Self {
        let passed = scenarios.iter().filter(|report| report.passed()).count();
        let failed = scenarios.len() - passed;
        Self {
            scenarios,
            passed,
            failed,
        }
    }

    /// Returns true when every scenario passed.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.failed == 0
    }

    /// Renders a human-readable summary.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for report in &self.scenarios {
            let _ = writeln!(
                out,
                "{} [{} {}@{}] {} ({} ms)",
                report.status.as_str().to_uppercase(),
                report.kind,
                report.component,
                report.stack,
                report.name,
                report.duration_ms
            );
            for failure in report.checks.failures() {
                let _ = writeln!(out, "  - {failure}");
            }
            if let Some(error) = &report.error {
                let _ = writeln!(out, "  error: {error}");
            }
            if let Some(error) = &report.teardown_error {
                let _ = writeln!(out, "  teardown: {error}");
            }
        }
        let _ = writeln!(out, "{} passed, {} failed", self.passed, self.failed);
        out
    }
}
