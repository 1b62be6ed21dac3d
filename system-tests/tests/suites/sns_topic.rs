// system-tests/tests/suites/sns_topic.rs
// ============================================================================
// Module: SNS Topic Acceptance Tests
// Description: Live deploy, verify, drift, and teardown of the topic component.
// Purpose: Validate the basic topic and the enabled flag end to end.
// Dependencies: system-tests helpers, component-acceptance-core
// ============================================================================

//! Live acceptance coverage for `sns-topic/basic` and `sns-topic/disabled`.

use component_acceptance_core::PlanOutcome;
use component_acceptance_core::ScenarioReport;
use helpers::artifacts::TestReporter;
use helpers::harness::load_config;
use helpers::harness::run_scenario;

use crate::helpers;

/// Returns the notes recorded for a scenario report.
fn report_notes(report: &ScenarioReport) -> Vec<String> {
    let mut notes: Vec<String> =
        report.checks.failures().map(|failure| format!("check failed: {failure}")).collect();
    if let Some(error) = &report.error {
        notes.push(format!("error: {error}"));
    }
    if let Some(error) = &report.teardown_error {
        notes.push(format!("teardown: {error}"));
    }
    notes
}

/// Artifacts attached to every scenario summary.
fn report_artifacts() -> Vec<String> {
    vec!["scenario_report.json".to_string()]
}

/// Runs `scenario` and records its report as an artifact.
fn run_and_record(
    reporter: &mut TestReporter,
    scenario: &str,
) -> Result<ScenarioReport, Box<dyn std::error::Error>> {
    let config = load_config()?;
    let report = run_scenario(&config, scenario)?;
    reporter.artifacts().write_json("scenario_report.json", &report)?;
    Ok(report)
}

#[test]
fn basic_topic_matches_live_state() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("basic_topic_matches_live_state")?;
    let report = run_and_record(&mut reporter, "basic")?;
    let notes = report_notes(&report);

    if !report.passed() {
        let message = format!("basic scenario failed: {}", notes.join("; "));
        return Err(reporter.fail(message, notes, report_artifacts()));
    }
    if report.checks.len() < 13 {
        let message = format!("expected at least 13 checks, got {}", report.checks.len());
        return Err(reporter.fail(message.clone(), vec![message], report_artifacts()));
    }
    if report.drift != Some(PlanOutcome::NoChanges) {
        let message = "expected a clean re-plan after deploy".to_string();
        return Err(reporter.fail(message.clone(), vec![message], report_artifacts()));
    }

    reporter.finish(
        "pass",
        vec![format!("{} checks passed", report.checks.len())],
        report_artifacts(),
    )?;
    Ok(())
}

#[test]
fn enabled_flag_creates_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("enabled_flag_creates_nothing")?;
    let report = run_and_record(&mut reporter, "enabled-flag")?;
    let notes = report_notes(&report);

    if !report.passed() {
        let message = format!("enabled-flag scenario failed: {}", notes.join("; "));
        return Err(reporter.fail(message, notes, report_artifacts()));
    }
    if report.apply.is_some_and(|apply| apply.added > 0) {
        let message = "disabled component created resources".to_string();
        return Err(reporter.fail(message.clone(), vec![message], report_artifacts()));
    }

    reporter.finish(
        "pass",
        vec!["disabled component created no resources".to_string()],
        report_artifacts(),
    )?;
    Ok(())
}

#[test]
fn unmet_expectation_writes_fail_summary() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("unmet_expectation_writes_fail_summary")?;
    let root = reporter.artifacts().root().to_path_buf();
    let err = reporter.fail(
        "expected at least 13 checks, got 4".to_string(),
        vec!["expected at least 13 checks, got 4".to_string()],
        Vec::new(),
    );
    drop(reporter);

    let summary = std::fs::read_to_string(root.join("summary.json"))?;
    if !summary.contains("\"status\":\"fail\"") {
        return Err(format!("summary not marked as failed: {summary}").into());
    }
    if err.to_string() != "expected at least 13 checks, got 4" {
        return Err(format!("unexpected error: {err}").into());
    }
    Ok(())
}
