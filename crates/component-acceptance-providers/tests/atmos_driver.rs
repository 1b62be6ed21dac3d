// crates/component-acceptance-providers/tests/atmos_driver.rs
// ============================================================================
// Module: Atmos Driver Tests
// Description: Verifies command construction and exit-code handling.
// ============================================================================
//! ## Overview
//! Drives [`AtmosDriver`] with a scripted command runner and inspects the
//! recorded invocations.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::path::PathBuf;

use component_acceptance_core::ApplySummary;
use component_acceptance_core::ComponentDescriptor;
use component_acceptance_core::ComponentId;
use component_acceptance_core::DeploymentDriver;
use component_acceptance_core::DriverError;
use component_acceptance_core::PlanOutcome;
use component_acceptance_core::PlanSummary;
use component_acceptance_core::StackName;
use component_acceptance_providers::AtmosDriver;
use component_acceptance_providers::CommandOutput;
use component_acceptance_providers::CommandRunner;
use component_acceptance_providers::CommandSpec;
use serde_json::json;

// ============================================================================
// SECTION: Scripted Runner
// ============================================================================

#[derive(Default)]
struct ScriptedRunner {
    outputs: RefCell<VecDeque<Result<CommandOutput, DriverError>>>,
    seen: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    fn new(outputs: Vec<Result<CommandOutput, DriverError>>) -> Self {
        Self {
            outputs: RefCell::new(outputs.into()),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn last_args(&self) -> Vec<String> {
        self.seen.borrow().last().unwrap().args.clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput, DriverError> {
        self.seen.borrow_mut().push(command.clone());
        self.outputs.borrow_mut().pop_front().expect("unexpected command")
    }
}

fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(
        ComponentId::new("sns-topic/basic").unwrap(),
        StackName::new("default-test").unwrap(),
    )
}

fn driver(outputs: Vec<Result<CommandOutput, DriverError>>) -> AtmosDriver<ScriptedRunner> {
    AtmosDriver::with_runner("atmos", ScriptedRunner::new(outputs))
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

// ============================================================================
// SECTION: Deploy
// ============================================================================

#[test]
fn deploy_builds_atmos_invocation_and_parses_summary() {
    let driver = driver(vec![Ok(CommandOutput::success(
        "aws_sns_topic.this[0]: Creation complete after 1s\n\nApply complete! Resources: 1 added, 0 changed, 0 destroyed.\n",
    ))]);
    let summary = driver.deploy(&descriptor()).unwrap();
    assert_eq!(summary, ApplySummary {
        added: 1,
        changed: 0,
        destroyed: 0,
    });
    assert_eq!(
        driver.runner().last_args(),
        strings(&["terraform", "deploy", "sns-topic/basic", "-s", "default-test", "--", "-auto-approve"])
    );
}

#[test]
fn vars_are_forwarded_to_deploy_but_not_output() {
    let descriptor = descriptor()
        .with_var("enabled", json!(false))
        .with_var("name", json!("alerts"))
        .with_var("tags", json!({ "Team": "platform" }));
    let driver = driver(vec![
        Ok(CommandOutput::success("Apply complete! Resources: 0 added, 0 changed, 0 destroyed.")),
        Ok(CommandOutput::success("{}")),
    ]);
    driver.deploy(&descriptor).unwrap();
    let deploy_args = driver.runner().last_args();
    assert_eq!(&deploy_args[7 ..], strings(&[
        "-var",
        "enabled=false",
        "-var",
        "name=alerts",
        "-var",
        "tags={\"Team\":\"platform\"}",
    ]));

    driver.outputs(&descriptor).unwrap();
    assert_eq!(
        driver.runner().last_args(),
        strings(&["terraform", "output", "sns-topic/basic", "-s", "default-test", "--", "-json"])
    );
}

#[test]
fn base_path_and_env_are_applied() {
    let mut env = BTreeMap::new();
    env.insert("ATMOS_CLI_CONFIG_PATH".to_string(), "fixtures".to_string());
    let driver = driver(vec![Ok(CommandOutput::success(""))])
        .base_path("fixtures")
        .envs(env.clone());
    driver.destroy(&descriptor()).unwrap();
    let seen = driver.runner().seen.borrow();
    assert_eq!(seen[0].current_dir, Some(PathBuf::from("fixtures")));
    assert_eq!(seen[0].env, env);
    assert_eq!(seen[0].program, "atmos");
}

#[test]
fn non_zero_exit_is_command_failed() {
    let driver = driver(vec![Ok(exit(1, "", "  Error: no credentials  \n"))]);
    match driver.deploy(&descriptor()) {
        Err(DriverError::CommandFailed {
            command,
            status,
            stderr,
        }) => {
            assert!(command.starts_with("atmos terraform deploy sns-topic/basic"));
            assert_eq!(status, "code 1");
            assert_eq!(stderr, "Error: no credentials");
        }
        other => panic!("expected command failure, got {other:?}"),
    }
}

#[test]
fn killed_process_reports_signal() {
    let driver = driver(vec![Ok(CommandOutput {
        code: None,
        stdout: String::new(),
        stderr: String::new(),
    })]);
    match driver.destroy(&descriptor()) {
        Err(DriverError::CommandFailed {
            status, ..
        }) => assert_eq!(status, "signal"),
        other => panic!("expected command failure, got {other:?}"),
    }
}

#[test]
fn spawn_errors_propagate() {
    let driver = driver(vec![Err(DriverError::Spawn {
        command: "atmos".to_string(),
        reason: "No such file or directory".to_string(),
    })]);
    assert!(matches!(driver.deploy(&descriptor()), Err(DriverError::Spawn { .. })));
}

#[test]
fn deploy_without_summary_is_an_output_error() {
    let driver = driver(vec![Ok(CommandOutput::success("something unexpected"))]);
    assert!(matches!(driver.deploy(&descriptor()), Err(DriverError::Output(_))));
}

// ============================================================================
// SECTION: Outputs
// ============================================================================

#[test]
fn outputs_skip_wrapper_preamble() {
    let stdout = "Found stack config for component 'sns-topic/basic'\n{\n  \"sns_topic_id\": { \"sensitive\": false, \"type\": \"string\", \"value\": \"t\" }\n}\n";
    let driver = driver(vec![Ok(CommandOutput::success(stdout))]);
    let outputs = driver.outputs(&descriptor()).unwrap();
    assert_eq!(outputs.string("sns_topic_id").unwrap(), "t");
}

#[test]
fn outputs_without_json_fail() {
    let driver = driver(vec![Ok(CommandOutput::success("No outputs found"))]);
    assert!(matches!(driver.outputs(&descriptor()), Err(DriverError::Output(_))));
}

// ============================================================================
// SECTION: Plan
// ============================================================================

#[test]
fn plan_exit_zero_means_no_changes() {
    let driver = driver(vec![Ok(CommandOutput::success("No changes. Your infrastructure matches the configuration."))]);
    assert_eq!(driver.plan(&descriptor()).unwrap(), PlanOutcome::NoChanges);
    assert_eq!(
        driver.runner().last_args(),
        strings(&[
            "terraform",
            "plan",
            "sns-topic/basic",
            "-s",
            "default-test",
            "--",
            "-detailed-exitcode",
            "-input=false",
        ])
    );
}

#[test]
fn plan_exit_two_reports_changes() {
    let driver = driver(vec![Ok(exit(2, "Plan: 0 to add, 1 to change, 0 to destroy.\n", ""))]);
    assert_eq!(
        driver.plan(&descriptor()).unwrap(),
        PlanOutcome::Changes(PlanSummary {
            add: 0,
            change: 1,
            destroy: 0,
        })
    );
}

#[test]
fn plan_exit_one_is_an_error() {
    let driver = driver(vec![Ok(exit(1, "", "Error: Invalid reference"))]);
    assert!(matches!(driver.plan(&descriptor()), Err(DriverError::CommandFailed { .. })));
}
