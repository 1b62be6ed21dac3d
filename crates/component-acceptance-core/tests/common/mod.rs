// crates/component-acceptance-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Scripted drivers, query clients, and fixtures for core tests.
// Purpose: Exercise scenarios without a deployment engine or provider API.
// Dependencies: component-acceptance-core, serde_json
// ============================================================================

//! ## Overview
//! Provides a recording [`FakeDriver`], a scripted [`FakeClient`], and sample
//! SNS topic outputs and live attributes that agree with each other.

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
    dead_code,
    reason = "Test-only helpers shared across several test binaries."
)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::VecDeque;

use component_acceptance_core::ApplySummary;
use component_acceptance_core::ComponentDescriptor;
use component_acceptance_core::ComponentId;
use component_acceptance_core::DeploymentDriver;
use component_acceptance_core::DriverError;
use component_acceptance_core::OutputSet;
use component_acceptance_core::PlanOutcome;
use component_acceptance_core::QueryError;
use component_acceptance_core::ResourceAttributes;
use component_acceptance_core::ResourceQueryClient;
use component_acceptance_core::StackName;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Account that owns the sample topic.
pub const OWNER: &str = "123456789012";
/// Sample topic name.
pub const TOPIC: &str = "eg-default-test-sns-topic";
/// Region the sample topic lives in.
pub const REGION: &str = "us-east-2";

/// Returns the sample topic ARN.
pub fn topic_arn() -> String {
    format!("arn:aws:sns:{REGION}:{OWNER}:{TOPIC}")
}

/// Builds a descriptor for the given component and stack.
pub fn descriptor(component: &str, stack: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(ComponentId::new(component).unwrap(), StackName::new(stack).unwrap())
}

/// Returns the sample topic record as exported by the component.
pub fn topic_record() -> Value {
    json!({
        "name": TOPIC,
        "id": topic_arn(),
        "owner": OWNER,
        "arn": topic_arn(),
        "display_name": TOPIC,
        "policy": "{\"Version\":\"2012-10-17\"}",
        "delivery_policy": "",
        "archive_policy": null,
        "beginning_archive_time": "",
        "kms_master_key_id": "alias/aws/sns",
        "fifo_topic": false,
        "content_based_deduplication": false,
        "tracing_config": "PassThrough",
        "signature_version": 1,
        "name_prefix": "",
        "tags": { "Name": TOPIC },
        "tags_all": { "Name": TOPIC, "Environment": "test" },
        "application_failure_feedback_role_arn": "",
        "application_success_feedback_role_arn": "",
        "application_success_feedback_sample_rate": 0,
        "firehose_failure_feedback_role_arn": "",
        "firehose_success_feedback_role_arn": "",
        "firehose_success_feedback_sample_rate": 0,
        "http_failure_feedback_role_arn": "",
        "http_success_feedback_role_arn": "",
        "http_success_feedback_sample_rate": 0,
        "lambda_failure_feedback_role_arn": "",
        "lambda_success_feedback_role_arn": "",
        "lambda_success_feedback_sample_rate": 0,
        "sqs_failure_feedback_role_arn": "",
        "sqs_success_feedback_role_arn": "",
        "sqs_success_feedback_sample_rate": 0
    })
}

/// Returns the sample outputs with the given record.
pub fn topic_outputs_with(record: Value) -> OutputSet {
    let mut values = BTreeMap::new();
    values.insert("sns_topic_name".to_string(), record);
    values.insert("sns_topic_id".to_string(), json!(TOPIC));
    values.insert("sns_topic_owner".to_string(), json!(OWNER));
    values.insert("sns_topic_arn".to_string(), json!(topic_arn()));
    values.insert("sns_topic_subscriptions".to_string(), json!({}));
    OutputSet::from_values(values)
}

/// Returns consistent sample outputs.
pub fn topic_outputs() -> OutputSet {
    topic_outputs_with(topic_record())
}

/// Returns live attributes that agree with [`topic_outputs`].
pub fn live_attributes() -> ResourceAttributes {
    [
        ("DisplayName", TOPIC.to_string()),
        ("Owner", OWNER.to_string()),
        ("TopicArn", topic_arn()),
        ("Policy", "{\"Version\":\"2012-10-17\"}".to_string()),
        ("SubscriptionsConfirmed", "0".to_string()),
        ("ApplicationSuccessFeedbackSampleRate", "0".to_string()),
        ("FirehoseSuccessFeedbackSampleRate", "0".to_string()),
        ("LambdaSuccessFeedbackSampleRate", "0".to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

// ============================================================================
// SECTION: Fake Driver
// ============================================================================

/// Recording deployment driver with scripted results.
pub struct FakeDriver {
    /// Calls made, as `deploy`, `outputs`, `destroy`, `plan`.
    pub calls: RefCell<Vec<String>>,
    /// Vars passed to each deploy call.
    pub deployed_vars: RefCell<Vec<BTreeMap<String, Value>>>,
    /// Result returned by deploy.
    pub deploy_result: Result<ApplySummary, DriverError>,
    /// Result returned by outputs.
    pub outputs_result: Result<OutputSet, DriverError>,
    /// Result returned by destroy.
    pub destroy_result: Result<(), DriverError>,
    /// Result returned by plan.
    pub plan_result: Result<PlanOutcome, DriverError>,
}

impl FakeDriver {
    /// Driver that deploys one resource and returns `outputs`.
    pub fn with_outputs(outputs: OutputSet) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            deployed_vars: RefCell::new(Vec::new()),
            deploy_result: Ok(ApplySummary {
                added: 1,
                changed: 0,
                destroyed: 0,
            }),
            outputs_result: Ok(outputs),
            destroy_result: Ok(()),
            plan_result: Ok(PlanOutcome::NoChanges),
        }
    }

    /// Driver for a disabled component: no resources, no outputs.
    pub fn disabled() -> Self {
        let mut driver = Self::with_outputs(OutputSet::default());
        driver.deploy_result = Ok(ApplySummary::default());
        driver
    }

    /// Returns the recorded call names.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Returns how many times `name` was called.
    pub fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| call.as_str() == name).count()
    }

    /// Records a call.
    fn record(&self, name: &str) {
        self.calls.borrow_mut().push(name.to_string());
    }
}

/// Returns a command failure for tests.
pub fn command_failed(command: &str) -> DriverError {
    DriverError::CommandFailed {
        command: command.to_string(),
        status: "code 1".to_string(),
        stderr: "boom".to_string(),
    }
}

impl DeploymentDriver for FakeDriver {
    fn deploy(&self, descriptor: &ComponentDescriptor) -> Result<ApplySummary, DriverError> {
        self.record("deploy");
        self.deployed_vars.borrow_mut().push(descriptor.vars.clone());
        self.deploy_result.clone()
    }

    fn outputs(&self, _descriptor: &ComponentDescriptor) -> Result<OutputSet, DriverError> {
        self.record("outputs");
        self.outputs_result.clone()
    }

    fn destroy(&self, _descriptor: &ComponentDescriptor) -> Result<(), DriverError> {
        self.record("destroy");
        self.destroy_result.clone()
    }

    fn plan(&self, _descriptor: &ComponentDescriptor) -> Result<PlanOutcome, DriverError> {
        self.record("plan");
        self.plan_result.clone()
    }
}

// ============================================================================
// SECTION: Fake Client
// ============================================================================

/// Query client that replays scripted results, repeating the last one.
pub struct FakeClient {
    /// Remaining scripted results.
    results: RefCell<VecDeque<Result<ResourceAttributes, QueryError>>>,
    /// ARNs queried, in order.
    pub queried: RefCell<Vec<String>>,
}

impl FakeClient {
    /// Client that replays `results` in order.
    pub fn scripted(results: Vec<Result<ResourceAttributes, QueryError>>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            queried: RefCell::new(Vec::new()),
        }
    }

    /// Client that always returns `attributes`.
    pub fn returning(attributes: ResourceAttributes) -> Self {
        Self::scripted(vec![Ok(attributes)])
    }

    /// Returns the number of queries made.
    pub fn attempts(&self) -> usize {
        self.queried.borrow().len()
    }
}

impl ResourceQueryClient for FakeClient {
    fn resource_attributes(&self, arn: &str) -> Result<ResourceAttributes, QueryError> {
        self.queried.borrow_mut().push(arn.to_string());
        let mut results = self.results.borrow_mut();
        if results.len() > 1 {
            return results.pop_front().unwrap();
        }
        results.front().cloned().unwrap_or_else(|| Err(QueryError::Service("no script".into())))
    }
}
