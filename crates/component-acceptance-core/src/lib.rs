// crates/component-acceptance-core/src/lib.rs
// ============================================================================
// Module: Component Acceptance Core Library
// Description: Domain model and scenario runners for component acceptance tests.
// Purpose: Deploy a component, cross-check outputs against live state, tear down.
// Dependencies: serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! `component-acceptance-core` defines the contracts the harness consumes
//! ([`DeploymentDriver`] and [`ResourceQueryClient`]), the data it observes
//! ([`OutputSet`], [`ResourceAttributes`], [`SnsTopicRecord`]), and the
//! [`ScenarioRunner`] that sequences deploy, output capture, live query,
//! comparison, drift check, and teardown.
//! Invariants:
//! - Teardown runs on every exit path unless [`TeardownPolicy::Skip`] is set.
//! - Assertion failures are collected, never short-circuited.
//! - Drift is checked only after every assertion passed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod arn;
pub mod checks;
pub mod descriptor;
pub mod driver;
pub mod outputs;
pub mod query;
pub mod report;
pub mod scenario;
pub mod topic;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use arn::Arn;
pub use arn::ArnError;
pub use checks::CheckOutcome;
pub use checks::CheckReport;
pub use checks::CheckStatus;
pub use descriptor::ComponentDescriptor;
pub use descriptor::ComponentId;
pub use descriptor::DescriptorError;
pub use descriptor::StackName;
pub use driver::ApplySummary;
pub use driver::Deployment;
pub use driver::DeploymentDriver;
pub use driver::DriverError;
pub use driver::PlanOutcome;
pub use driver::PlanSummary;
pub use driver::TeardownPolicy;
pub use outputs::OutputError;
pub use outputs::OutputSet;
pub use query::QueryError;
pub use query::ResourceAttributes;
pub use query::ResourceQueryClient;
pub use query::RetryPolicy;
pub use query::query_with_retry;
pub use report::RunReport;
pub use report::ScenarioReport;
pub use report::ScenarioStatus;
pub use scenario::HarnessSettings;
pub use scenario::ScenarioError;
pub use scenario::ScenarioKind;
pub use scenario::ScenarioRunner;
pub use scenario::ScenarioSpec;
pub use topic::FeedbackChannel;
pub use topic::SnsTopicRecord;
pub use topic::outputs as topic_outputs;
