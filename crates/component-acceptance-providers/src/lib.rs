// crates/component-acceptance-providers/src/lib.rs
// ============================================================================
// Module: Component Acceptance Providers Library
// Description: Concrete deployment driver and provider query client.
// Purpose: Connect the harness to Atmos and the AWS SNS API.
// Dependencies: component-acceptance-core, aws-config, aws-sdk-sns, tokio
// ============================================================================

//! ## Overview
//! `component-acceptance-providers` implements the contracts consumed by the
//! scenario runner: [`AtmosDriver`] deploys components through the Atmos CLI
//! and [`SnsTopicClient`] reads live topic attributes. Process execution sits
//! behind [`CommandRunner`] so the driver can be exercised without Atmos.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod atmos;
pub mod command;
pub mod sns;
pub mod terraform;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use atmos::AtmosDriver;
pub use command::CommandOutput;
pub use command::CommandRunner;
pub use command::CommandSpec;
pub use command::ProcessRunner;
pub use sns::SnsClientConfig;
pub use sns::SnsTopicClient;
pub use terraform::format_var;
pub use terraform::parse_apply_summary;
pub use terraform::parse_output_json;
pub use terraform::parse_plan_summary;
