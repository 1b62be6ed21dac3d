// crates/component-acceptance-config/src/lib.rs
// ============================================================================
// Module: Component Acceptance Config Library
// Description: Configuration model, validation, and environment overrides.
// Purpose: Single source of truth for component-acceptance.toml semantics.
// Dependencies: component-acceptance-core, serde, toml
// ============================================================================

//! ## Overview
//! `component-acceptance-config` defines the harness configuration: provider
//! and engine settings, retry bounds, teardown and logging switches, and the
//! scenario list. Validation is strict and fails closed; the built-in
//! defaults reproduce the SNS topic acceptance suite.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AtmosConfig;
pub use config::AwsConfig;
pub use config::ConfigError;
pub use config::HarnessConfig;
pub use config::LogFormat;
pub use config::LoggingConfig;
pub use config::RetryConfig;
pub use config::ScenarioConfig;
pub use config::TeardownConfig;
pub use env::EnvOverrides;
pub use env::HarnessEnv;
pub use env::read_env_strict;
