// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for live acceptance suites.
// Purpose: Provide harness wiring and artifact utilities.
// Dependencies: system-tests, component-acceptance-*
// ============================================================================

//! ## Overview
//! Shared helpers for live acceptance suites.
//! Invariants:
//! - Every deployed component is torn down unless teardown is skipped.
//! - Every test writes a summary, even when it panics.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod artifacts;
pub mod harness;
