// system-tests/src/lib.rs
// ============================================================================
// Module: Component Acceptance System Tests Library
// Description: Shared configuration for live acceptance suites.
// Purpose: Provide typed access to system-test settings.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the live acceptance suites
//! in `system-tests/tests`. The suites deploy real components through Atmos
//! and need provider credentials; they only build with the `system-tests`
//! feature.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
