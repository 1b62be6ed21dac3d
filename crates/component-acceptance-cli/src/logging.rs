// crates/component-acceptance-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Tracing subscriber installation for the harness binary.
// Purpose: Route structured harness events to stderr.
// Dependencies: component-acceptance-config, tracing-subscriber
// ============================================================================

//! ## Overview
//! Events go to stderr so stdout carries only the run summary. `RUST_LOG`
//! wins over the configured level when it parses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use component_acceptance_config::LogFormat;
use component_acceptance_config::LoggingConfig;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Resolves the event filter from `RUST_LOG` or the configured level.
///
/// # Errors
///
/// Returns a message when the configured level is not a valid directive.
pub(crate) fn resolve_filter(config: &LoggingConfig) -> Result<EnvFilter, String> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|err| format!("invalid logging.level {}: {err}", config.level))
}

// ============================================================================
// SECTION: Install
// ============================================================================

/// Installs the global subscriber.
///
/// A subscriber that is already installed is left in place.
///
/// # Errors
///
/// Returns a message when the filter cannot be built.
pub(crate) fn init(config: &LoggingConfig) -> Result<(), String> {
    let filter = resolve_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = match config.format {
        LogFormat::Pretty => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
