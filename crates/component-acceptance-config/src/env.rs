// crates/component-acceptance-config/src/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed overrides for harness configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8, empty values, and unrecognized booleans
//! fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys read by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Config file path used when no path is given explicitly.
    Config,
    /// Region override.
    AwsRegion,
    /// Skip teardown (`true`/`false` or `1`/`0`).
    SkipTeardown,
    /// Atmos binary override.
    AtmosBin,
}

impl HarnessEnv {
    /// Every key, in declaration order.
    pub const ALL: [Self; 4] = [Self::Config, Self::AwsRegion, Self::SkipTeardown, Self::AtmosBin];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "COMPONENT_ACCEPTANCE_CONFIG",
            Self::AwsRegion => "COMPONENT_ACCEPTANCE_AWS_REGION",
            Self::SkipTeardown => "COMPONENT_ACCEPTANCE_SKIP_TEARDOWN",
            Self::AtmosBin => "COMPONENT_ACCEPTANCE_ATMOS_BIN",
        }
    }
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Overrides read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvOverrides {
    /// Config file path.
    pub config_path: Option<PathBuf>,
    /// Region replacing `aws.region`.
    pub region: Option<String>,
    /// Value replacing `teardown.skip`.
    pub skip_teardown: Option<bool>,
    /// Binary replacing `atmos.binary`.
    pub atmos_binary: Option<String>,
}

impl EnvOverrides {
    /// Loads overrides from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is not valid UTF-8, is
    /// empty, or is not a recognized boolean literal.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = read_env_nonempty(HarnessEnv::Config.as_str())?.map(PathBuf::from);
        let region = read_env_nonempty(HarnessEnv::AwsRegion.as_str())?
            .map(|value| value.trim().to_string());
        let skip_teardown = read_env_nonempty(HarnessEnv::SkipTeardown.as_str())?
            .map(|value| parse_bool(HarnessEnv::SkipTeardown.as_str(), &value))
            .transpose()?;
        let atmos_binary = read_env_nonempty(HarnessEnv::AtmosBin.as_str())?;
        Ok(Self {
            config_path,
            region,
            skip_teardown,
            atmos_binary,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a boolean literal (`true`/`false` or `1`/`0`).
pub(crate) fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(ConfigError::Invalid(format!("{name} must be 1, 0, true, or false")))
}
