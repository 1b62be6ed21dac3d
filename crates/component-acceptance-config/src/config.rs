// crates/component-acceptance-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Configuration loading and validation for the acceptance harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: component-acceptance-core, serde, serde_json, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file when a path is given (directly or
//! through `COMPONENT_ACCEPTANCE_CONFIG`); otherwise the built-in defaults
//! describe the `basic` and `enabled-flag` scenarios for the SNS topic
//! component. Environment overrides are applied before validation, and any
//! invalid value fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use component_acceptance_core::ComponentDescriptor;
use component_acceptance_core::ComponentId;
use component_acceptance_core::HarnessSettings;
use component_acceptance_core::RetryPolicy;
use component_acceptance_core::ScenarioKind;
use component_acceptance_core::ScenarioSpec;
use component_acceptance_core::StackName;
use component_acceptance_core::TeardownPolicy;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::env::EnvOverrides;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum retry attempts accepted from configuration.
pub(crate) const MAX_RETRY_ATTEMPTS: u32 = 20;
/// Maximum retry delay accepted from configuration, in milliseconds.
pub(crate) const MAX_RETRY_DELAY_MS: u64 = 60_000;
/// Maximum number of configured scenarios.
pub(crate) const MAX_SCENARIOS: usize = 64;
/// Default provider region.
pub(crate) const DEFAULT_REGION: &str = "us-east-2";
/// Default provider partition.
pub(crate) const DEFAULT_PARTITION: &str = "aws";
/// Default Atmos binary.
pub(crate) const DEFAULT_ATMOS_BINARY: &str = "atmos";
/// Stack used by the default scenarios.
pub(crate) const DEFAULT_STACK: &str = "default-test";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Acceptance harness configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Provider settings.
    #[serde(default)]
    pub aws: AwsConfig,
    /// Deployment engine settings.
    #[serde(default)]
    pub atmos: AtmosConfig,
    /// Live query retry settings.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Teardown settings.
    #[serde(default)]
    pub teardown: TeardownConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Scenarios, run in declaration order.
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<ScenarioConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            aws: AwsConfig::default(),
            atmos: AtmosConfig::default(),
            retry: RetryConfig::default(),
            teardown: TeardownConfig::default(),
            logging: LoggingConfig::default(),
            scenarios: default_scenarios(),
        }
    }
}

impl HarnessConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// The explicit `path` wins, then `COMPONENT_ACCEPTANCE_CONFIG`, then the
    /// built-in defaults. Environment overrides are applied before validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides, or validation fail.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let overrides = EnvOverrides::load()?;
        let resolved = path.map(Path::to_path_buf).or_else(|| overrides.config_path.clone());
        let mut config = match resolved {
            Some(path) => Self::read_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(&overrides);
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration from TOML text without overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file with size and encoding limits.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies environment overrides on top of file or default values.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) {
        if let Some(region) = &overrides.region {
            self.aws.region.clone_from(region);
        }
        if let Some(skip) = overrides.skip_teardown {
            self.teardown.skip = skip;
        }
        if let Some(binary) = &overrides.atmos_binary {
            self.atmos.binary.clone_from(binary);
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.aws.validate()?;
        self.atmos.validate()?;
        self.retry.validate()?;
        self.logging.validate()?;
        if self.scenarios.is_empty() {
            return Err(ConfigError::Invalid("at least one scenario must be configured".to_string()));
        }
        if self.scenarios.len() > MAX_SCENARIOS {
            return Err(ConfigError::Invalid(format!(
                "at most {MAX_SCENARIOS} scenarios may be configured"
            )));
        }
        let mut names = BTreeSet::new();
        for scenario in &self.scenarios {
            scenario.validate()?;
            if !names.insert(scenario.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate scenario name: {}",
                    scenario.name
                )));
            }
        }
        Ok(())
    }

    /// Returns settings shared by every scenario.
    #[must_use]
    pub fn settings(&self) -> HarnessSettings {
        HarnessSettings {
            region: self.aws.region.clone(),
            partition: self.aws.partition.clone(),
            retry: self.retry.policy(),
            teardown: if self.teardown.skip { TeardownPolicy::Skip } else { TeardownPolicy::Always },
        }
    }

    /// Returns every configured scenario as a runnable spec.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a component or stack is invalid.
    pub fn scenario_specs(&self) -> Result<Vec<ScenarioSpec>, ConfigError> {
        self.scenarios.iter().map(ScenarioConfig::to_spec).collect()
    }

    /// Returns the named scenarios, in configuration order.
    ///
    /// An empty selection returns every scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a name is not configured.
    pub fn select(&self, names: &[String]) -> Result<Vec<ScenarioSpec>, ConfigError> {
        if names.is_empty() {
            return self.scenario_specs();
        }
        if let Some(unknown) =
            names.iter().find(|name| !self.scenarios.iter().any(|s| &s.name == *name))
        {
            return Err(ConfigError::Invalid(format!("unknown scenario: {unknown}")));
        }
        self.scenarios
            .iter()
            .filter(|scenario| names.contains(&scenario.name))
            .map(ScenarioConfig::to_spec)
            .collect()
    }
}

/// Provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region the component deploys into and the client queries.
    #[serde(default = "default_region")]
    pub region: String,
    /// Partition used when deriving ARNs.
    #[serde(default = "default_partition")]
    pub partition: String,
    /// Optional named credentials profile.
    #[serde(default)]
    pub profile: Option<String>,
    /// Optional endpoint override (for example a local emulator).
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            partition: default_partition(),
            profile: None,
            endpoint_url: None,
        }
    }
}

impl AwsConfig {
    /// Validates provider settings.
    fn validate(&self) -> Result<(), ConfigError> {
        require_token("aws.region", &self.region)?;
        require_token("aws.partition", &self.partition)?;
        if let Some(profile) = &self.profile {
            require_token("aws.profile", profile)?;
        }
        if let Some(endpoint) = &self.endpoint_url
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(
                "aws.endpoint_url must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }
}

/// Deployment engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtmosConfig {
    /// Atmos executable name or path.
    #[serde(default = "default_atmos_binary")]
    pub binary: String,
    /// Working directory Atmos runs in.
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    /// Extra environment for Atmos (for example `ATMOS_CLI_CONFIG_PATH`).
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for AtmosConfig {
    fn default() -> Self {
        Self {
            binary: default_atmos_binary(),
            base_path: None,
            env: BTreeMap::new(),
        }
    }
}

impl AtmosConfig {
    /// Validates engine settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.binary.trim().is_empty() {
            return Err(ConfigError::Invalid("atmos.binary must be set".to_string()));
        }
        if let Some(base) = &self.base_path
            && base.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid("atmos.base_path must not be empty".to_string()));
        }
        for key in self.env.keys() {
            if key.is_empty() || key.contains('=') || key.contains('\0') {
                return Err(ConfigError::Invalid(format!("atmos.env has invalid name: \"{key}\"")));
            }
        }
        Ok(())
    }
}

/// Live query retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Validates retry bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 || self.max_attempts > MAX_RETRY_ATTEMPTS {
            return Err(ConfigError::Invalid(format!(
                "retry.max_attempts must be between 1 and {MAX_RETRY_ATTEMPTS}"
            )));
        }
        if self.max_delay_ms > MAX_RETRY_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "retry.max_delay_ms must be at most {MAX_RETRY_DELAY_MS}"
            )));
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(ConfigError::Invalid(
                "retry.max_delay_ms must be >= retry.initial_delay_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the equivalent retry policy.
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }
}

/// Teardown settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownConfig {
    /// Leave deployed components in place after each scenario.
    #[serde(default)]
    pub skip: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Validates logging settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.level must be set".to_string()));
        }
        Ok(())
    }
}

/// One configured scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Unique scenario name.
    pub name: String,
    /// Scenario behavior.
    pub kind: ScenarioKind,
    /// Component identifier, e.g. `sns-topic/basic`.
    pub component: String,
    /// Stack name, e.g. `default-test`.
    pub stack: String,
    /// Input variables passed to the component.
    #[serde(default)]
    pub vars: BTreeMap<String, Value>,
    /// Re-plan after checks pass and require zero changes.
    #[serde(default = "default_drift_check")]
    pub drift_check: bool,
}

impl ScenarioConfig {
    /// Validates a scenario entry.
    fn validate(&self) -> Result<(), ConfigError> {
        require_token("scenarios.name", &self.name)?;
        self.to_spec()?;
        if self.vars.keys().any(|key| key.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "scenario {} has an empty variable name",
                self.name
            )));
        }
        Ok(())
    }

    /// Converts the entry into a runnable spec.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the component or stack is invalid.
    pub fn to_spec(&self) -> Result<ScenarioSpec, ConfigError> {
        let invalid = |err: component_acceptance_core::DescriptorError| {
            ConfigError::Invalid(format!("scenario {}: {err}", self.name))
        };
        let component = ComponentId::new(self.component.clone()).map_err(invalid)?;
        let stack = StackName::new(self.stack.clone()).map_err(invalid)?;
        let mut descriptor = ComponentDescriptor::new(component, stack);
        descriptor.vars = self.vars.clone();
        Ok(ScenarioSpec {
            name: self.name.clone(),
            kind: self.kind,
            descriptor,
            drift_check: self.drift_check,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Requires a non-empty value without whitespace.
fn require_token(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be set")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} must not contain whitespace")));
    }
    Ok(())
}

/// Built-in scenarios for the SNS topic component.
pub(crate) fn default_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig {
            name: "basic".to_string(),
            kind: ScenarioKind::BasicTopic,
            component: "sns-topic/basic".to_string(),
            stack: DEFAULT_STACK.to_string(),
            vars: BTreeMap::new(),
            drift_check: true,
        },
        ScenarioConfig {
            name: "enabled-flag".to_string(),
            kind: ScenarioKind::EnabledFlag,
            component: "sns-topic/disabled".to_string(),
            stack: DEFAULT_STACK.to_string(),
            vars: BTreeMap::new(),
            drift_check: false,
        },
    ]
}

/// Default region.
pub(crate) fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Default partition.
pub(crate) fn default_partition() -> String {
    DEFAULT_PARTITION.to_string()
}

/// Default Atmos binary.
pub(crate) fn default_atmos_binary() -> String {
    DEFAULT_ATMOS_BINARY.to_string()
}

/// Default retry attempts.
pub(crate) const fn default_max_attempts() -> u32 {
    RetryPolicy::DEFAULT_MAX_ATTEMPTS
}

/// Default initial retry delay in milliseconds.
pub(crate) const fn default_initial_delay_ms() -> u64 {
    1_000
}

/// Default maximum retry delay in milliseconds.
pub(crate) const fn default_max_delay_ms() -> u64 {
    8_000
}

/// Default log filter.
pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

/// Drift checks are on unless disabled.
pub(crate) const fn default_drift_check() -> bool {
    true
}
