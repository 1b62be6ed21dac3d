// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Acceptance Harness Helpers
// Description: Builds live drivers and clients from the fixture config.
// Purpose: Run configured scenarios against real infrastructure.
// Dependencies: component-acceptance-config, component-acceptance-core,
//               component-acceptance-providers, system-tests
// ============================================================================

use std::path::PathBuf;
use std::sync::Once;

use component_acceptance_config::HarnessConfig;
use component_acceptance_core::ScenarioReport;
use component_acceptance_core::ScenarioRunner;
use component_acceptance_providers::AtmosDriver;
use component_acceptance_providers::SnsClientConfig;
use component_acceptance_providers::SnsTopicClient;
use system_tests::config::SystemTestConfig;

/// Harness config file inside the fixtures directory.
const FIXTURE_CONFIG: &str = "component-acceptance.toml";

/// Installs a test-writer subscriber once per binary.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Returns the Atmos fixtures directory.
pub fn fixtures_dir() -> Result<PathBuf, String> {
    let config = SystemTestConfig::load()?;
    Ok(config
        .fixtures_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")))
}

/// Loads the fixture harness config, running Atmos from the fixtures
/// directory unless the config names another base path.
pub fn load_config() -> Result<HarnessConfig, String> {
    let fixtures = fixtures_dir()?;
    let mut config = HarnessConfig::load(Some(&fixtures.join(FIXTURE_CONFIG)))
        .map_err(|err| err.to_string())?;
    config.atmos.base_path = Some(match config.atmos.base_path.take() {
        Some(path) if path.is_relative() => fixtures.join(path),
        Some(path) => path,
        None => fixtures,
    });
    Ok(config)
}

/// Deploys, verifies, and tears down the named scenario.
pub fn run_scenario(config: &HarnessConfig, name: &str) -> Result<ScenarioReport, String> {
    init_tracing();
    let spec = config
        .select(&[name.to_string()])
        .map_err(|err| err.to_string())?
        .into_iter()
        .next()
        .ok_or_else(|| format!("scenario {name} not configured"))?;

    let mut driver = AtmosDriver::new(config.atmos.binary.clone()).envs(config.atmos.env.clone());
    if let Some(path) = &config.atmos.base_path {
        driver = driver.base_path(path.clone());
    }
    let client = SnsTopicClient::new(&SnsClientConfig {
        region: config.aws.region.clone(),
        profile: config.aws.profile.clone(),
        endpoint_url: config.aws.endpoint_url.clone(),
    })
    .map_err(|err| err.to_string())?;

    let runner = ScenarioRunner::new(&driver, &client, config.settings());
    Ok(runner.run(&spec))
}
