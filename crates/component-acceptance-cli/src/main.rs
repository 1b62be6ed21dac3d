// crates/component-acceptance-cli/src/main.rs
// ============================================================================
// Module: Component Acceptance CLI Entry Point
// Description: Command dispatcher for acceptance runs and config checks.
// Purpose: Wire configuration, the Atmos driver, and the SNS client together.
// Dependencies: clap, component-acceptance-*, serde_jcs, thiserror, tracing
// ============================================================================

//! ## Overview
//! `component-acceptance run` deploys each selected scenario's component,
//! checks it against live SNS state, and tears it down. The summary goes to
//! stdout; structured logs go to stderr. Exit codes: 0 when every scenario
//! passed, 1 when any scenario failed, 2 for configuration or usage errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub(crate) mod logging;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use component_acceptance_config::AtmosConfig;
use component_acceptance_config::AwsConfig;
use component_acceptance_config::ConfigError;
use component_acceptance_config::HarnessConfig;
use component_acceptance_core::RunReport;
use component_acceptance_core::ScenarioRunner;
use component_acceptance_providers::AtmosDriver;
use component_acceptance_providers::SnsClientConfig;
use component_acceptance_providers::SnsTopicClient;
use thiserror::Error;
use tracing::info;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code when at least one scenario failed.
const EXIT_SCENARIO_FAILED: u8 = 1;
/// Exit code for configuration and usage errors.
const EXIT_CONFIG_ERROR: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Command-line interface for the acceptance harness.
#[derive(Parser, Debug)]
#[command(
    name = "component-acceptance",
    about = "Deploy infrastructure components, verify them against live state, and tear them down.",
    version,
    disable_help_subcommand = true
)]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run all or the named scenarios.
    Run(RunCommand),
    /// List configured scenarios.
    List(ConfigArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration.
    Check(ConfigArgs),
}

/// Shared `--config` flag.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Configuration file; falls back to `COMPONENT_ACCEPTANCE_CONFIG`, then defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Configuration source.
    #[command(flatten)]
    config: ConfigArgs,
    /// Scenario to run; repeat to select several. Defaults to all.
    #[arg(long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,
    /// Leave deployed components in place.
    #[arg(long)]
    skip_teardown: bool,
    /// Write the canonical JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying a message and the exit code to report.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Error message.
    message: String,
    /// Process exit code.
    exit: u8,
}

impl CliError {
    /// Creates an error for a configuration or usage problem.
    const fn config(message: String) -> Self {
        Self {
            message,
            exit: EXIT_CONFIG_ERROR,
        }
    }

    /// Creates an error for a failure while running scenarios.
    const fn runtime(message: String) -> Self {
        Self {
            message,
            exit: EXIT_SCENARIO_FAILED,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::config(format!("config error: {err}"))
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err),
    }
}

/// Parses arguments and dispatches the selected command.
fn run() -> CliResult<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return Ok(if err.use_stderr() {
                ExitCode::from(EXIT_CONFIG_ERROR)
            } else {
                ExitCode::SUCCESS
            });
        }
    };
    match cli.command {
        Commands::Run(command) => command_run(&command),
        Commands::List(args) => command_list(&args),
        Commands::Config {
            command: ConfigCommand::Check(args),
        } => command_config_check(&args),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs the selected scenarios.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let mut config = HarnessConfig::load(command.config.config.as_deref())?;
    if command.skip_teardown {
        config.teardown.skip = true;
    }
    logging::init(&config.logging).map_err(CliError::config)?;
    let specs = config.select(&command.scenarios)?;

    let driver = build_driver(&config.atmos);
    let client = SnsTopicClient::new(&client_config(&config.aws))
        .map_err(|err| CliError::runtime(format!("sns client setup failed: {err}")))?;
    let runner = ScenarioRunner::new(&driver, &client, config.settings());
    info!(scenarios = specs.len(), region = %config.aws.region, "starting acceptance run");
    let report = runner.run_all(&specs);

    write_stdout(&report.render_text())?;
    if let Some(path) = &command.report {
        write_report(path, &report)?;
    }
    Ok(ExitCode::from(exit_code(&report)))
}

/// Lists configured scenarios.
fn command_list(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = HarnessConfig::load(args.config.as_deref())?;
    write_stdout(&render_scenario_list(&config))?;
    Ok(ExitCode::SUCCESS)
}

/// Validates configuration.
fn command_config_check(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = HarnessConfig::load(args.config.as_deref())?;
    let specs = config.scenario_specs()?;
    write_stdout(&format!("config ok: {} scenario(s)\n", specs.len()))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Wiring
// ============================================================================

/// Builds the Atmos driver from configuration.
fn build_driver(config: &AtmosConfig) -> AtmosDriver {
    let driver = AtmosDriver::new(config.binary.clone()).envs(config.env.clone());
    match &config.base_path {
        Some(path) => driver.base_path(path.clone()),
        None => driver,
    }
}

/// Maps provider configuration onto SNS client settings.
fn client_config(config: &AwsConfig) -> SnsClientConfig {
    SnsClientConfig {
        region: config.region.clone(),
        profile: config.profile.clone(),
        endpoint_url: config.endpoint_url.clone(),
    }
}

/// Returns the process exit code for a finished run.
const fn exit_code(report: &RunReport) -> u8 {
    if report.success() { 0 } else { EXIT_SCENARIO_FAILED }
}

/// Renders one line per configured scenario.
fn render_scenario_list(config: &HarnessConfig) -> String {
    let mut out = String::new();
    for scenario in &config.scenarios {
        let _ = writeln!(
            out,
            "{}\t{}\t{}@{}",
            scenario.name,
            scenario.kind,
            scenario.component.trim(),
            scenario.stack.trim()
        );
    }
    out
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes the canonical JSON run report to `path`.
fn write_report(path: &Path, report: &RunReport) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(report)
        .map_err(|err| CliError::runtime(format!("failed to serialize report: {err}")))?;
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|err| {
        CliError::runtime(format!("failed to write report {}: {err}", path.display()))
    })
}

/// Writes text to stdout without adding a newline.
fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| CliError::runtime(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write {stream}: {error}")
}

/// Emits an error message to stderr and returns its exit code.
fn emit_error(err: &CliError) -> ExitCode {
    let _ = write_stderr_line(&err.message);
    ExitCode::from(err.exit)
}
