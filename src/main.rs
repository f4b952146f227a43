//! `bruno-runner` application entry point.
//!
//! This binary runs a Bruno API-test collection as a CI pipeline step. It
//! uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/bruno-runner/config.toml` or path from
//!    `BRUNO_RUNNER_CONFIG_PATH`)
//! 3. Environment variables (`BRUNO_*`)
//! 4. Command-line arguments

use bruno_runner::command::resolve_command;
use bruno_runner::config::{Cli, Commands, StepConfig, load_config};
use bruno_runner::error::Result as StepResult;
use bruno_runner::process::SystemRunner;
use bruno_runner::runner::{StepParams, run_step};
use clap::Parser;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Initialises logging, loads configuration with layered precedence, then
/// dispatches to the appropriate subcommand handler.
///
/// Uses `eyre::Result` as the return type to provide human-readable error
/// reports with backtraces when available.
fn main() -> EyreResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI first (for subcommand dispatch and option overrides).
    let cli = Cli::parse();

    // Load configuration with layered precedence: defaults < file < env < CLI.
    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli, config: &StepConfig) -> StepResult<()> {
    match &cli.command {
        Commands::Execute(_) => execute_step(config),
        Commands::PrintCommand(_) => print_command(config),
    }
}

/// Run the configured Bruno collection.
fn execute_step(config: &StepConfig) -> StepResult<()> {
    let env = DefaultEnv::new();
    run_step(StepParams {
        config,
        runner: &SystemRunner,
        env: &env,
    })
}

/// Resolve the run options and print the final `bru` invocation without
/// running anything.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_command(config: &StepConfig) -> StepResult<()> {
    config.validate()?;
    let env = DefaultEnv::new();
    let arguments = resolve_command(config, &env)?;
    println!("bru {}", arguments.join(" "));
    Ok(())
}
