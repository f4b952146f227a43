//! Command-line argument definitions for bruno-runner.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Command-line interface for bruno-runner.
#[derive(Debug, Parser)]
#[command(name = "bruno-runner")]
#[command(
    author,
    version,
    about = "CI step runner for Bruno API test collections"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install the Bruno CLI and run the configured collection.
    Execute(StepArgs),

    /// Resolve the run options and print the final `bru` invocation
    /// without running anything.
    PrintCommand(StepArgs),
}

/// Step option overrides shared by the `execute` and `print-command`
/// subcommands. Values given here take precedence over environment
/// variables and the configuration file.
#[derive(Debug, Args)]
pub struct StepArgs {
    /// Path to the Bruno collection to run.
    #[arg(long)]
    pub collection: Option<String>,

    /// Bruno environment name.
    #[arg(long)]
    pub environment: Option<String>,

    /// Script sandbox mode (safe or developer).
    #[arg(long)]
    pub sandbox_mode: Option<String>,

    /// NAME=value pair forwarded to Bruno; may be repeated.
    #[arg(long = "env-var")]
    pub env_vars: Vec<String>,

    /// Treat a failing test run as a warning instead of an error.
    #[arg(long)]
    pub no_fail_on_error: bool,
}

impl Cli {
    /// Returns the step option overrides for the active subcommand.
    #[must_use]
    pub const fn step_args(&self) -> &StepArgs {
        match &self.command {
            Commands::Execute(args) | Commands::PrintCommand(args) => args,
        }
    }
}
