//! Configuration system for bruno-runner.
//!
//! This module provides the step configuration structure and CLI definitions
//! for the bruno-runner application. Configuration loading and precedence
//! merging is handled by the `ortho_config` crate. Intended precedence: CLI
//! flags override environment variables, which override configuration files,
//! which override defaults.
//!
//! The configuration file is expected at `~/.config/bruno-runner/config.toml`
//! by default.
//!
//! # Example Configuration
//!
//! ```toml
//! collection = "tests/integration/api-tests"
//! environment = "ci"
//! sandbox_mode = "safe"
//! fail_on_error = true
//!
//! env_vars = ["BASE_URL=https://staging.example.com"]
//! reporter_skip_headers = ["Authorization"]
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, StepArgs};
pub use loader::{env_var_names, load_config};
pub use types::{DEFAULT_INSTALL_COMMAND, StepConfig, default_run_options};
