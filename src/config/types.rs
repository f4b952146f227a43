//! Configuration data types for bruno-runner.

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default package-manager command used to install the Bruno CLI.
pub const DEFAULT_INSTALL_COMMAND: &str = "npm install @usebruno/cli --global --quiet";

/// Default run-option templates passed to `bru`.
///
/// The placeholders are resolved against the step configuration before
/// execution: `{{.BrunoCollection}}` expands to the collection path and
/// `{{.CollectionDisplayName}}` to its filesystem-safe display name.
#[must_use]
pub fn default_run_options() -> Vec<String> {
    vec![
        String::from("run"),
        String::from("{{.BrunoCollection}}"),
        String::from("--reporter-junit"),
        String::from("target/bruno/TEST-{{.CollectionDisplayName}}.xml"),
        String::from("--reporter-html"),
        String::from("target/bruno/TEST-{{.CollectionDisplayName}}.html"),
    ]
}

/// Step configuration for one Bruno test run.
///
/// This is a flat record of the options accepted by the `execute` step. It is
/// loaded from configuration files, environment variables, and command-line
/// arguments with layered precedence. The precedence order (lowest to
/// highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `BRUNO_RUNNER_CONFIG_PATH` environment variable
/// 2. `.bruno-runner.toml` in the current working directory
/// 3. `.bruno-runner.toml` in the home directory
/// 4. `~/.config/bruno-runner/config.toml` (XDG default)
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "BRUNO",
    post_merge_hook,
    discovery(
        app_name = "bruno-runner",
        env_var = "BRUNO_RUNNER_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".bruno-runner.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct StepConfig {
    /// Path to the Bruno collection to run.
    pub collection: String,

    /// Bruno environment name passed as `--env`.
    pub environment: String,

    /// Global environment name passed as `--global-env`.
    pub global_env: String,

    /// Path to an environment file passed as `--env-file`.
    pub env_file: String,

    /// `NAME=value` pairs, each passed as a separate `--env-var`.
    pub env_vars: Vec<String>,

    /// Script sandbox mode passed as `--sandbox` (`safe` or `developer`).
    pub sandbox_mode: String,

    /// Recurse into sub-folders of the collection (`-r`).
    pub recursive: bool,

    /// Stop on the first request failure (`--bail`).
    pub bail: bool,

    /// Run requests in parallel (`--parallel`).
    pub parallel: bool,

    /// Only run requests that have tests (`--tests-only`).
    pub tests_only: bool,

    /// Skip TLS certificate verification (`--insecure`).
    pub insecure: bool,

    /// Delay between requests in milliseconds; emitted only when > 0.
    pub delay: u32,

    /// CSV data file for data-driven runs (`--csv-file-path`).
    pub csv_file_path: String,

    /// JSON data file for data-driven runs (`--json-file-path`).
    pub json_file_path: String,

    /// Number of iterations for data-driven runs; emitted only when > 0.
    pub iteration_count: u32,

    /// Comma-separated tags a request must carry to be run (`--tags`).
    pub tags: String,

    /// Comma-separated tags that exclude a request (`--exclude-tags`).
    pub exclude_tags: String,

    /// JSON report output path (`--reporter-json`).
    pub reporter_json: String,

    /// JUnit report output path (`--reporter-junit`). Suppressed when the
    /// raw run-option templates already contain that flag.
    pub reporter_junit: String,

    /// HTML report output path (`--reporter-html`). Suppressed when the
    /// raw run-option templates already contain that flag.
    pub reporter_html: String,

    /// Omit all response headers from reports (`--reporter-skip-all-headers`).
    pub reporter_skip_all_headers: bool,

    /// Header names to omit from reports, each passed as a separate
    /// `--reporter-skip-headers`.
    pub reporter_skip_headers: Vec<String>,

    /// Package-manager command used to install the Bruno CLI. Tokenised on
    /// whitespace; a local-install prefix flag is appended before running.
    pub install_command: String,

    /// Command templates resolved and passed to `bru` ahead of the
    /// structured flags.
    pub run_options: Vec<String>,

    /// When false, a failing test run is logged as a warning and the step
    /// still succeeds.
    pub fail_on_error: bool,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            collection: String::new(),
            environment: String::new(),
            global_env: String::new(),
            env_file: String::new(),
            env_vars: Vec::new(),
            sandbox_mode: String::from("safe"),
            recursive: false,
            bail: false,
            parallel: false,
            tests_only: false,
            insecure: false,
            delay: 0,
            csv_file_path: String::new(),
            json_file_path: String::new(),
            iteration_count: 0,
            tags: String::new(),
            exclude_tags: String::new(),
            reporter_json: String::new(),
            reporter_junit: String::new(),
            reporter_html: String::new(),
            reporter_skip_all_headers: false,
            reporter_skip_headers: Vec::new(),
            install_command: String::from(DEFAULT_INSTALL_COMMAND),
            run_options: default_run_options(),
            fail_on_error: true,
        }
    }
}

impl StepConfig {
    /// Validates that the options required to execute a run are present.
    ///
    /// Only the `execute` and `print-command` subcommands need a collection,
    /// so this is called per-command rather than during loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` if `collection` is empty and no
    /// run-option template names one, or if `install_command` is empty.
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut missing = Vec::new();
        if self.collection.is_empty() {
            missing.push("collection");
        }
        if self.install_command.trim().is_empty() {
            missing.push("install_command");
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: missing.join(", "),
            }
            .into());
        }
        Ok(())
    }
}

impl PostMergeHook for StepConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Collection presence is checked per-command in validate(), not here,
        // because future subcommands may not need one.
        Ok(())
    }
}
