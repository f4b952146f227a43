//! Configuration loading with layered precedence.
//!
//! This module provides functions to load the step configuration with the
//! precedence order (lowest to highest): application defaults, configuration
//! file, environment variables, command-line arguments.
//!
//! The `OrthoConfig` derive macro provides `load()` and `compose_layers()`
//! methods that handle discovery, environment variables, and CLI parsing
//! automatically. This loader composes the layers manually with
//! `MergeComposer` instead, because:
//!
//! 1. **Subcommand separation**: the CLI (`Cli` struct) handles subcommand
//!    dispatch via clap's `#[command(subcommand)]`, while `StepConfig` holds
//!    configuration values. `OrthoConfig`'s `load()` expects to own the
//!    entire CLI parsing.
//!
//! 2. **Environment variable validation**: `OrthoConfig`'s environment layer
//!    uses Figment, which silently ignores unparseable values. This loader
//!    implements fail-fast validation that returns errors for invalid typed
//!    values.
//!
//! 3. **Custom discovery integration**: the `Cli` struct already accepts
//!    `--config` via clap, so discovery must honour that path before falling
//!    back to XDG paths.
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable values (e.g., `BRUNO_BAIL=maybe`
//! instead of `true`/`false`) return an error immediately. String fields
//! (e.g., `BRUNO_ENVIRONMENT`) are always accepted; typed fields like
//! booleans (`BRUNO_PARALLEL`) or integers (`BRUNO_DELAY`) must have valid
//! values or the configuration loading fails with a clear error. List fields
//! (`BRUNO_ENV_VARS`, `BRUNO_RUN_OPTIONS`, `BRUNO_REPORTER_SKIP_HEADERS`)
//! take comma-separated values.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{Cli, StepConfig};
use crate::error::{ConfigError, Result};

// ============================================================================
// Environment Variable Specification Table
// ============================================================================

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
    /// Unsigned 32-bit integer. Invalid values return an error.
    U32,
    /// Comma-separated list of strings.
    StringList,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `BRUNO_COLLECTION`).
    env_var: &'static str,
    /// The configuration field name (e.g., `collection`).
    field: &'static str,
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their configuration fields.
///
/// Adding or modifying environment variable mappings is a single-line change
/// here. The order doesn't matter as the table is processed in a single pass.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "BRUNO_COLLECTION",
        field: "collection",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_ENVIRONMENT",
        field: "environment",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_GLOBAL_ENV",
        field: "global_env",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_ENV_FILE",
        field: "env_file",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_ENV_VARS",
        field: "env_vars",
        var_type: EnvVarType::StringList,
    },
    EnvVarSpec {
        env_var: "BRUNO_SANDBOX_MODE",
        field: "sandbox_mode",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_RECURSIVE",
        field: "recursive",
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "BRUNO_BAIL",
        field: "bail",
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "BRUNO_PARALLEL",
        field: "parallel",
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "BRUNO_TESTS_ONLY",
        field: "tests_only",
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "BRUNO_INSECURE",
        field: "insecure",
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "BRUNO_DELAY",
        field: "delay",
        var_type: EnvVarType::U32,
    },
    EnvVarSpec {
        env_var: "BRUNO_CSV_FILE_PATH",
        field: "csv_file_path",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_JSON_FILE_PATH",
        field: "json_file_path",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_ITERATION_COUNT",
        field: "iteration_count",
        var_type: EnvVarType::U32,
    },
    EnvVarSpec {
        env_var: "BRUNO_TAGS",
        field: "tags",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_EXCLUDE_TAGS",
        field: "exclude_tags",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_REPORTER_JSON",
        field: "reporter_json",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_REPORTER_JUNIT",
        field: "reporter_junit",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_REPORTER_HTML",
        field: "reporter_html",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_REPORTER_SKIP_ALL_HEADERS",
        field: "reporter_skip_all_headers",
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "BRUNO_REPORTER_SKIP_HEADERS",
        field: "reporter_skip_headers",
        var_type: EnvVarType::StringList,
    },
    EnvVarSpec {
        env_var: "BRUNO_INSTALL_COMMAND",
        field: "install_command",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BRUNO_RUN_OPTIONS",
        field: "run_options",
        var_type: EnvVarType::StringList,
    },
    EnvVarSpec {
        env_var: "BRUNO_FAIL_ON_ERROR",
        field: "fail_on_error",
        var_type: EnvVarType::Bool,
    },
];

/// Returns the list of environment variable names recognised by the config
/// loader.
///
/// This is primarily useful for tests that need to clear all `BRUNO_*`
/// environment variables to ensure isolation. Using this function instead of
/// a hard-coded list keeps the test in sync with the loader's actual
/// environment variable mappings.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
///
/// Uses `cap_std::fs_utf8` for capability-oriented filesystem access as per
/// project conventions. The function opens the parent directory of the config
/// file and reads from there.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    // Open the parent directory using ambient authority, then read the file.
    let current_dir = Utf8PathBuf::from(".");
    let parent = path.parent().unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load the step configuration with full layer precedence.
///
/// This function loads configuration from all available sources:
/// 1. Application defaults defined in the struct
/// 2. Configuration file (discovered via XDG paths or `BRUNO_RUNNER_CONFIG_PATH`)
/// 3. Environment variables prefixed with `BRUNO_`
/// 4. Command-line arguments (from the provided `Cli`)
///
/// Later sources override earlier ones.
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to:
/// - Malformed configuration files
/// - Invalid typed environment variable values (e.g., non-boolean for
///   `BRUNO_FAIL_ON_ERROR`)
/// - Missing required fields after merge
pub fn load_config(cli: &Cli) -> Result<StepConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: Defaults (serialised from StepConfig::default()).
    let defaults =
        serde_json::to_value(StepConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Configuration file.
    // Use the CLI-provided path (if it exists), or discover via XDG paths.
    let config_path: Option<Utf8PathBuf> =
        cli.config.clone().filter(|p| p.exists()).or_else(|| {
            let discovery = ConfigDiscovery::builder("bruno-runner")
                .env_var("BRUNO_RUNNER_CONFIG_PATH")
                .config_file_name("config.toml")
                .dotfile_name(".bruno-runner.toml")
                .build();
            discovery
                .candidates()
                .into_iter()
                .filter(|p| p.exists())
                .find_map(|p| Utf8PathBuf::try_from(p).ok())
        });

    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    // Layer 3: Environment variables.
    let env_values = collect_env_vars()?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    // Layer 4: CLI overrides.
    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    // Merge all layers into the final configuration.
    let config =
        StepConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Collect environment variables with the `BRUNO_` prefix into a JSON value.
///
/// This function uses a data-driven approach: all environment variable
/// mappings are defined in [`ENV_VAR_SPECS`]. Adding or changing mappings
/// requires only a single-line change in that table.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed environment variable (bool,
/// u32) has an unparseable value. This fail-fast approach ensures
/// misconfigurations are visible to users.
fn collect_env_vars() -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Ok(raw_value) = std::env::var(spec.env_var) else {
            continue;
        };

        // Parse the value according to its expected type.
        // Invalid values return an error immediately (fail-fast).
        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::U32 => match raw_value.parse::<u32>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::StringList => Value::Array(
                raw_value
                    .split(',')
                    .map(|item| Value::String(item.trim().to_owned()))
                    .collect(),
            ),
        };

        root.insert(spec.field.to_owned(), json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> serde_json::Value {
    let args = cli.step_args();
    let mut overrides = serde_json::Map::new();

    if let Some(ref collection) = args.collection {
        overrides.insert(
            "collection".to_owned(),
            serde_json::Value::String(collection.clone()),
        );
    }

    if let Some(ref environment) = args.environment {
        overrides.insert(
            "environment".to_owned(),
            serde_json::Value::String(environment.clone()),
        );
    }

    if let Some(ref sandbox_mode) = args.sandbox_mode {
        overrides.insert(
            "sandbox_mode".to_owned(),
            serde_json::Value::String(sandbox_mode.clone()),
        );
    }

    if !args.env_vars.is_empty() {
        overrides.insert(
            "env_vars".to_owned(),
            serde_json::Value::Array(
                args.env_vars
                    .iter()
                    .map(|pair| serde_json::Value::String(pair.clone()))
                    .collect(),
            ),
        );
    }

    if args.no_fail_on_error {
        overrides.insert("fail_on_error".to_owned(), serde_json::Value::Bool(false));
    }

    if overrides.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::Value::Object(overrides)
    }
}
