//! Step execution orchestration.
//!
//! This module sequences one `execute` step invocation: log the runtime and
//! package-manager versions, install the Bruno CLI, compile the argument
//! vector, and run the installed binary. Execution is fully sequential with
//! no retries; every failure is terminal for the step except a failing test
//! run when `fail_on_error` is disabled, which is downgraded to a warning.

use camino::Utf8PathBuf;
use mockable::Env;

use crate::command::resolve_command;
use crate::config::StepConfig;
use crate::error::{ConfigError, InfraError, Result, RunnerError};
use crate::process::ProcessRunner;


/// Tools whose versions are logged before anything else runs.
const VERSION_CHECKED_TOOLS: &[&str] = &["node", "npm"];

/// Local-install prefix appended to the install command so `bru` lands in a
/// predictable location regardless of the global npm prefix.
const LOCAL_INSTALL_PREFIX: &str = "--prefix=~/.npm-global";

/// Location of the installed `bru` binary relative to the home directory.
const BRUNO_BINARY_PATH: &str = ".npm-global/bin/bru";

/// Parameters for one step execution.
///
/// Groups the collaborators required by [`run_step`] into a single struct:
/// the immutable step configuration, the process-execution collaborator, and
/// the environment-lookup collaborator.
pub struct StepParams<'a, R: ProcessRunner, E: Env> {
    /// The resolved step configuration.
    pub config: &'a StepConfig,
    /// Process runner used for every external invocation.
    pub runner: &'a R,
    /// Environment provider used for `getenv` templates and `$HOME`.
    pub env: &'a E,
}

/// Runs the complete `execute` step.
///
/// Sequence: version logging, CLI installation, template resolution, flag
/// building, and the final `bru` invocation.
///
/// # Errors
///
/// - [`InfraError::VersionCheck`] when a tool version check fails.
/// - [`ConfigError::InstallFailed`] when the install command fails.
/// - A template error when a run-option template is malformed.
/// - [`RunnerError::TestRunFailed`] when the test run fails and
///   `fail_on_error` is set; with `fail_on_error` disabled the failure is
///   logged as a warning and the step still succeeds.
pub fn run_step<R: ProcessRunner, E: Env>(params: StepParams<'_, R, E>) -> Result<()> {
    let StepParams {
        config,
        runner,
        env,
    } = params;

    config.validate()?;

    log_tool_versions(runner)?;
    install_bruno(&config.install_command, runner)?;

    let arguments = resolve_command(config, env)?;
    let bruno_path = bruno_binary_path(env);

    if let Err(source) = runner.run(bruno_path.as_str(), &arguments) {
        if config.fail_on_error {
            return Err(RunnerError::TestRunFailed { source });
        }
        tracing::warn!(
            error = %source,
            "Bruno tests failed, but fail_on_error is set to false"
        );
    }

    Ok(())
}

/// Logs the node and npm versions so the pipeline log records the toolchain.
///
/// A failure here means the build image is broken, not the step
/// configuration.
fn log_tool_versions<R: ProcessRunner>(runner: &R) -> Result<()> {
    for tool in VERSION_CHECKED_TOOLS {
        runner
            .run(tool, &[String::from("--version")])
            .map_err(|source| InfraError::VersionCheck {
                tool: (*tool).to_owned(),
                source,
            })?;
    }
    Ok(())
}

/// Installs the Bruno CLI by tokenising the configured install command on
/// whitespace and appending the local-install prefix.
fn install_bruno<R: ProcessRunner>(install_command: &str, runner: &R) -> Result<()> {
    let mut tokens = install_command.split_whitespace().map(str::to_owned);
    let Some(program) = tokens.next() else {
        return Err(ConfigError::MissingRequired {
            field: String::from("install_command"),
        }
        .into());
    };

    let mut arguments: Vec<String> = tokens.collect();
    arguments.push(String::from(LOCAL_INSTALL_PREFIX));

    runner
        .run(&program, &arguments)
        .map_err(|source| ConfigError::InstallFailed { source })?;
    Ok(())
}

/// Returns the path of the installed `bru` binary under the home directory.
fn bruno_binary_path<E: Env>(env: &E) -> Utf8PathBuf {
    let home = env.string("HOME").unwrap_or_default();
    Utf8PathBuf::from(home).join(BRUNO_BINARY_PATH)
}
