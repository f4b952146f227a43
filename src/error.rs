//! Semantic error types for the bruno-runner application.
//!
//! This module defines the error hierarchy for bruno-runner, using semantic
//! error enums (via `thiserror`) for conditions the caller might inspect or
//! map to a pipeline error category, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: Utf8PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    ///
    /// This wraps errors from the layered configuration system, including
    /// file, environment, and CLI layer parsing as well as missing required
    /// fields after layer merging.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),

    /// Installing the Bruno CLI via the package manager failed.
    #[error("error installing Bruno CLI: {source}")]
    InstallFailed {
        /// The underlying process failure.
        #[source]
        source: ProcessError,
    },
}

/// Errors raised while resolving run-option command templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template text is syntactically malformed (for example, an
    /// unterminated `{{` placeholder).
    #[error("could not parse Bruno command template: {message}")]
    Parse {
        /// A description of the syntax problem.
        message: String,
    },

    /// The template parsed but could not be evaluated (for example, a
    /// reference to an unknown field).
    #[error("error on executing template: {message}")]
    Render {
        /// A description of the evaluation problem.
        message: String,
    },
}

/// Errors that indicate a broken build environment rather than a broken
/// step configuration.
#[derive(Debug, Error)]
pub enum InfraError {
    /// A tool version check failed, so the tool is missing or unusable.
    #[error("error logging {tool} version: {source}")]
    VersionCheck {
        /// The tool whose version check failed (`node` or `npm`).
        tool: String,
        /// The underlying process failure.
        #[source]
        source: ProcessError,
    },
}

/// Errors from launching or waiting on an external process.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be launched at all.
    #[error("failed to launch '{program}': {message}")]
    Launch {
        /// The program that failed to launch.
        program: String,
        /// A description of the launch failure.
        message: String,
    },

    /// The program ran but exited with a non-zero status.
    #[error("'{program}' exited with status {code}")]
    NonZeroExit {
        /// The program that failed.
        program: String,
        /// The exit code, or -1 if the process was terminated by a signal.
        code: i32,
    },
}

/// Top-level error type for the bruno-runner application.
///
/// This enum aggregates all domain-specific errors into a single type that can
/// be used throughout the application. At the application boundary (main.rs),
/// these errors are converted to `eyre::Report` for human-readable reporting.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while resolving a command template.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// An error occurred in the build environment.
    #[error(transparent)]
    Infra(#[from] InfraError),

    /// An error occurred launching an external process.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The Bruno test run itself failed and `fail_on_error` is set.
    #[error("The execution of the Bruno tests failed, see the log for details.: {source}")]
    TestRunFailed {
        /// The underlying process failure.
        #[source]
        source: ProcessError,
    },
}

/// A specialised `Result` type for bruno-runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
