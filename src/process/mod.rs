//! External process execution.
//!
//! The step shells out to `node`, `npm`, and the installed `bru` binary. All
//! invocations go through the [`ProcessRunner`] trait so the orchestrator can
//! be tested without launching real processes: production code uses
//! [`SystemRunner`], while tests inject a `mockall` mock.

use std::process::Command;

use crate::error::ProcessError;


/// Trait for running an external program to completion.
///
/// Implementations forward the child's output to the step log and block
/// until the process exits.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner {
    /// Runs `program` with `args`, waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::Launch`] when the program cannot be started
    /// and [`ProcessError::NonZeroExit`] when it exits unsuccessfully.
    fn run(&self, program: &str, args: &[String]) -> Result<(), ProcessError>;
}

/// Production implementation of [`ProcessRunner`] over `std::process`.
///
/// The child inherits the parent's stdout and stderr, so tool output lands
/// directly in the pipeline log.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<(), ProcessError> {
        tracing::info!(program, ?args, "running external command");

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|error| ProcessError::Launch {
                program: program.to_owned(),
                message: error.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::NonZeroExit {
                program: program.to_owned(),
                // A None exit code means the process died to a signal.
                code: status.code().unwrap_or(-1),
            })
        }
    }
}
