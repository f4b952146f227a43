//! CI step runner for Bruno API test collections.
//!
//! `bruno-runner` executes one pipeline step: install the Bruno CLI via npm,
//! compile the step configuration into a `bru run ...` argument vector, run
//! it, and translate the exit status into a hard failure or a logged warning
//! depending on the `fail_on_error` switch.
//!
//! # Architecture
//!
//! The core of the crate is a configuration-to-command-line compiler. Raw
//! `run_options` templates are resolved against an explicit context record
//! (collection path, derived display name, environment lookup), then the
//! structured options are appended as flags in a fixed declared order. All
//! external invocations go through a process-runner trait so the
//! orchestration is testable without launching anything.
//!
//! # Modules
//!
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`template`]: Run-option template resolution and display-name derivation
//! - [`command`]: Flag-set building and final command assembly
//! - [`process`]: External process execution behind a mockable trait
//! - [`runner`]: Step orchestration (versions, install, resolve, execute)
//! - [`error`]: Semantic error types for the application

pub mod command;
pub mod config;
pub mod error;
pub mod process;
pub mod runner;
pub mod template;
