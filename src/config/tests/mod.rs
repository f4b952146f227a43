//! Unit tests for bruno-runner configuration.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Default value and serialisation tests
//! - [`validation`] - `StepConfig` validation tests
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests

mod helpers;
mod validation;
