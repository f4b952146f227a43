//! `StepConfig` validation tests.

use rstest::rstest;

use crate::config::StepConfig;
use crate::error::{ConfigError, RunnerError};

#[rstest]
fn validate_accepts_a_configured_collection() {
    let config = StepConfig {
        collection: String::from("api-tests"),
        ..StepConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[rstest]
fn validate_rejects_an_empty_collection() {
    let config = StepConfig::default();
    let error = config.validate().expect_err("validation should fail");
    match error {
        RunnerError::Config(ConfigError::MissingRequired { field }) => {
            assert!(field.contains("collection"));
        }
        other => panic!("expected MissingRequired, got {other:?}"),
    }
}

#[rstest]
#[case("")]
#[case("   ")]
fn validate_rejects_a_blank_install_command(#[case] install_command: &str) {
    let config = StepConfig {
        collection: String::from("api-tests"),
        install_command: String::from(install_command),
        ..StepConfig::default()
    };
    let error = config.validate().expect_err("validation should fail");
    assert!(error.to_string().contains("install_command"));
}

#[rstest]
fn validate_reports_all_missing_fields_at_once() {
    let config = StepConfig {
        install_command: String::new(),
        ..StepConfig::default()
    };
    let error = config.validate().expect_err("validation should fail");
    let message = error.to_string();
    assert!(message.contains("collection"));
    assert!(message.contains("install_command"));
}
