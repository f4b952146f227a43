//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use ortho_config::{MergeComposer, OrthoError, serde_json};
use rstest::fixture;

use crate::config::StepConfig;

/// Fixture providing a `StepConfig` parsed from a full TOML example.
#[fixture]
pub fn step_config_from_full_toml() -> StepConfig {
    let toml = r#"
        collection = "tests/integration/api-tests"
        environment = "ci"
        global_env = "corporate"
        env_file = "env.json"
        env_vars = ["API_KEY=secret123", "BASE_URL=https://api.test.com"]
        sandbox_mode = "developer"
        recursive = true
        bail = true
        parallel = true
        tests_only = true
        insecure = true
        delay = 250
        csv_file_path = "data.csv"
        json_file_path = "data.json"
        iteration_count = 3
        tags = "smoke,critical"
        exclude_tags = "slow,flaky"
        reporter_json = "report.json"
        reporter_junit = "report.xml"
        reporter_html = "report.html"
        reporter_skip_all_headers = true
        reporter_skip_headers = ["Authorization"]
        fail_on_error = false
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing a `StepConfig` parsed from a minimal TOML example.
#[fixture]
pub fn step_config_from_partial_toml() -> StepConfig {
    let toml = r#"
        collection = "api-tests"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Creates a `MergeComposer` seeded with the serialised defaults layer, the
/// same way `load_config` does.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = serde_json::to_value(StepConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Merges the composer's layers into a `StepConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<StepConfig, Arc<OrthoError>> {
    StepConfig::merge_from_layers(composer.layers())
}
