//! Unit tests for flag building and command assembly.

use mockable::MockEnv;
use rstest::{fixture, rstest};

use crate::command::{build_flags, resolve_command};
use crate::config::StepConfig;

/// Fixture providing a `MockEnv` that returns `None` for every query.
#[fixture]
fn empty_env() -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string().returning(|_| None);
    env
}

/// Step configuration with every option set.
#[fixture]
fn full_config() -> StepConfig {
    StepConfig {
        collection: String::from("api-tests"),
        environment: String::from("ci"),
        global_env: String::from("global"),
        env_file: String::from("env.json"),
        env_vars: vec![String::from("KEY=value")],
        sandbox_mode: String::from("developer"),
        recursive: true,
        bail: true,
        parallel: true,
        tests_only: true,
        insecure: true,
        delay: 250,
        csv_file_path: String::from("data.csv"),
        json_file_path: String::from("data.json"),
        iteration_count: 3,
        tags: String::from("smoke"),
        exclude_tags: String::from("slow"),
        reporter_json: String::from("report.json"),
        reporter_junit: String::from("report.xml"),
        reporter_html: String::from("report.html"),
        reporter_skip_all_headers: true,
        reporter_skip_headers: vec![String::from("Authorization")],
        run_options: vec![String::from("run"), String::from("{{.BrunoCollection}}")],
        ..StepConfig::default()
    }
}

/// Asserts that `flag` is immediately followed by `value` in the options.
fn assert_flag_pair(options: &[String], flag: &str, value: &str) {
    let position = options
        .iter()
        .position(|option| option == flag)
        .unwrap_or_else(|| panic!("expected {flag} in {options:?}"));
    assert_eq!(
        options.get(position + 1).map(String::as_str),
        Some(value),
        "expected {flag} to be followed by {value}"
    );
}

#[rstest]
fn empty_config_produces_only_the_sandbox_flag() {
    let options = build_flags(&StepConfig::default());
    // The default sandbox mode is "safe"; everything else is unset.
    assert_eq!(options, vec!["--sandbox", "safe"]);
}

#[rstest]
fn every_configured_option_produces_its_flag(full_config: StepConfig) {
    let options = build_flags(&full_config);

    assert_flag_pair(&options, "--env", "ci");
    assert_flag_pair(&options, "--global-env", "global");
    assert_flag_pair(&options, "--env-file", "env.json");
    assert_flag_pair(&options, "--env-var", "KEY=value");
    assert_flag_pair(&options, "--sandbox", "developer");
    assert!(options.contains(&String::from("-r")));
    assert!(options.contains(&String::from("--bail")));
    assert!(options.contains(&String::from("--parallel")));
    assert!(options.contains(&String::from("--tests-only")));
    assert!(options.contains(&String::from("--insecure")));
    assert_flag_pair(&options, "--delay", "250");
    assert_flag_pair(&options, "--csv-file-path", "data.csv");
    assert_flag_pair(&options, "--json-file-path", "data.json");
    assert_flag_pair(&options, "--iteration-count", "3");
    assert_flag_pair(&options, "--tags", "smoke");
    assert_flag_pair(&options, "--exclude-tags", "slow");
    assert_flag_pair(&options, "--reporter-json", "report.json");
    assert_flag_pair(&options, "--reporter-junit", "report.xml");
    assert_flag_pair(&options, "--reporter-html", "report.html");
    assert!(options.contains(&String::from("--reporter-skip-all-headers")));
    assert_flag_pair(&options, "--reporter-skip-headers", "Authorization");
}

#[rstest]
fn zero_valued_numbers_produce_no_flag() {
    let options = build_flags(&StepConfig::default());
    assert!(!options.contains(&String::from("--delay")));
    assert!(!options.contains(&String::from("--iteration-count")));
}

#[rstest]
fn unset_options_produce_no_flags() {
    let config = StepConfig {
        sandbox_mode: String::new(),
        ..StepConfig::default()
    };
    assert!(build_flags(&config).is_empty());
}

#[rstest]
fn templated_junit_reporter_suppresses_the_structured_flag(full_config: StepConfig) {
    let config = StepConfig {
        run_options: vec![
            String::from("run"),
            String::from("{{.BrunoCollection}}"),
            String::from("--reporter-junit"),
            String::from("TEST-{{.CollectionDisplayName}}.xml"),
        ],
        ..full_config
    };
    let options = build_flags(&config);
    assert!(!options.contains(&String::from("--reporter-junit")));
    // The HTML reporter is unaffected.
    assert_flag_pair(&options, "--reporter-html", "report.html");
}

#[rstest]
fn templated_html_reporter_suppresses_the_structured_flag(full_config: StepConfig) {
    let config = StepConfig {
        run_options: vec![
            String::from("run"),
            String::from("--reporter-html out.html"),
        ],
        ..full_config
    };
    let options = build_flags(&config);
    assert!(!options.contains(&String::from("--reporter-html")));
    assert_flag_pair(&options, "--reporter-junit", "report.xml");
}

#[rstest]
fn suppression_checks_raw_templates_not_resolved_output(full_config: StepConfig) {
    // A template that only renders to the flag does not suppress it.
    let config = StepConfig {
        run_options: vec![String::from("{{.Config.reporter_junit}}")],
        ..full_config
    };
    let options = build_flags(&config);
    assert_flag_pair(&options, "--reporter-junit", "report.xml");
}

#[rstest]
fn resolved_command_places_templates_before_flags(empty_env: MockEnv) {
    let config = StepConfig {
        collection: String::from("api-tests"),
        environment: String::from("ci"),
        ..StepConfig::default()
    };
    let arguments = resolve_command(&config, &empty_env).expect("resolution should succeed");

    assert_eq!(arguments.first().map(String::as_str), Some("run"));
    assert_eq!(arguments.get(1).map(String::as_str), Some("api-tests"));
    let env_position = arguments
        .iter()
        .position(|argument| argument == "--env")
        .expect("--env should be present");
    assert!(env_position > 1, "flags must follow the resolved templates");
    assert_eq!(
        arguments.get(env_position + 1).map(String::as_str),
        Some("ci")
    );
}
