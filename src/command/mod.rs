//! Flag-set building and final command assembly.
//!
//! The step configuration is compiled into the `bru` argument vector in two
//! stages: the raw `run_options` templates are resolved first, then the
//! structured options are appended as flags in a fixed declared order. Each
//! flag name immediately precedes its value in the output.

use mockable::Env;

use crate::config::StepConfig;
use crate::error::Result;
use crate::template::resolve_run_options;

#[cfg(test)]
mod tests;

/// Appends a flag with its value.
fn push_valued(options: &mut Vec<String>, flag: &str, value: &str) {
    options.push(flag.to_owned());
    options.push(value.to_owned());
}

/// Returns true when any raw run-option template contains the flag as a
/// substring.
///
/// The scan deliberately inspects the unresolved templates, not the rendered
/// output, mirroring how the step has always behaved: a template that only
/// produces the flag after rendering does not suppress the structured option.
fn run_options_mention(run_options: &[String], flag: &str) -> bool {
    run_options.iter().any(|option| option.contains(flag))
}

/// Environment selection flags: `--env`, `--global-env`, `--env-file`, and
/// one `--env-var` per configured pair.
fn environment_flags(config: &StepConfig, options: &mut Vec<String>) {
    if !config.environment.is_empty() {
        push_valued(options, "--env", &config.environment);
    }
    if !config.global_env.is_empty() {
        push_valued(options, "--global-env", &config.global_env);
    }
    if !config.env_file.is_empty() {
        push_valued(options, "--env-file", &config.env_file);
    }
    for env_var in &config.env_vars {
        push_valued(options, "--env-var", env_var);
    }
}

/// Execution behaviour flags: sandbox mode, recursion, bail, parallelism,
/// tests-only, insecure, and delay.
fn execution_flags(config: &StepConfig, options: &mut Vec<String>) {
    if !config.sandbox_mode.is_empty() {
        push_valued(options, "--sandbox", &config.sandbox_mode);
    }
    if config.recursive {
        options.push(String::from("-r"));
    }
    if config.bail {
        options.push(String::from("--bail"));
    }
    if config.parallel {
        options.push(String::from("--parallel"));
    }
    if config.tests_only {
        options.push(String::from("--tests-only"));
    }
    if config.insecure {
        options.push(String::from("--insecure"));
    }
    if config.delay > 0 {
        push_valued(options, "--delay", &config.delay.to_string());
    }
}

/// Data-driven testing flags: CSV/JSON data files and iteration count.
fn data_flags(config: &StepConfig, options: &mut Vec<String>) {
    if !config.csv_file_path.is_empty() {
        push_valued(options, "--csv-file-path", &config.csv_file_path);
    }
    if !config.json_file_path.is_empty() {
        push_valued(options, "--json-file-path", &config.json_file_path);
    }
    if config.iteration_count > 0 {
        push_valued(options, "--iteration-count", &config.iteration_count.to_string());
    }
}

/// Tag filtering flags.
fn tag_flags(config: &StepConfig, options: &mut Vec<String>) {
    if !config.tags.is_empty() {
        push_valued(options, "--tags", &config.tags);
    }
    if !config.exclude_tags.is_empty() {
        push_valued(options, "--exclude-tags", &config.exclude_tags);
    }
}

/// Reporter flags. JUnit and HTML reporters are suppressed when the raw
/// run-option templates already mention them, preventing duplicate reporter
/// arguments.
fn reporter_flags(config: &StepConfig, options: &mut Vec<String>) {
    if !config.reporter_json.is_empty() {
        push_valued(options, "--reporter-json", &config.reporter_json);
    }
    if !config.reporter_junit.is_empty()
        && !run_options_mention(&config.run_options, "--reporter-junit")
    {
        push_valued(options, "--reporter-junit", &config.reporter_junit);
    }
    if !config.reporter_html.is_empty()
        && !run_options_mention(&config.run_options, "--reporter-html")
    {
        push_valued(options, "--reporter-html", &config.reporter_html);
    }
    if config.reporter_skip_all_headers {
        options.push(String::from("--reporter-skip-all-headers"));
    }
    for header in &config.reporter_skip_headers {
        push_valued(options, "--reporter-skip-headers", header);
    }
}

/// Maps the step configuration into an ordered flag list.
///
/// One flag (and optional value) is appended, in a fixed declared order, per
/// configured option that is non-empty, non-zero, or true. Pure function of
/// the configuration; no error conditions.
#[must_use]
pub fn build_flags(config: &StepConfig) -> Vec<String> {
    let mut options = Vec::new();
    environment_flags(config, &mut options);
    execution_flags(config, &mut options);
    data_flags(config, &mut options);
    tag_flags(config, &mut options);
    reporter_flags(config, &mut options);
    options
}

/// Builds the complete `bru` argument vector: resolved run-option templates
/// followed by the structured flags.
///
/// # Errors
///
/// Returns a template error when any run-option template cannot be parsed or
/// evaluated.
pub fn resolve_command<E: Env>(config: &StepConfig, env: &E) -> Result<Vec<String>> {
    let mut arguments = resolve_run_options(config, env)?;
    arguments.extend(build_flags(config));
    Ok(arguments)
}
