//! Run-option template resolution.
//!
//! Step configurations carry a list of raw `run_options` strings which may
//! contain `{{ ... }}` placeholders. This module implements the small,
//! explicit templating facility that expands them: there is no reflection,
//! just a context record with named fields and one registered function.
//!
//! Supported expressions:
//! - `{{.BrunoCollection}}` — the configured collection path
//! - `{{.CollectionDisplayName}}` — the derived, filesystem-safe display name
//! - `{{.Config.<field>}}` — a named scalar field of the step configuration,
//!   using the configuration's snake_case field names
//! - `{{getenv "NAME"}}` — process environment lookup, empty when unset
//!
//! Environment lookup goes through the `mockable::Env` trait so tests can
//! inject a mock environment instead of mutating the real process state.

use mockable::Env;

use crate::config::StepConfig;
use crate::error::{Result, TemplateError};


/// Derives a filesystem-safe display name from a collection path.
///
/// Path separators become underscores. The result is then split on `.`; when
/// the first segment is empty (the path started with a hidden, dot-prefixed
/// segment) and a second segment exists, the second segment is returned
/// instead.
///
/// The display name is used in report filenames, e.g.
/// `TEST-tests_integration_api-tests.xml`.
#[must_use]
pub fn collection_display_name(collection: &str) -> String {
    let replaced = collection.replace(std::path::MAIN_SEPARATOR, "_");
    let mut segments = replaced.split('.');
    let first = segments.next().unwrap_or_default();
    if first.is_empty() {
        segments.next().unwrap_or(first).to_owned()
    } else {
        first.to_owned()
    }
}

/// Context record the run-option templates are rendered against.
pub struct TemplateContext<'a> {
    config: &'a StepConfig,
    display_name: String,
}

impl<'a> TemplateContext<'a> {
    /// Builds a context for the given step configuration, deriving the
    /// collection display name once up front.
    #[must_use]
    pub fn new(config: &'a StepConfig) -> Self {
        Self {
            config,
            display_name: collection_display_name(&config.collection),
        }
    }

    /// Renders one template string against this context.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] for malformed placeholder syntax
    /// (an unterminated `{{`, an unquoted `getenv` argument, or an
    /// unrecognised expression head) and [`TemplateError::Render`] when a
    /// placeholder references an unknown field.
    pub fn render<E: Env>(
        &self,
        template: &str,
        env: &E,
    ) -> std::result::Result<String, TemplateError> {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;
        while let Some((literal, after)) = rest.split_once("{{") {
            output.push_str(literal);
            let Some((expr, tail)) = after.split_once("}}") else {
                return Err(TemplateError::Parse {
                    message: format!("unterminated placeholder in '{template}'"),
                });
            };
            output.push_str(&self.eval(expr.trim(), env)?);
            rest = tail;
        }
        output.push_str(rest);
        Ok(output)
    }

    /// Evaluates a single placeholder expression.
    fn eval<E: Env>(&self, expr: &str, env: &E) -> std::result::Result<String, TemplateError> {
        if let Some(field) = expr.strip_prefix('.') {
            return self.field_value(field);
        }
        if let Some(argument) = expr.strip_prefix("getenv") {
            let name = parse_quoted(argument.trim())?;
            return Ok(env.string(&name).unwrap_or_default());
        }
        Err(TemplateError::Parse {
            message: format!("unrecognised expression '{expr}'"),
        })
    }

    /// Looks up a context field by name.
    fn field_value(&self, field: &str) -> std::result::Result<String, TemplateError> {
        match field {
            "BrunoCollection" => Ok(self.config.collection.clone()),
            "CollectionDisplayName" => Ok(self.display_name.clone()),
            other => {
                if let Some(config_field) = other.strip_prefix("Config.") {
                    if let Some(value) = self.config_scalar(config_field) {
                        return Ok(value);
                    }
                }
                Err(TemplateError::Render {
                    message: format!("unknown field '.{other}'"),
                })
            }
        }
    }

    /// Returns the string form of a scalar configuration field, or `None`
    /// for unknown names and list-valued fields.
    fn config_scalar(&self, name: &str) -> Option<String> {
        let config = self.config;
        match name {
            "collection" => Some(config.collection.clone()),
            "environment" => Some(config.environment.clone()),
            "global_env" => Some(config.global_env.clone()),
            "env_file" => Some(config.env_file.clone()),
            "sandbox_mode" => Some(config.sandbox_mode.clone()),
            "csv_file_path" => Some(config.csv_file_path.clone()),
            "json_file_path" => Some(config.json_file_path.clone()),
            "tags" => Some(config.tags.clone()),
            "exclude_tags" => Some(config.exclude_tags.clone()),
            "reporter_json" => Some(config.reporter_json.clone()),
            "reporter_junit" => Some(config.reporter_junit.clone()),
            "reporter_html" => Some(config.reporter_html.clone()),
            "install_command" => Some(config.install_command.clone()),
            "recursive" => Some(config.recursive.to_string()),
            "bail" => Some(config.bail.to_string()),
            "parallel" => Some(config.parallel.to_string()),
            "tests_only" => Some(config.tests_only.to_string()),
            "insecure" => Some(config.insecure.to_string()),
            "reporter_skip_all_headers" => Some(config.reporter_skip_all_headers.to_string()),
            "fail_on_error" => Some(config.fail_on_error.to_string()),
            "delay" => Some(config.delay.to_string()),
            "iteration_count" => Some(config.iteration_count.to_string()),
            _ => None,
        }
    }
}

/// Parses a double-quoted string literal, rejecting trailing garbage.
fn parse_quoted(input: &str) -> std::result::Result<String, TemplateError> {
    let inner = input.strip_prefix('"').ok_or_else(|| TemplateError::Parse {
        message: format!("getenv argument must be a quoted string, got '{input}'"),
    })?;
    let (name, remainder) = inner.split_once('"').ok_or_else(|| TemplateError::Parse {
        message: format!("unterminated string literal in '{input}'"),
    })?;
    if !remainder.trim().is_empty() {
        return Err(TemplateError::Parse {
            message: format!("unexpected trailing input '{remainder}'"),
        });
    }
    Ok(name.to_owned())
}

/// Resolves every raw run-option template against the step configuration,
/// order preserved, one output string per input template.
///
/// # Errors
///
/// Returns the first [`TemplateError`] encountered; resolution is a single
/// pass with no retries.
pub fn resolve_run_options<E: Env>(config: &StepConfig, env: &E) -> Result<Vec<String>> {
    let context = TemplateContext::new(config);
    let mut resolved = Vec::with_capacity(config.run_options.len());
    for template in &config.run_options {
        resolved.push(context.render(template, env)?);
    }
    Ok(resolved)
}
