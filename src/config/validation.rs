//! Configuration validation
//!
//! Checks raw inputs before any network call:
//! - Required values are present and non-empty
//! - Repository is `owner/name`
//! - URLs are http(s)
//! - The Jira project key has the shape Jira accepts

use super::bridge_config::ConfigInputs;
use crate::sync::label_codec::is_valid_project_key;
use crate::BridgeError;

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn require<'a>(
    errors: &mut Vec<ValidationError>,
    field: &str,
    env: &str,
    value: &'a Option<String>,
) -> Option<&'a str> {
    let found = present(value);
    if found.is_none() {
        errors.push(ValidationError::new(
            field,
            format!("Required value is missing (set {} or --{})", env, field.replace('_', "-")),
        ));
    }
    found
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, url: &str) {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(ValidationError::new(
            field,
            format!("Invalid URL '{}': must start with http:// or https://", url),
        ));
    }
}

/// Validate raw configuration inputs
pub fn validate_inputs(inputs: &ConfigInputs) -> ValidationResult {
    let mut errors = Vec::new();

    if let Some(repository) = require(&mut errors, "repository", "GITHUB_REPOSITORY", &inputs.repository) {
        let valid = repository
            .split_once('/')
            .map(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'))
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::new(
                "repository",
                format!("Invalid repository '{}': expected owner/name", repository),
            ));
        }
    }

    if !inputs.sync_all && inputs.issue_number.is_none() {
        errors.push(ValidationError::new(
            "issue_number",
            "An issue number is required unless bulk mode is enabled (set ISSUE_NUMBER or SYNC_ALL)",
        ));
    }

    require(&mut errors, "github_token", "GITHUB_TOKEN", &inputs.github_token);

    if let Some(url) = present(&inputs.github_api_url) {
        check_url(&mut errors, "github_api_url", url);
    }

    if let Some(url) = require(&mut errors, "jira_base_url", "JIRA_BASE_URL", &inputs.jira_base_url) {
        check_url(&mut errors, "jira_base_url", url);
    }

    require(&mut errors, "jira_user_email", "JIRA_USER_EMAIL", &inputs.jira_user_email);
    require(&mut errors, "jira_api_token", "JIRA_API_TOKEN", &inputs.jira_api_token);

    if let Some(key) = require(&mut errors, "jira_project_key", "JIRA_PROJECT_KEY", &inputs.jira_project_key) {
        if !is_valid_project_key(key) {
            errors.push(ValidationError::new(
                "jira_project_key",
                format!(
                    "Invalid project key '{}': must be an uppercase letter followed by uppercase letters or digits",
                    key
                ),
            ));
        }
    }

    if let Some(issue_type) = &inputs.default_issue_type {
        if issue_type.trim().is_empty() {
            errors.push(ValidationError::new(
                "default_issue_type",
                "Default issue type must not be empty",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Flatten validation errors into a single configuration error
pub fn into_config_error(errors: &[ValidationError]) -> BridgeError {
    let lines: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
    BridgeError::Config(format!(
        "{} problem(s) found:\n{}",
        errors.len(),
        lines.join("\n")
    ))
}
