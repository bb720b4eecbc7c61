//! Bridge configuration
//!
//! A [`BridgeConfig`] is built once at process entry from [`ConfigInputs`]
//! (flags and environment, already collected by the CLI) and handed down by
//! value. Nothing below `main` reads the environment.

use super::mapping::FieldMapping;
use super::validation::{validate_inputs, ValidationError};
use std::path::PathBuf;
use std::time::Duration;

/// Default GitHub REST endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Issue type used when no type label matches
pub const DEFAULT_ISSUE_TYPE: &str = "Task";

/// Issues requested per listing page in bulk mode
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Pause after each created Jira issue in bulk mode
pub const DEFAULT_COURTESY_DELAY: Duration = Duration::from_secs(1);

/// Raw inputs, before validation
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    pub repository: Option<String>,
    pub issue_number: Option<u64>,
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub jira_base_url: Option<String>,
    pub jira_user_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub jira_project_key: Option<String>,
    pub dry_run: bool,
    pub sync_all: bool,
    pub close_after_sync: bool,
    pub sync_closed_issues: bool,
    pub default_issue_type: Option<String>,
    pub mapping_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

/// GitHub connection settings
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub token: String,
}

/// Jira connection settings
#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub base_url: String,
    pub user_email: String,
    pub api_token: String,
    pub project_key: String,
}

/// Which issues to process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One issue, by number; any failure fails the run
    Single(u64),
    /// Every open issue in the repository
    Bulk,
}

/// Behaviour of the sync state machine and the bulk driver
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Target Jira project key
    pub project_key: String,

    /// Log intended writes instead of performing them
    pub dry_run: bool,

    /// Comment on and close the GitHub issue once labelled
    pub close_after_sync: bool,

    /// Create Jira issues for closed GitHub issues that were never synced
    pub sync_closed_issues: bool,

    /// Issue type when no type label matches
    pub default_issue_type: String,

    /// Label tables
    pub mapping: FieldMapping,

    /// Listing page size in bulk mode
    pub page_size: u32,

    /// Pause after each created issue in bulk mode
    pub courtesy_delay: Duration,
}

impl SyncSettings {
    /// Settings with defaults for everything except the project key
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            dry_run: false,
            close_after_sync: true,
            sync_closed_issues: false,
            default_issue_type: DEFAULT_ISSUE_TYPE.to_string(),
            mapping: FieldMapping::default(),
            page_size: DEFAULT_PAGE_SIZE,
            courtesy_delay: DEFAULT_COURTESY_DELAY,
        }
    }

    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn with_close_after_sync(mut self, enabled: bool) -> Self {
        self.close_after_sync = enabled;
        self
    }

    pub fn with_sync_closed_issues(mut self, enabled: bool) -> Self {
        self.sync_closed_issues = enabled;
        self
    }

    pub fn with_default_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.default_issue_type = issue_type.into();
        self
    }

    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_courtesy_delay(mut self, delay: Duration) -> Self {
        self.courtesy_delay = delay;
        self
    }
}

/// Complete, validated configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub github: GitHubSettings,
    pub jira: JiraSettings,
    pub mode: RunMode,
    pub sync: SyncSettings,
    /// File receiving `key=value` result lines
    pub output_file: Option<PathBuf>,
}

impl BridgeConfig {
    /// Validate inputs and build the configuration
    ///
    /// Every problem is reported at once; no partial configuration is returned.
    pub fn from_inputs(inputs: ConfigInputs) -> Result<Self, Vec<ValidationError>> {
        validate_inputs(&inputs)?;

        let mapping = match &inputs.mapping_file {
            Some(path) => FieldMapping::load(path).map_err(|e| {
                vec![ValidationError::new(
                    "mapping_file",
                    format!("Failed to load {}: {}", path.display(), e),
                )]
            })?,
            None => FieldMapping::default(),
        };

        // validate_inputs guarantees presence and shape of every field below
        let required = |value: Option<String>| value.unwrap_or_default().trim().to_string();

        let repository = required(inputs.repository);
        let (owner, repo) = repository.split_once('/').unwrap_or_default();
        let project_key = required(inputs.jira_project_key);

        let mode = match (inputs.sync_all, inputs.issue_number) {
            (true, _) => RunMode::Bulk,
            (false, Some(number)) => RunMode::Single(number),
            (false, None) => RunMode::Bulk,
        };

        let default_issue_type = inputs
            .default_issue_type
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string());

        Ok(Self {
            github: GitHubSettings {
                api_url: inputs
                    .github_api_url
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                owner: owner.to_string(),
                repo: repo.to_string(),
                token: required(inputs.github_token),
            },
            jira: JiraSettings {
                base_url: required(inputs.jira_base_url),
                user_email: required(inputs.jira_user_email),
                api_token: required(inputs.jira_api_token),
                project_key: project_key.clone(),
            },
            mode,
            sync: SyncSettings::new(project_key)
                .with_dry_run(inputs.dry_run)
                .with_close_after_sync(inputs.close_after_sync)
                .with_sync_closed_issues(inputs.sync_closed_issues)
                .with_default_issue_type(default_issue_type)
                .with_mapping(mapping),
            output_file: inputs.output_file,
        })
    }
}
