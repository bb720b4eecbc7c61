//! Configuration system
//!
//! One explicit [`BridgeConfig`] built at process entry:
//! - GitHub and Jira connection settings
//! - Run mode (single issue or bulk)
//! - Sync policy (dry run, close after sync, closed-issue handling)
//! - Label → priority / issue-type tables, optionally from a YAML file

mod bridge_config;
pub mod mapping;
pub mod validation;

pub use bridge_config::{
    BridgeConfig, ConfigInputs, GitHubSettings, JiraSettings, RunMode, SyncSettings,
    DEFAULT_COURTESY_DELAY, DEFAULT_GITHUB_API_URL, DEFAULT_ISSUE_TYPE, DEFAULT_PAGE_SIZE,
};
pub use mapping::{FieldMapping, LabelTable, DEFAULT_PRIORITY};
pub use validation::{into_config_error, validate_inputs, ValidationError};
