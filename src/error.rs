//! Error types for gh-jira-bridge
//!
//! Defines a single error enum covering configuration, transport, and remote API
//! failures. Uses thiserror for ergonomic error handling.

use std::fmt;
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Step of the write sequence that failed after the Jira issue already existed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Creating or attaching the `jira:<KEY>` label
    Labeling,
    /// Posting the closing comment or closing the issue
    Closing,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::Labeling => write!(f, "labeling"),
            SyncStage::Closing => write!(f, "closing"),
        }
    }
}

/// Comprehensive error type for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration errors (missing or malformed inputs)
    #[error("Configuration error: {0}")]
    Config(String),

    /// GitHub API returned an unexpected status
    #[error("GitHub API error: {0}")]
    GitHub(String),

    /// Jira API returned an unexpected status; body is kept verbatim
    #[error("Jira API error: HTTP {status}: {body}")]
    Jira { status: u16, body: String },

    /// Issue not found
    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    /// The Jira issue was created but a later GitHub write failed.
    ///
    /// When `stage` is [`SyncStage::Labeling`] the GitHub issue carries no
    /// marker, so the next run will create a second Jira issue. The key is
    /// carried here so an operator can reconcile by hand.
    #[error("Issue #{issue_number} synced to {jira_key} but {stage} failed: {source}")]
    PartialSync {
        issue_number: u64,
        jira_key: String,
        stage: SyncStage,
        #[source]
        source: Box<BridgeError>,
    },

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors (mapping file)
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl BridgeError {
    /// Wrap an error raised after the Jira issue was created
    pub fn partial(issue_number: u64, jira_key: &str, stage: SyncStage, source: BridgeError) -> Self {
        BridgeError::PartialSync {
            issue_number,
            jira_key: jira_key.to_string(),
            stage,
            source: Box::new(source),
        }
    }

    /// Whether a Jira issue exists that GitHub has no record of
    pub fn leaves_orphaned_jira_issue(&self) -> bool {
        matches!(
            self,
            BridgeError::PartialSync {
                stage: SyncStage::Labeling,
                ..
            }
        )
    }
}
