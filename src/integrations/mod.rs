//! External Integrations
//!
//! Adapters for the two issue trackers the bridge talks to.
//!
//! # Overview
//!
//! The sync never talks HTTP directly. It goes through two narrow traits so the
//! state machine can run against in-memory trackers in tests:
//!
//! - [`GitHubApi`]: issue reads plus label, comment and state writes
//! - [`JiraApi`]: a single `create_issue` call
//!
//! # Built-in Integrations
//!
//! - **GitHub**: REST API v3 adapter, bearer-token auth
//! - **JIRA**: Cloud REST API v3 adapter, basic auth (email + API token), with
//!   descriptions sent as [`adf`] documents

pub mod adf;
pub mod github;
pub mod jira;

// GitHub exports
pub use github::{
    GitHubAdapter, GitHubApi, GitHubIssue, GitHubLabel, GitHubUser, IssueState, LabelLookup,
    NewLabel, PullRequestRef, StateReason,
};

// JIRA exports
pub use jira::{CreatedJiraIssue, JiraAdapter, JiraApi};

// Document format exports
pub use adf::{AdfDocument, AdfMark, AdfNode};
