//! gh-jira-bridge - One-way GitHub Issues to Jira sync
//!
//! Mirrors open GitHub issues into Jira and records each mapping as a
//! `jira:<KEY>` label on the GitHub issue. The label is the only state: an
//! issue carrying one is never synced again, so every run is safe to repeat.
//!
//! # Architecture
//!
//! - **sync**: Label codec, field mapping, description building, and the
//!   per-issue and bulk sync drivers
//! - **integrations**: GitHub and Jira REST adapters behind async traits
//! - **config**: Validated run configuration and label mapping tables
//! - **output**: `key=value` result lines for CI
//! - **logging**: tracing subscriber setup

pub mod config;
pub mod error;
pub mod integrations;
pub mod logging;
pub mod output;
pub mod sync;

// Re-exports
pub use error::{BridgeError, Result, SyncStage};
