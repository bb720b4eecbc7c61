//! Result lines for the surrounding automation
//!
//! CI runners expose a file (`GITHUB_OUTPUT`) that later steps read as
//! `key=value` lines. Without a path, writes are dropped.

use crate::sync::{BulkSyncStats, SyncOutcome};
use crate::{BridgeError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    path: Option<PathBuf>,
}

impl OutputSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Append one `key=value` line
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}={}", key, value)?;
        Ok(())
    }

    /// `jira_key` (when known) and `status` for a single-issue run
    pub fn write_outcome(&self, outcome: &SyncOutcome) -> Result<()> {
        if let Some(key) = outcome.jira_key() {
            self.write("jira_key", key)?;
        }
        self.write("status", outcome.status())
    }

    /// `status=failed` for a single-issue run, after `jira_key` when a Jira
    /// issue was already created
    pub fn write_failure(&self, error: &BridgeError) -> Result<()> {
        if let BridgeError::PartialSync { jira_key, .. } = error {
            self.write("jira_key", jira_key)?;
        }
        self.write("status", "failed")
    }

    /// Counters for a bulk run
    pub fn write_stats(&self, stats: &BulkSyncStats) -> Result<()> {
        self.write("synced", &stats.synced.to_string())?;
        self.write("skipped", &stats.skipped.to_string())?;
        self.write("failed", &stats.failed.to_string())
    }
}
