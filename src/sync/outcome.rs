//! Per-issue results and batch statistics

use std::fmt;

/// Why an issue needed no work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A `jira:<KEY>` label is already present
    AlreadySynced { jira_key: String },
    /// Closed without a sync label, and closed issues are not synced
    AlreadyClosed,
}

/// Result of processing one issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced { jira_key: String, closed: bool },
    Skipped(SkipReason),
    /// Recorded by the bulk driver when an issue's sync returned an error
    Failed { error: String },
}

impl SyncOutcome {
    /// Jira key created or found for the issue, if any
    pub fn jira_key(&self) -> Option<&str> {
        match self {
            SyncOutcome::Synced { jira_key, .. }
            | SyncOutcome::Skipped(SkipReason::AlreadySynced { jira_key }) => Some(jira_key.as_str()),
            _ => None,
        }
    }

    /// Short status word for output sinks
    pub fn status(&self) -> &'static str {
        match self {
            SyncOutcome::Synced { .. } => "synced",
            SyncOutcome::Skipped(_) => "skipped",
            SyncOutcome::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Synced {
                jira_key,
                closed: true,
            } => write!(f, "synced to {} and closed", jira_key),
            SyncOutcome::Synced { jira_key, .. } => write!(f, "synced to {}", jira_key),
            SyncOutcome::Skipped(SkipReason::AlreadySynced { jira_key }) => {
                write!(f, "skipped (already synced to {})", jira_key)
            }
            SyncOutcome::Skipped(SkipReason::AlreadyClosed) => {
                write!(f, "skipped (closed without sync label)")
            }
            SyncOutcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// States of the per-issue sync sequence, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Fetched,
    SkippedSynced,
    SkippedClosed,
    Creating,
    Created,
    Labeling,
    Labeled,
    Closing,
    Closed,
    Done,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncState::Fetched => "FETCHED",
            SyncState::SkippedSynced => "SKIPPED_SYNCED",
            SyncState::SkippedClosed => "SKIPPED_CLOSED",
            SyncState::Creating => "CREATING",
            SyncState::Created => "CREATED",
            SyncState::Labeling => "LABELING",
            SyncState::Labeled => "LABELED",
            SyncState::Closing => "CLOSING",
            SyncState::Closed => "CLOSED",
            SyncState::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Bulk run counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BulkSyncStats {
    pub synced: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl BulkSyncStats {
    pub fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Synced { .. } => self.synced += 1,
            SyncOutcome::Skipped(_) => self.skipped += 1,
            SyncOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.synced + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Outcome of a bulk run, per issue in processing order
#[derive(Debug, Clone, Default)]
pub struct BulkSyncReport {
    pub stats: BulkSyncStats,
    pub results: Vec<(u64, SyncOutcome)>,
}

impl BulkSyncReport {
    pub fn push(&mut self, number: u64, outcome: SyncOutcome) {
        self.stats.record(&outcome);
        self.results.push((number, outcome));
    }
}
