//! Per-issue sync state machine
//!
//! ```text
//! FETCHED ─┬─> SKIPPED_SYNCED
//!          ├─> SKIPPED_CLOSED
//!          └─> CREATING ─> CREATED ─> LABELING ─> LABELED ─┬─> CLOSING ─> CLOSED
//!                                                          └─> DONE
//! ```
//!
//! The GitHub label is the only record of a sync, so the write order matters.
//! The Jira issue is created first, then the label is written. If the label
//! write fails, nothing links the two and the next run creates a second Jira
//! issue. That gap is reported through [`BridgeError::PartialSync`] and is not
//! reconciled automatically. A failure while closing is harmless because the
//! label is already in place.

use super::comment::closing_comment;
use super::draft::{build_draft, JiraIssueDraft};
use super::label_codec::{build_sync_label_name, extract_sync_key};
use super::outcome::{SkipReason, SyncOutcome, SyncState};
use crate::config::SyncSettings;
use crate::error::SyncStage;
use crate::integrations::{
    GitHubApi, GitHubIssue, IssueState, JiraApi, LabelLookup, NewLabel, StateReason,
};
use crate::{BridgeError, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Color of `jira:<KEY>` labels (Jira blue)
pub const SYNC_LABEL_COLOR: &str = "0052CC";

/// Suffix of the placeholder key used in dry runs; never a valid Jira key
pub const DRY_RUN_KEY_SUFFIX: &str = "DRYRUN";

/// Runs the sync sequence for one issue at a time
pub struct IssueSyncer {
    github: Arc<dyn GitHubApi>,
    jira: Arc<dyn JiraApi>,
    settings: SyncSettings,
}

impl IssueSyncer {
    pub fn new(github: Arc<dyn GitHubApi>, jira: Arc<dyn JiraApi>, settings: SyncSettings) -> Self {
        Self {
            github,
            jira,
            settings,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn github(&self) -> &Arc<dyn GitHubApi> {
        &self.github
    }

    /// Placeholder key reported instead of a real one in dry runs
    pub fn dry_run_key(&self) -> String {
        format!("{}-{}", self.settings.project_key, DRY_RUN_KEY_SUFFIX)
    }

    fn transition(&self, number: u64, state: SyncState) {
        debug!(issue = number, state = %state, "Sync state");
    }

    /// Fetch issue `number` and sync it
    pub async fn sync_issue_number(&self, number: u64) -> Result<SyncOutcome> {
        let issue = self.github.get_issue(number).await?;
        if issue.is_pull_request() {
            return Err(BridgeError::Other(format!(
                "#{} is a pull request, not an issue",
                number
            )));
        }
        self.sync_issue(&issue).await
    }

    /// Sync an already-fetched issue
    pub async fn sync_issue(&self, issue: &GitHubIssue) -> Result<SyncOutcome> {
        let number = issue.number;
        self.transition(number, SyncState::Fetched);

        if let Some(jira_key) = extract_sync_key(issue.label_names()) {
            self.transition(number, SyncState::SkippedSynced);
            info!(issue = number, jira_key = %jira_key, "Already synced, skipping");
            return Ok(SyncOutcome::Skipped(SkipReason::AlreadySynced { jira_key }));
        }

        if issue.is_closed() && !self.settings.sync_closed_issues {
            self.transition(number, SyncState::SkippedClosed);
            info!(issue = number, "Closed without a sync label, skipping");
            return Ok(SyncOutcome::Skipped(SkipReason::AlreadyClosed));
        }

        self.transition(number, SyncState::Creating);
        let draft = build_draft(issue, &self.settings);
        let jira_key = self.create_jira_issue(number, &draft).await?;
        self.transition(number, SyncState::Created);
        info!(issue = number, jira_key = %jira_key, "Jira issue created");

        self.transition(number, SyncState::Labeling);
        if let Err(e) = self.apply_sync_label(number, &jira_key).await {
            error!(
                issue = number,
                jira_key = %jira_key,
                error = %e,
                "Jira issue created but the sync label was not written; add label jira:{} by hand or the next run will create a duplicate",
                jira_key
            );
            return Err(BridgeError::partial(number, &jira_key, SyncStage::Labeling, e));
        }
        self.transition(number, SyncState::Labeled);

        if !self.settings.close_after_sync || issue.is_closed() {
            self.transition(number, SyncState::Done);
            return Ok(SyncOutcome::Synced {
                jira_key,
                closed: false,
            });
        }

        self.transition(number, SyncState::Closing);
        if let Err(e) = self.close_issue(number, &jira_key, &draft).await {
            warn!(
                issue = number,
                jira_key = %jira_key,
                error = %e,
                "Issue labelled but not closed; later runs will skip it"
            );
            return Err(BridgeError::partial(number, &jira_key, SyncStage::Closing, e));
        }
        self.transition(number, SyncState::Closed);

        Ok(SyncOutcome::Synced {
            jira_key,
            closed: true,
        })
    }

    async fn create_jira_issue(&self, number: u64, draft: &JiraIssueDraft) -> Result<String> {
        if self.settings.dry_run {
            let key = self.dry_run_key();
            info!(
                issue = number,
                project = %draft.project_key,
                summary = %draft.summary,
                issue_type = %draft.issue_type,
                priority = %draft.priority,
                placeholder_key = %key,
                "Dry run: would create Jira issue"
            );
            return Ok(key);
        }

        let created = self.jira.create_issue(draft).await?;
        Ok(created.key)
    }

    async fn apply_sync_label(&self, number: u64, jira_key: &str) -> Result<()> {
        let name = build_sync_label_name(jira_key);

        if self.settings.dry_run {
            info!(issue = number, label = %name, "Dry run: would create label if missing and attach it");
            return Ok(());
        }

        match self.github.get_label(&name).await? {
            LabelLookup::Exists(_) => debug!(label = %name, "Sync label already exists"),
            LabelLookup::NotFound => {
                self.github
                    .create_label(&NewLabel {
                        name: name.clone(),
                        color: SYNC_LABEL_COLOR.to_string(),
                        description: format!("Synced to Jira issue {}", jira_key),
                    })
                    .await?;
            }
        }

        self.github.add_labels(number, &[name]).await
    }

    async fn close_issue(&self, number: u64, jira_key: &str, draft: &JiraIssueDraft) -> Result<()> {
        let jira_url = self.jira.browse_url(jira_key);
        let body = closing_comment(jira_key, &jira_url, draft, Utc::now());

        if self.settings.dry_run {
            info!(issue = number, jira_url = %jira_url, "Dry run: would comment and close as not planned");
            return Ok(());
        }

        self.github.create_comment(number, &body).await?;
        self.github
            .update_issue_state(number, IssueState::Closed, Some(StateReason::NotPlanned))
            .await
    }
}
