//! Repository-wide sync
//!
//! Lists every open issue first, then syncs them one at a time. Syncing
//! closes issues, so paging while closing would shift later pages and skip
//! issues. A listing failure aborts the run before any write.

use super::orchestrator::IssueSyncer;
use super::outcome::{BulkSyncReport, SyncOutcome};
use crate::integrations::GitHubIssue;
use crate::Result;
use tracing::{debug, error, info};

pub struct BulkSyncer {
    syncer: IssueSyncer,
}

impl BulkSyncer {
    pub fn new(syncer: IssueSyncer) -> Self {
        Self { syncer }
    }

    /// Every open issue in the repository, pull requests excluded
    pub async fn list_candidates(&self) -> Result<Vec<GitHubIssue>> {
        let per_page = self.syncer.settings().page_size.max(1);
        let mut issues = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.syncer.github().list_open_issues(page, per_page).await?;
            let fetched = batch.len();
            let before = issues.len();
            issues.extend(batch.into_iter().filter(|i| !i.is_pull_request()));
            debug!(
                page,
                fetched,
                kept = issues.len() - before,
                "Listed open issues"
            );

            if fetched < per_page as usize {
                break;
            }
            page += 1;
        }

        Ok(issues)
    }

    /// Sync every open issue that has no sync label yet
    ///
    /// A failing issue is recorded and the run moves on.
    pub async fn sync_all_unsynced(&self) -> Result<BulkSyncReport> {
        let settings = self.syncer.settings();
        let issues = self.list_candidates().await?;
        info!(count = issues.len(), "Found open issues");

        let mut report = BulkSyncReport::default();
        for issue in &issues {
            let outcome = match self.syncer.sync_issue(issue).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(issue = issue.number, error = %e, "Failed to sync issue");
                    SyncOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            info!(issue = issue.number, "#{}: {}", issue.number, outcome);

            let created = matches!(outcome, SyncOutcome::Synced { .. });
            report.push(issue.number, outcome);

            if created && !settings.dry_run && !settings.courtesy_delay.is_zero() {
                tokio::time::sleep(settings.courtesy_delay).await;
            }
        }

        info!(
            synced = report.stats.synced,
            skipped = report.stats.skipped,
            failed = report.stats.failed,
            "Bulk sync finished"
        );
        Ok(report)
    }
}
