//! Integration tests for gh-jira-bridge
//!
//! These tests drive the sync state machine and the bulk driver against
//! in-memory GitHub and Jira fakes that record every call.

use async_trait::async_trait;
use gh_jira_bridge::config::SyncSettings;
use gh_jira_bridge::integrations::{
    CreatedJiraIssue, GitHubApi, GitHubIssue, GitHubLabel, IssueState, JiraApi, LabelLookup,
    NewLabel, PullRequestRef, StateReason,
};
use gh_jira_bridge::sync::{
    BulkSyncer, IssueSyncer, JiraIssueDraft, SkipReason, SyncOutcome,
};
use gh_jira_bridge::{BridgeError, Result, SyncStage};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    GetIssue(u64),
    ListOpen { page: u32, per_page: u32 },
    GetLabel(String),
    CreateLabel(String),
    AddLabels(u64, Vec<String>),
    Comment(u64),
    UpdateState(u64, IssueState, Option<StateReason>),
}

impl Call {
    fn is_write(&self) -> bool {
        matches!(
            self,
            Call::CreateLabel(_) | Call::AddLabels(..) | Call::Comment(_) | Call::UpdateState(..)
        )
    }
}

#[derive(Default)]
struct GitHubState {
    issues: Vec<GitHubIssue>,
    repo_labels: HashSet<String>,
    calls: Vec<Call>,
    comments: Vec<(u64, String)>,
    fail_get_label: bool,
    fail_add_labels: bool,
    fail_update_state: bool,
}

#[derive(Default)]
struct FakeGitHub {
    state: Mutex<GitHubState>,
}

impl FakeGitHub {
    fn with_issues(issues: Vec<GitHubIssue>) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().issues = issues;
        fake
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    fn issue(&self, number: u64) -> GitHubIssue {
        self.state
            .lock()
            .unwrap()
            .issues
            .iter()
            .find(|i| i.number == number)
            .cloned()
            .unwrap()
    }

    fn set<F: FnOnce(&mut GitHubState)>(&self, f: F) {
        f(&mut self.state.lock().unwrap());
    }

    fn server_error() -> BridgeError {
        BridgeError::GitHub("HTTP 500 Internal Server Error".to_string())
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn get_issue(&self, number: u64) -> Result<GitHubIssue> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetIssue(number));
        state
            .issues
            .iter()
            .find(|i| i.number == number)
            .cloned()
            .ok_or_else(|| BridgeError::IssueNotFound(format!("#{}", number)))
    }

    async fn list_open_issues(&self, page: u32, per_page: u32) -> Result<Vec<GitHubIssue>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListOpen { page, per_page });
        let start = ((page - 1) * per_page) as usize;
        Ok(state
            .issues
            .iter()
            .filter(|i| i.state == IssueState::Open)
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    async fn get_label(&self, name: &str) -> Result<LabelLookup> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetLabel(name.to_string()));
        if state.fail_get_label {
            return Err(Self::server_error());
        }
        if state.repo_labels.contains(name) {
            Ok(LabelLookup::Exists(GitHubLabel::named(name)))
        } else {
            Ok(LabelLookup::NotFound)
        }
    }

    async fn create_label(&self, label: &NewLabel) -> Result<GitHubLabel> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateLabel(label.name.clone()));
        state.repo_labels.insert(label.name.clone());
        Ok(GitHubLabel::named(&label.name))
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::AddLabels(number, labels.to_vec()));
        if state.fail_add_labels {
            return Err(Self::server_error());
        }
        if let Some(issue) = state.issues.iter_mut().find(|i| i.number == number) {
            issue
                .labels
                .extend(labels.iter().map(|l| GitHubLabel::named(l)));
        }
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Comment(number));
        state.comments.push((number, body.to_string()));
        Ok(())
    }

    async fn update_issue_state(
        &self,
        number: u64,
        new_state: IssueState,
        reason: Option<StateReason>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateState(number, new_state, reason));
        if state.fail_update_state {
            return Err(Self::server_error());
        }
        if let Some(issue) = state.issues.iter_mut().find(|i| i.number == number) {
            issue.state = new_state;
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeJira {
    created: Mutex<Vec<JiraIssueDraft>>,
    fail_summaries: Mutex<HashSet<String>>,
}

impl FakeJira {
    fn created(&self) -> Vec<JiraIssueDraft> {
        self.created.lock().unwrap().clone()
    }

    fn fail_for(&self, summary: &str) {
        self.fail_summaries
            .lock()
            .unwrap()
            .insert(summary.to_string());
    }
}

#[async_trait]
impl JiraApi for FakeJira {
    async fn create_issue(&self, draft: &JiraIssueDraft) -> Result<CreatedJiraIssue> {
        if self.fail_summaries.lock().unwrap().contains(&draft.summary) {
            return Err(BridgeError::Jira {
                status: 400,
                body: r#"{"errors":{"issuetype":"invalid"}}"#.to_string(),
            });
        }
        let mut created = self.created.lock().unwrap();
        created.push(draft.clone());
        let n = created.len();
        Ok(CreatedJiraIssue {
            id: (10000 + n).to_string(),
            key: format!("{}-{}", draft.project_key, n),
            self_url: Some(format!("https://jira.test/rest/api/3/issue/{}", 10000 + n)),
        })
    }

    fn browse_url(&self, key: &str) -> String {
        format!("https://jira.test/browse/{}", key)
    }
}

/// Helper to create a test issue
fn create_test_issue(number: u64, title: &str, labels: &[&str]) -> GitHubIssue {
    GitHubIssue {
        number,
        title: title.to_string(),
        body: Some(format!(
            "**File:** `src/mod_{}.rs`\n**Line:** {}\n\n```rust\nfn f() {{}}\n```\n",
            number, number
        )),
        state: IssueState::Open,
        labels: labels.iter().map(|l| GitHubLabel::named(*l)).collect(),
        user: None,
        html_url: format!("https://github.com/acme/widgets/issues/{}", number),
        pull_request: None,
    }
}

fn create_test_pr(number: u64) -> GitHubIssue {
    GitHubIssue {
        pull_request: Some(PullRequestRef {
            url: Some(format!(
                "https://api.github.com/repos/acme/widgets/pulls/{}",
                number
            )),
        }),
        ..create_test_issue(number, "Bump deps", &[])
    }
}

fn settings() -> SyncSettings {
    SyncSettings::new("WID").with_courtesy_delay(Duration::ZERO)
}

fn syncer(
    github: &Arc<FakeGitHub>,
    jira: &Arc<FakeJira>,
    settings: SyncSettings,
) -> IssueSyncer {
    IssueSyncer::new(github.clone(), jira.clone(), settings)
}

mod single_issue_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_sync_sequence() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_issue(
            7,
            "[TODO] Handle retries",
            &["enhancement", "priority:critical"],
        )]));
        let jira = Arc::new(FakeJira::default());

        let outcome = syncer(&github, &jira, settings())
            .sync_issue_number(7)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Synced {
                jira_key: "WID-1".to_string(),
                closed: true
            }
        );
        assert_eq!(
            github.calls(),
            vec![
                Call::GetIssue(7),
                Call::GetLabel("jira:WID-1".to_string()),
                Call::CreateLabel("jira:WID-1".to_string()),
                Call::AddLabels(7, vec!["jira:WID-1".to_string()]),
                Call::Comment(7),
                Call::UpdateState(7, IssueState::Closed, Some(StateReason::NotPlanned)),
            ]
        );

        let draft = &jira.created()[0];
        assert_eq!(draft.summary, "Handle retries");
        assert_eq!(draft.issue_type, "Story");
        assert_eq!(draft.priority, "Highest");
        assert_eq!(draft.labels, vec!["github-sync", "automated"]);

        let comments = github.state.lock().unwrap().comments.clone();
        assert!(comments[0]
            .1
            .contains("[WID-1](https://jira.test/browse/WID-1)"));
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_issue(
            3,
            "Crash on start",
            &["bug"],
        )]));
        let jira = Arc::new(FakeJira::default());
        let syncer = syncer(&github, &jira, settings().with_close_after_sync(false));

        syncer.sync_issue_number(3).await.unwrap();
        let writes_after_first = github.writes().len();

        let outcome = syncer.sync_issue_number(3).await.unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::Skipped(SkipReason::AlreadySynced {
                jira_key: "WID-1".to_string()
            })
        );
        assert_eq!(jira.created().len(), 1);
        assert_eq!(github.writes().len(), writes_after_first);
    }

    #[tokio::test]
    async fn test_existing_label_is_reused() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_issue(
            3,
            "Crash",
            &[],
        )]));
        github.set(|s| {
            s.repo_labels.insert("jira:WID-1".to_string());
        });
        let jira = Arc::new(FakeJira::default());

        syncer(&github, &jira, settings().with_close_after_sync(false))
            .sync_issue_number(3)
            .await
            .unwrap();

        assert!(!github
            .calls()
            .iter()
            .any(|c| matches!(c, Call::CreateLabel(_))));
        assert!(github
            .calls()
            .contains(&Call::AddLabels(3, vec!["jira:WID-1".to_string()])));
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_writes() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_issue(
            4,
            "Slow query",
            &["bug"],
        )]));
        let jira = Arc::new(FakeJira::default());

        let outcome = syncer(&github, &jira, settings().with_dry_run(true))
            .sync_issue_number(4)
            .await
            .unwrap();

        assert_eq!(outcome.jira_key(), Some("WID-DRYRUN"));
        assert!(!gh_jira_bridge::sync::is_valid_jira_key("WID-DRYRUN"));
        assert!(jira.created().is_empty());
        assert!(github.writes().is_empty());
        assert_eq!(github.calls(), vec![Call::GetIssue(4)]);
    }

    #[tokio::test]
    async fn test_label_failure_reports_orphaned_key() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_issue(
            9,
            "Leak",
            &[],
        )]));
        github.set(|s| s.fail_add_labels = true);
        let jira = Arc::new(FakeJira::default());

        let err = syncer(&github, &jira, settings())
            .sync_issue_number(9)
            .await
            .unwrap_err();

        match &err {
            BridgeError::PartialSync {
                issue_number,
                jira_key,
                stage,
                ..
            } => {
                assert_eq!(*issue_number, 9);
                assert_eq!(jira_key, "WID-1");
                assert_eq!(*stage, SyncStage::Labeling);
            }
            other => panic!("expected PartialSync, got {:?}", other),
        }
        assert!(err.leaves_orphaned_jira_issue());
        // nothing after the failed label write
        assert!(!github
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Comment(_) | Call::UpdateState(..))));
    }

    #[tokio::test]
    async fn test_label_lookup_error_does_not_create_label() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_issue(
            9,
            "Leak",
            &[],
        )]));
        github.set(|s| s.fail_get_label = true);
        let jira = Arc::new(FakeJira::default());

        let err = syncer(&github, &jira, settings())
            .sync_issue_number(9)
            .await
            .unwrap_err();

        assert!(err.leaves_orphaned_jira_issue());
        assert!(github.writes().is_empty());
    }

    #[tokio::test]
    async fn test_close_failure_then_rerun_skips() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_issue(
            5,
            "Flaky test",
            &[],
        )]));
        github.set(|s| s.fail_update_state = true);
        let jira = Arc::new(FakeJira::default());
        let syncer = syncer(&github, &jira, settings());

        let err = syncer.sync_issue_number(5).await.unwrap_err();
        assert!(matches!(
            err,
            BridgeError::PartialSync {
                stage: SyncStage::Closing,
                ..
            }
        ));
        assert!(!err.leaves_orphaned_jira_issue());

        github.set(|s| s.fail_update_state = false);
        let outcome = syncer.sync_issue_number(5).await.unwrap();
        assert_eq!(outcome.status(), "skipped");
        assert_eq!(jira.created().len(), 1);
        assert_eq!(github.issue(5).state, IssueState::Open);
    }

    #[tokio::test]
    async fn test_jira_failure_leaves_github_untouched() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_issue(
            6,
            "Bad type",
            &[],
        )]));
        let jira = Arc::new(FakeJira::default());
        jira.fail_for("Bad type");

        let err = syncer(&github, &jira, settings())
            .sync_issue_number(6)
            .await
            .unwrap_err();

        match err {
            BridgeError::Jira { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, r#"{"errors":{"issuetype":"invalid"}}"#);
            }
            other => panic!("expected Jira error, got {:?}", other),
        }
        assert!(github.writes().is_empty());
    }

    #[tokio::test]
    async fn test_closed_issue_policy() {
        let mut closed = create_test_issue(11, "Old bug", &["bug"]);
        closed.state = IssueState::Closed;
        let github = Arc::new(FakeGitHub::with_issues(vec![closed]));
        let jira = Arc::new(FakeJira::default());

        let outcome = syncer(&github, &jira, settings())
            .sync_issue_number(11)
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::AlreadyClosed));
        assert!(jira.created().is_empty());

        let outcome = syncer(&github, &jira, settings().with_sync_closed_issues(true))
            .sync_issue_number(11)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::Synced {
                jira_key: "WID-1".to_string(),
                closed: false
            }
        );
        assert!(!github
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Comment(_) | Call::UpdateState(..))));
    }

    #[tokio::test]
    async fn test_pull_request_is_rejected() {
        let github = Arc::new(FakeGitHub::with_issues(vec![create_test_pr(12)]));
        let jira = Arc::new(FakeJira::default());

        assert!(syncer(&github, &jira, settings())
            .sync_issue_number(12)
            .await
            .is_err());
        assert!(jira.created().is_empty());
    }
}

mod bulk_tests {
    use super::*;

    fn repository(issue_count: u64, labelled_every: u64, prs: u64) -> Vec<GitHubIssue> {
        let mut issues: Vec<GitHubIssue> = (1..=issue_count)
            .map(|n| {
                if n % labelled_every == 0 {
                    let label = format!("jira:WID-{}", 9000 + n);
                    create_test_issue(n, &format!("Issue {}", n), &[label.as_str()])
                } else {
                    create_test_issue(n, &format!("Issue {}", n), &[])
                }
            })
            .collect();
        issues.extend((1..=prs).map(|n| create_test_pr(issue_count + n)));
        issues
    }

    #[tokio::test]
    async fn test_bulk_counts_and_pagination() {
        let github = Arc::new(FakeGitHub::with_issues(repository(250, 25, 5)));
        let jira = Arc::new(FakeJira::default());
        let bulk = BulkSyncer::new(syncer(&github, &jira, settings()));

        let report = bulk.sync_all_unsynced().await.unwrap();

        assert_eq!(report.stats.synced, 240);
        assert_eq!(report.stats.skipped, 10);
        assert_eq!(report.stats.failed, 0);
        assert_eq!(report.results.len(), 250);
        assert_eq!(jira.created().len(), 240);

        let pages: Vec<Call> = github
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::ListOpen { .. }))
            .collect();
        assert_eq!(
            pages,
            vec![
                Call::ListOpen { page: 1, per_page: 100 },
                Call::ListOpen { page: 2, per_page: 100 },
                Call::ListOpen { page: 3, per_page: 100 },
            ]
        );
    }

    #[tokio::test]
    async fn test_bulk_is_idempotent() {
        let github = Arc::new(FakeGitHub::with_issues(repository(30, 7, 0)));
        let jira = Arc::new(FakeJira::default());
        let settings = settings().with_close_after_sync(false);

        let first = BulkSyncer::new(syncer(&github, &jira, settings.clone()))
            .sync_all_unsynced()
            .await
            .unwrap();
        assert_eq!(first.stats.synced, 26);

        let writes = github.writes().len();
        let second = BulkSyncer::new(syncer(&github, &jira, settings))
            .sync_all_unsynced()
            .await
            .unwrap();

        assert_eq!(second.stats.synced, 0);
        assert_eq!(second.stats.skipped, 30);
        assert_eq!(github.writes().len(), writes);
        assert_eq!(jira.created().len(), 26);
    }

    #[tokio::test]
    async fn test_full_last_page_fetches_empty_page() {
        let github = Arc::new(FakeGitHub::with_issues(repository(20, 1000, 0)));
        let jira = Arc::new(FakeJira::default());
        let bulk = BulkSyncer::new(syncer(&github, &jira, settings().with_page_size(10)));

        let report = bulk.sync_all_unsynced().await.unwrap();

        assert_eq!(report.stats.synced, 20);
        let pages = github
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::ListOpen { .. }))
            .count();
        assert_eq!(pages, 3);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let github = Arc::new(FakeGitHub::with_issues(repository(5, 1000, 0)));
        let jira = Arc::new(FakeJira::default());
        jira.fail_for("Issue 3");

        let report = BulkSyncer::new(syncer(&github, &jira, settings()))
            .sync_all_unsynced()
            .await
            .unwrap();

        assert_eq!(report.stats.synced, 4);
        assert_eq!(report.stats.failed, 1);
        assert!(report.stats.has_failures());
        assert!(matches!(report.results[2], (3, SyncOutcome::Failed { .. })));
        assert_eq!(report.results[3].0, 4);
    }

    #[tokio::test]
    async fn test_dry_run_bulk_makes_no_writes() {
        let github = Arc::new(FakeGitHub::with_issues(repository(12, 4, 2)));
        let jira = Arc::new(FakeJira::default());

        let report = BulkSyncer::new(syncer(&github, &jira, settings().with_dry_run(true)))
            .sync_all_unsynced()
            .await
            .unwrap();

        assert_eq!(report.stats.synced, 9);
        assert_eq!(report.stats.skipped, 3);
        assert!(github.writes().is_empty());
        assert!(jira.created().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_courtesy_delay_after_each_creation() {
        let github = Arc::new(FakeGitHub::with_issues(repository(4, 2, 0)));
        let jira = Arc::new(FakeJira::default());
        let settings = settings().with_courtesy_delay(Duration::from_secs(1));

        let start = tokio::time::Instant::now();
        let report = BulkSyncer::new(syncer(&github, &jira, settings))
            .sync_all_unsynced()
            .await
            .unwrap();

        assert_eq!(report.stats.synced, 2);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_in_dry_run() {
        let github = Arc::new(FakeGitHub::with_issues(repository(4, 1000, 0)));
        let jira = Arc::new(FakeJira::default());
        let settings = settings()
            .with_dry_run(true)
            .with_courtesy_delay(Duration::from_secs(1));

        let start = tokio::time::Instant::now();
        BulkSyncer::new(syncer(&github, &jira, settings))
            .sync_all_unsynced()
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
