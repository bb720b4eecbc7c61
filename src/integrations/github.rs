//! GitHub Issues Integration Adapter
//!
//! Reads issues and writes back labels, comments and state using the REST API v3.

use crate::config::GitHubSettings;
use crate::{BridgeError, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// GitHub issue (REST API format)
///
/// Issues and pull requests share the listing endpoint. Pull requests carry a
/// non-null `pull_request` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: IssueState,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    #[serde(default)]
    pub user: Option<GitHubUser>,
    pub html_url: String,
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
}

impl GitHubIssue {
    /// Label names in the order GitHub returned them
    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Reason attached to a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateReason {
    NotPlanned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLabel {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl GitHubLabel {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRef {
    #[serde(default)]
    pub url: Option<String>,
}

/// Repository label creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLabel {
    pub name: String,
    pub color: String,
    pub description: String,
}

/// Result of looking a label up by exact name
#[derive(Debug, Clone)]
pub enum LabelLookup {
    Exists(GitHubLabel),
    NotFound,
}

#[derive(Debug, Clone, Serialize)]
struct AddLabelsRequest<'a> {
    labels: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateStateRequest {
    state: IssueState,
    #[serde(skip_serializing_if = "Option::is_none")]
    state_reason: Option<StateReason>,
}

/// Operations the sync needs from GitHub
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetch a single issue by number
    async fn get_issue(&self, number: u64) -> Result<GitHubIssue>;

    /// List one page of open issues (pull requests included, as GitHub returns them)
    async fn list_open_issues(&self, page: u32, per_page: u32) -> Result<Vec<GitHubIssue>>;

    /// Look up a repository label by exact name
    async fn get_label(&self, name: &str) -> Result<LabelLookup>;

    async fn create_label(&self, label: &NewLabel) -> Result<GitHubLabel>;

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()>;

    async fn create_comment(&self, number: u64, body: &str) -> Result<()>;

    async fn update_issue_state(
        &self,
        number: u64,
        state: IssueState,
        reason: Option<StateReason>,
    ) -> Result<()>;
}

/// GitHub REST client scoped to one repository
pub struct GitHubAdapter {
    client: Client,
    repo_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubAdapter {
    /// Create a new GitHub adapter
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: GitHubSettings) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::USER_AGENT,
                    header::HeaderValue::from_static(concat!(
                        "gh-jira-bridge/",
                        env!("CARGO_PKG_VERSION")
                    )),
                );
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static("application/vnd.github+json"),
                );
                headers.insert(
                    "x-github-api-version",
                    header::HeaderValue::from_static("2022-11-28"),
                );
                headers
            })
            .build()?;

        let repo_url = format!(
            "{}/repos/{}/{}",
            settings.api_url.trim_end_matches('/'),
            settings.owner,
            settings.repo
        );

        Ok(Self {
            client,
            repo_url,
            owner: settings.owner,
            repo: settings.repo,
            token: settings.token,
        })
    }

    /// `owner/name` of the repository this adapter writes to
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    async fn api_error(context: &str, response: Response) -> BridgeError {
        let status = response.status();
        let error_body = response.text().await.unwrap_or_default();
        BridgeError::GitHub(format!("{}: HTTP {}: {}", context, status, error_body))
    }
}

#[async_trait]
impl GitHubApi for GitHubAdapter {
    async fn get_issue(&self, number: u64) -> Result<GitHubIssue> {
        let url = format!("{}/issues/{}", self.repo_url, number);

        debug!(repo = %self.repository(), number = %number, "Fetching GitHub issue");

        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(BridgeError::IssueNotFound(format!(
                "{}#{}",
                self.repository(),
                number
            ))),
            StatusCode::UNAUTHORIZED => Err(BridgeError::GitHub(
                "GitHub authentication failed".to_string(),
            )),
            _ => Err(Self::api_error("get issue", response).await),
        }
    }

    async fn list_open_issues(&self, page: u32, per_page: u32) -> Result<Vec<GitHubIssue>> {
        let url = format!("{}/issues", self.repo_url);

        debug!(repo = %self.repository(), page = %page, per_page = %per_page, "Listing open issues");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("state", "open".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let issues: Vec<GitHubIssue> = response.json().await?;
                debug!(page = %page, returned = issues.len(), "GitHub page fetched");
                Ok(issues)
            }
            StatusCode::UNAUTHORIZED => Err(BridgeError::GitHub(
                "GitHub authentication failed".to_string(),
            )),
            _ => Err(Self::api_error("list issues", response).await),
        }
    }

    async fn get_label(&self, name: &str) -> Result<LabelLookup> {
        let url = format!("{}/labels/{}", self.repo_url, urlencoding::encode(name));

        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;

        match response.status() {
            StatusCode::OK => Ok(LabelLookup::Exists(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(LabelLookup::NotFound),
            _ => Err(Self::api_error("get label", response).await),
        }
    }

    async fn create_label(&self, label: &NewLabel) -> Result<GitHubLabel> {
        let url = format!("{}/labels", self.repo_url);

        info!(repo = %self.repository(), label = %label.name, "Creating GitHub label");

        let response = self
            .client
            .post(&url)
            .json(label)
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(response.json().await?),
            _ => Err(Self::api_error("create label", response).await),
        }
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let url = format!("{}/issues/{}/labels", self.repo_url, number);

        info!(repo = %self.repository(), number = %number, labels = ?labels, "Adding labels to GitHub issue");

        let response = self
            .client
            .post(&url)
            .json(&AddLabelsRequest { labels })
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(BridgeError::IssueNotFound(format!(
                "{}#{}",
                self.repository(),
                number
            ))),
            _ => Err(Self::api_error("add labels", response).await),
        }
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        let url = format!("{}/issues/{}/comments", self.repo_url, number);

        info!(repo = %self.repository(), number = %number, "Adding comment to GitHub issue");

        let response = self
            .client
            .post(&url)
            .json(&CreateCommentRequest { body })
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            _ => Err(Self::api_error("create comment", response).await),
        }
    }

    async fn update_issue_state(
        &self,
        number: u64,
        state: IssueState,
        reason: Option<StateReason>,
    ) -> Result<()> {
        let url = format!("{}/issues/{}", self.repo_url, number);

        info!(repo = %self.repository(), number = %number, state = ?state, reason = ?reason, "Updating GitHub issue state");

        let response = self
            .client
            .patch(&url)
            .json(&UpdateStateRequest {
                state,
                state_reason: reason,
            })
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(BridgeError::IssueNotFound(format!(
                "{}#{}",
                self.repository(),
                number
            ))),
            _ => Err(Self::api_error("update issue", response).await),
        }
    }
}
