//! JIRA Integration Adapter
//!
//! Creates issues through the Jira Cloud REST API v3.

use crate::config::JiraSettings;
use crate::integrations::adf::AdfDocument;
use crate::sync::JiraIssueDraft;
use crate::{BridgeError, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Response body of `POST /issue`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedJiraIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct CreateIssueRequest<'a> {
    fields: CreateIssueFields<'a>,
}

#[derive(Debug, Clone, Serialize)]
struct CreateIssueFields<'a> {
    project: KeyRef<'a>,
    summary: &'a str,
    description: &'a AdfDocument,
    #[serde(rename = "issuetype")]
    issue_type: NameRef<'a>,
    priority: NameRef<'a>,
    labels: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct NameRef<'a> {
    name: &'a str,
}

impl<'a> From<&'a JiraIssueDraft> for CreateIssueRequest<'a> {
    fn from(draft: &'a JiraIssueDraft) -> Self {
        Self {
            fields: CreateIssueFields {
                project: KeyRef {
                    key: &draft.project_key,
                },
                summary: &draft.summary,
                description: &draft.description,
                issue_type: NameRef {
                    name: &draft.issue_type,
                },
                priority: NameRef {
                    name: &draft.priority,
                },
                labels: &draft.labels,
            },
        }
    }
}

/// Operations the sync needs from Jira
#[async_trait]
pub trait JiraApi: Send + Sync {
    /// Create an issue from a draft and return its key
    async fn create_issue(&self, draft: &JiraIssueDraft) -> Result<CreatedJiraIssue>;

    /// Human-facing URL for an issue key
    fn browse_url(&self, key: &str) -> String;
}

/// JIRA REST client
pub struct JiraAdapter {
    client: Client,
    site_url: String,
    api_url: String,
    user_email: String,
    api_token: String,
}

impl JiraAdapter {
    /// Create a new JIRA adapter
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: JiraSettings) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()?;

        let site_url = settings.base_url.trim_end_matches('/').to_string();
        let api_url = format!("{}/rest/api/3", site_url);

        Ok(Self {
            client,
            site_url,
            api_url,
            user_email: settings.user_email,
            api_token: settings.api_token,
        })
    }
}

#[async_trait]
impl JiraApi for JiraAdapter {
    async fn create_issue(&self, draft: &JiraIssueDraft) -> Result<CreatedJiraIssue> {
        let url = format!("{}/issue", self.api_url);

        info!(
            project = %draft.project_key,
            summary = %draft.summary,
            issue_type = %draft.issue_type,
            priority = %draft.priority,
            "Creating JIRA issue"
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.user_email, Some(&self.api_token))
            .json(&CreateIssueRequest::from(draft))
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => {
                let created: CreatedJiraIssue = response.json().await?;
                debug!(key = %created.key, id = %created.id, "JIRA issue created");
                Ok(created)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(BridgeError::Jira {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.site_url, key)
    }
}
