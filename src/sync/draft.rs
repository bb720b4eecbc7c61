//! Jira issue drafting
//!
//! Combines summary derivation, field mapping and the description composer
//! into the payload for a single create call.

use super::description::compose_description;
use super::extract::extract_metadata;
use super::field_mapper::{resolve_issue_type, resolve_priority};
use crate::config::SyncSettings;
use crate::integrations::adf::AdfDocument;
use crate::integrations::GitHubIssue;
use lazy_static::lazy_static;
use regex::Regex;

/// Jira's summary field limit, in characters
pub const MAX_SUMMARY_CHARS: usize = 255;

/// Labels put on every created Jira issue
pub const PROVENANCE_LABELS: [&str; 2] = ["github-sync", "automated"];

const ELLIPSIS: &str = "...";

lazy_static! {
    static ref BRACKET_PREFIX: Regex = Regex::new(r"^\s*(?:\[[^\]]*\]\s*)+").unwrap();
}

/// Everything needed for one Jira create call
#[derive(Debug, Clone, PartialEq)]
pub struct JiraIssueDraft {
    pub project_key: String,
    pub summary: String,
    pub description: AdfDocument,
    pub issue_type: String,
    pub priority: String,
    pub labels: Vec<String>,
}

/// Jira summary for a GitHub title
///
/// Leading `[TAG]` groups are dropped (`"[TODO][P1] Fix it"` becomes `"Fix it"`).
/// A title made only of tags is kept as is.
pub fn derive_summary(title: &str) -> String {
    let stripped = BRACKET_PREFIX.replace(title, "");
    let summary = match stripped.trim() {
        "" => title.trim(),
        s => s,
    };
    clamp_summary(summary)
}

fn clamp_summary(summary: &str) -> String {
    if summary.chars().count() <= MAX_SUMMARY_CHARS {
        return summary.to_string();
    }

    let keep = MAX_SUMMARY_CHARS - ELLIPSIS.len();
    let mut clamped: String = summary.chars().take(keep).collect();

    // Drop a lone escape character left at the cut
    let trailing_backslashes = clamped.chars().rev().take_while(|&c| c == '\\').count();
    if trailing_backslashes % 2 == 1 {
        clamped.pop();
    }

    let trimmed_len = clamped.trim_end().len();
    clamped.truncate(trimmed_len);
    clamped.push_str(ELLIPSIS);
    clamped
}

/// Build the create payload for `issue`
pub fn build_draft(issue: &GitHubIssue, settings: &SyncSettings) -> JiraIssueDraft {
    let labels = issue.label_names();
    let mut meta = extract_metadata(issue.body.as_deref().unwrap_or_default());
    if meta.author.is_none() {
        meta.author = issue.user.as_ref().map(|u| format!("@{}", u.login));
    }

    JiraIssueDraft {
        project_key: settings.project_key.clone(),
        summary: derive_summary(&issue.title),
        description: compose_description(issue, &meta),
        issue_type: resolve_issue_type(
            labels.iter().copied(),
            &settings.mapping.issue_types,
            &settings.default_issue_type,
        ),
        priority: resolve_priority(
            labels.iter().copied(),
            &settings.mapping.priorities,
            &settings.mapping.default_priority,
        ),
        labels: PROVENANCE_LABELS.iter().map(|l| l.to_string()).collect(),
    }
}
