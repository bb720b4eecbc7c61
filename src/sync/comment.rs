//! Closing comment posted on the GitHub issue after a sync

use super::draft::JiraIssueDraft;
use chrono::{DateTime, SecondsFormat, Utc};

/// Markdown comment linking the GitHub issue to its Jira counterpart
pub fn closing_comment(
    jira_key: &str,
    jira_url: &str,
    draft: &JiraIssueDraft,
    synced_at: DateTime<Utc>,
) -> String {
    let rows = [
        ("Jira Issue", format!("[{}]({})", jira_key, jira_url)),
        ("Project", format!("`{}`", draft.project_key)),
        ("Type", draft.issue_type.clone()),
        ("Priority", draft.priority.clone()),
        (
            "Synced At",
            synced_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
    ];

    let mut body = format!(
        "This issue has been migrated to Jira: [{}]({})\n\n\
         Further tracking happens in Jira, so this issue is being closed.\n\n\
         | Field | Value |\n\
         |-------|-------|\n",
        jira_key, jira_url
    );
    for (field, value) in rows {
        body.push_str(&format!("| {} | {} |\n", field, value));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::adf::AdfDocument;
    use chrono::TimeZone;

    #[test]
    fn test_comment_contents() {
        let draft = JiraIssueDraft {
            project_key: "WID".to_string(),
            summary: "Handle retries".to_string(),
            description: AdfDocument::default(),
            issue_type: "Bug".to_string(),
            priority: "High".to_string(),
            labels: vec![],
        };
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let body = closing_comment(
            "WID-9",
            "https://acme.atlassian.net/browse/WID-9",
            &draft,
            at,
        );

        assert!(body.starts_with(
            "This issue has been migrated to Jira: [WID-9](https://acme.atlassian.net/browse/WID-9)"
        ));
        assert!(body.contains("| Project | `WID` |"));
        assert!(body.contains("| Type | Bug |"));
        assert!(body.contains("| Priority | High |"));
        assert!(body.contains("| Synced At | 2026-03-01T12:30:00Z |"));
    }
}
