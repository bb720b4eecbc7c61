//! Label-driven Jira field resolution
//!
//! Both resolvers walk the issue's labels in tracker order and stop at the
//! first label present in the table. When an issue carries two conflicting
//! labels (say `priority:critical` and `priority:low`) the one GitHub lists
//! first decides.

use crate::config::LabelTable;

fn first_match<'a, I>(labels: I, table: &LabelTable) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .find_map(|label| table.get(label))
        .map(str::to_string)
}

/// Jira priority name for an issue's labels
pub fn resolve_priority<'a, I>(labels: I, table: &LabelTable, default: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    first_match(labels, table).unwrap_or_else(|| default.to_string())
}

/// Jira issue-type name for an issue's labels
pub fn resolve_issue_type<'a, I>(labels: I, table: &LabelTable, default: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    first_match(labels, table).unwrap_or_else(|| default.to_string())
}
