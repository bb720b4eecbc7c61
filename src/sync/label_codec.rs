//! Sync label encoding
//!
//! A GitHub label named `jira:<PROJECT>-<NUMBER>` is the only record that an
//! issue has been mirrored, and its suffix is the Jira key.

use lazy_static::lazy_static;
use regex::Regex;

/// Prefix shared by every sync label
pub const SYNC_LABEL_PREFIX: &str = "jira:";

lazy_static! {
    static ref SYNC_LABEL: Regex = Regex::new(r"^jira:([A-Z][A-Z0-9]*-[0-9]+)$").unwrap();
    static ref JIRA_KEY: Regex = Regex::new(r"^[A-Z][A-Z0-9]*-[0-9]+$").unwrap();
    static ref PROJECT_KEY: Regex = Regex::new(r"^[A-Z][A-Z0-9]*$").unwrap();
}

/// Jira key from the first sync label, in label order
pub fn extract_sync_key<'a, I>(labels: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .find_map(|name| SYNC_LABEL.captures(name))
        .map(|caps| caps[1].to_string())
}

/// Label name recording `jira_key`
///
/// Only call with a key returned by a successful Jira create.
pub fn build_sync_label_name(jira_key: &str) -> String {
    format!("{}{}", SYNC_LABEL_PREFIX, jira_key)
}

/// Whether `key` looks like `PROJ-123`
pub fn is_valid_jira_key(key: &str) -> bool {
    JIRA_KEY.is_match(key)
}

/// Whether `key` looks like `PROJ`
pub fn is_valid_project_key(key: &str) -> bool {
    PROJECT_KEY.is_match(key)
}
