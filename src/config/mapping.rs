//! Label → Jira field tables
//!
//! Tables are ordered and matched by exact, case-sensitive label name. An
//! optional YAML file can replace any of the built-in tables:
//!
//! ```yaml
//! default_priority: Medium
//! priorities:
//!   priority:critical: Highest
//!   priority:high: High
//! issue_types:
//!   bug: Bug
//!   enhancement: Story
//! ```

use crate::{BridgeError, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::Path;

/// Priority used when no label matches
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Ordered mapping from exact label name to a Jira value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    entries: Vec<(String, String)>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, keeping the original position on replace
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(label, value);
        self
    }

    /// Exact lookup
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = LabelTable::new();
        for (label, value) in iter {
            table.insert(label, value);
        }
        table
    }
}

struct LabelTableVisitor;

impl<'de> Visitor<'de> for LabelTableVisitor {
    type Value = LabelTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of label name to Jira value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<LabelTable, A::Error> {
        let mut table = LabelTable::new();
        while let Some((label, value)) = map.next_entry::<String, String>()? {
            table.insert(label, value);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for LabelTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(LabelTableVisitor)
    }
}

/// Priority and issue-type tables used when drafting Jira issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub priorities: LabelTable,
    pub issue_types: LabelTable,
    pub default_priority: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            priorities: default_priorities(),
            issue_types: default_issue_types(),
            default_priority: DEFAULT_PRIORITY.to_string(),
        }
    }
}

fn default_priorities() -> LabelTable {
    LabelTable::new()
        .with("priority:critical", "Highest")
        .with("priority:high", "High")
        .with("priority:medium", "Medium")
        .with("priority:low", "Low")
}

fn default_issue_types() -> LabelTable {
    LabelTable::new()
        .with("bug", "Bug")
        .with("enhancement", "Story")
        .with("feature", "Story")
        .with("documentation", "Task")
        .with("tech-debt", "Task")
}

/// On-disk shape; absent keys keep the built-in values
#[derive(Debug, Deserialize)]
struct MappingFile {
    #[serde(default)]
    priorities: Option<LabelTable>,
    #[serde(default)]
    issue_types: Option<LabelTable>,
    #[serde(default)]
    default_priority: Option<String>,
}

impl FieldMapping {
    /// Load a mapping file, falling back to defaults for missing sections
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading field mapping");

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: MappingFile = serde_yaml::from_str(content)?;
        let defaults = Self::default();

        let mapping = Self {
            priorities: file.priorities.unwrap_or(defaults.priorities),
            issue_types: file.issue_types.unwrap_or(defaults.issue_types),
            default_priority: file.default_priority.unwrap_or(defaults.default_priority),
        };

        mapping.check_values()?;

        tracing::debug!(
            priorities = mapping.priorities.len(),
            issue_types = mapping.issue_types.len(),
            default_priority = %mapping.default_priority,
            "Field mapping loaded"
        );

        Ok(mapping)
    }
}

impl FieldMapping {
    /// Every Jira name must be non-empty; Jira rejects an empty priority or type
    fn check_values(&self) -> Result<()> {
        if self.default_priority.trim().is_empty() {
            return Err(BridgeError::Config(
                "default_priority must not be empty".to_string(),
            ));
        }
        let tables = [
            ("priorities", &self.priorities),
            ("issue_types", &self.issue_types),
        ];
        for (section, table) in tables {
            if let Some((label, _)) = table.iter().find(|(_, value)| value.trim().is_empty()) {
                return Err(BridgeError::Config(format!(
                    "{}: label '{}' maps to an empty value",
                    section, label
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let mapping = FieldMapping::default();
        assert_eq!(mapping.priorities.get("priority:critical"), Some("Highest"));
        assert_eq!(mapping.issue_types.get("bug"), Some("Bug"));
        assert_eq!(mapping.default_priority, "Medium");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = LabelTable::new().with("bug", "Bug");
        assert_eq!(table.get("bug"), Some("Bug"));
        assert_eq!(table.get("Bug"), None);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let table = LabelTable::new()
            .with("a", "1")
            .with("b", "2")
            .with("a", "3");
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_yaml_preserves_document_order() {
        let mapping = FieldMapping::from_yaml(
            "priorities:\n  zz-urgent: Highest\n  aa-meh: Low\n  mm-normal: Medium\n",
        )
        .unwrap();
        let labels: Vec<_> = mapping.priorities.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["zz-urgent", "aa-meh", "mm-normal"]);
        // untouched sections keep defaults
        assert_eq!(mapping.issue_types, default_issue_types());
        assert_eq!(mapping.default_priority, "Medium");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_priority: Low\nissue_types:\n  kind/bug: Bug\n  kind/chore: Task"
        )
        .unwrap();

        let mapping = FieldMapping::load(file.path()).unwrap();
        assert_eq!(mapping.default_priority, "Low");
        assert_eq!(mapping.issue_types.get("kind/chore"), Some("Task"));
        assert_eq!(mapping.issue_types.get("bug"), None);
        assert_eq!(mapping.priorities, default_priorities());
    }

    #[test]
    fn test_rejects_non_map_table() {
        assert!(FieldMapping::from_yaml("priorities:\n  - High\n").is_err());
    }

    #[test]
    fn test_rejects_empty_values() {
        let err = FieldMapping::from_yaml("default_priority: \"\"\n").unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains("default_priority")));

        let err = FieldMapping::from_yaml("issue_types:\n  bug: Bug\n  chore: \"  \"\n").unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains("'chore'")));
    }
}
