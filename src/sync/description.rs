//! Jira description composition
//!
//! Turns an issue and its extracted metadata into a fixed-shape ADF document:
//! provenance paragraph, quoted TODO text, a details table, and an optional
//! code excerpt.

use super::extract::IssueMetadata;
use crate::integrations::adf::{AdfDocument, AdfMark, AdfNode};
use crate::integrations::GitHubIssue;

/// Opening paragraph of every generated description
pub const PROVENANCE_TEXT: &str =
    "This issue was automatically created from a GitHub issue by the GitHub to Jira sync.";

/// Code-block language used when the fence tag is missing or unknown
pub const FALLBACK_LANGUAGE: &str = "text";

/// Map a fence info string to a Jira code-block language id
pub fn normalize_language(tag: Option<&str>) -> &'static str {
    let Some(tag) = tag else {
        return FALLBACK_LANGUAGE;
    };
    match tag.trim().to_lowercase().as_str() {
        "rust" | "rs" => "rust",
        "python" | "py" => "python",
        "javascript" | "js" | "jsx" => "javascript",
        "typescript" | "ts" | "tsx" => "typescript",
        "go" | "golang" => "go",
        "java" => "java",
        "kotlin" | "kt" => "kotlin",
        "scala" => "scala",
        "swift" => "swift",
        "c" | "h" => "c",
        "cpp" | "c++" | "cc" | "hpp" => "cpp",
        "csharp" | "c#" | "cs" => "csharp",
        "ruby" | "rb" => "ruby",
        "php" => "php",
        "bash" | "sh" | "shell" | "zsh" => "bash",
        "sql" => "sql",
        "yaml" | "yml" => "yaml",
        "json" => "json",
        "xml" => "xml",
        "html" => "html",
        "css" => "css",
        "markdown" | "md" => "markdown",
        "dockerfile" | "docker" => "dockerfile",
        "text" | "txt" | "plain" | "plaintext" => "text",
        _ => FALLBACK_LANGUAGE,
    }
}

fn detail_row(label: &str, value: &str) -> AdfNode {
    AdfNode::table_row(vec![
        vec![AdfNode::marked_text(label, vec![AdfMark::Strong])],
        vec![AdfNode::marked_text(value, vec![AdfMark::Code])],
    ])
}

/// Build the description document for `issue`
///
/// Absent metadata shortens the document; it never fails.
pub fn compose_description(issue: &GitHubIssue, meta: &IssueMetadata) -> AdfDocument {
    let mut content = Vec::new();

    content.push(AdfNode::paragraph(vec![AdfNode::text(PROVENANCE_TEXT)]));

    let quoted = meta
        .todo
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&issue.title);
    content.push(AdfNode::Blockquote {
        content: vec![AdfNode::paragraph(vec![AdfNode::text(quoted)])],
    });

    content.push(AdfNode::heading(3, "Details"));

    let fields = [
        ("File", &meta.file),
        ("Line", &meta.line),
        ("Branch", &meta.branch),
        ("Commit", &meta.commit),
        ("Introduced", &meta.introduced),
        ("Author", &meta.author),
    ];
    let mut rows: Vec<AdfNode> = fields
        .iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| detail_row(label, v))
        })
        .collect();
    rows.push(AdfNode::table_row(vec![
        vec![AdfNode::marked_text("GitHub Issue", vec![AdfMark::Strong])],
        vec![AdfNode::link(
            format!("#{}", issue.number),
            issue.html_url.clone(),
        )],
    ]));
    content.push(AdfNode::Table { content: rows });

    if let Some(code) = &meta.code {
        content.push(AdfNode::heading(3, "Code Context"));
        content.push(AdfNode::code_block(
            normalize_language(code.language.as_deref()),
            code.code.clone(),
        ));
    }

    AdfDocument::new(content)
}
