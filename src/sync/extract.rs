//! Issue body metadata extraction
//!
//! Issues opened by code scanners usually carry a small metadata block:
//!
//! ```text
//! **TODO:** handle the retry case
//!
//! | Field | Value |
//! |-------|-------|
//! | **File** | `src/cache.rs` |
//! | **Line** | 42 |
//! | **Author** | @octocat |
//! ```
//!
//! followed by a fenced code block. Both table rows and `**Key:** value` lines
//! are understood. Anything unrecognised is ignored.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TABLE_ROW: Regex =
        Regex::new(r"^\s*\|\s*(?P<key>[^|]+?)\s*\|\s*(?P<value>[^|]*?)\s*\|\s*$").unwrap();
    static ref BOLD_KEY_LINE: Regex =
        Regex::new(r"^\s*(?:[-*]\s+)?\*\*(?P<key>[A-Za-z][A-Za-z ]*?)\s*:?\s*\*\*\s*:?\s*(?P<value>.*?)\s*$")
            .unwrap();
}

/// Fenced code block lifted from an issue body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Info string after the opening fence, if any
    pub language: Option<String>,
    pub code: String,
}

/// Metadata pulled from an issue body; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueMetadata {
    pub todo: Option<String>,
    pub file: Option<String>,
    pub line: Option<String>,
    pub branch: Option<String>,
    pub commit: Option<String>,
    pub introduced: Option<String>,
    pub author: Option<String>,
    pub code: Option<CodeBlock>,
}

impl IssueMetadata {
    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "todo" | "description" => &mut self.todo,
            "file" | "path" => &mut self.file,
            "line" | "line number" => &mut self.line,
            "branch" => &mut self.branch,
            "commit" | "sha" => &mut self.commit,
            "introduced" | "introduced date" | "date" => &mut self.introduced,
            "author" => &mut self.author,
            _ => return None,
        };
        Some(slot)
    }

    fn record(&mut self, raw_key: &str, raw_value: &str) {
        let key = normalize_key(raw_key);
        let Some(value) = clean_value(raw_value) else {
            return;
        };
        if let Some(slot) = self.slot(&key) {
            if slot.is_none() {
                *slot = Some(value);
            }
        }
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '*' || c == '_' || c == ':')
        .trim()
        .to_lowercase()
}

fn clean_value(raw: &str) -> Option<String> {
    let value = raw.trim().trim_matches('`').trim();
    match value {
        "" | "-" | "—" => None,
        v if v.eq_ignore_ascii_case("n/a") => None,
        v => Some(v.to_string()),
    }
}

const FENCE: &str = "```";

/// Info string of a line that opens or closes a code fence
///
/// A line holding a whole inline span (`` ```npm test``` fails ``) is not a fence.
fn fence_info(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix(FENCE)?;
    let rest = rest.trim_start_matches('`');
    if rest.contains(FENCE) {
        return None;
    }
    Some(rest.trim())
}

/// Extract metadata fields and the first fenced code block from an issue body
///
/// The first occurrence of each field wins. Lines inside code fences are not
/// scanned for fields. CRLF line endings are accepted.
pub fn extract_metadata(body: &str) -> IssueMetadata {
    let mut meta = IssueMetadata::default();
    // (info string, lines) of the fence being read
    let mut open_fence: Option<(&str, Vec<&str>)> = None;

    for line in body.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(info) = fence_info(line) {
            match open_fence.take() {
                None => {
                    open_fence = Some((info, Vec::new()));
                    continue;
                }
                // A closing fence carries no info string
                Some((language, lines)) if info.is_empty() => {
                    if meta.code.is_none() {
                        meta.code = Some(CodeBlock {
                            language: language
                                .split_whitespace()
                                .next()
                                .map(str::to_string),
                            code: lines.join("\n"),
                        });
                    }
                    continue;
                }
                Some(fence) => open_fence = Some(fence),
            }
        }

        if let Some((_, lines)) = open_fence.as_mut() {
            lines.push(line);
            continue;
        }

        if let Some(caps) = TABLE_ROW.captures(line) {
            meta.record(&caps["key"], &caps["value"]);
        } else if let Some(caps) = BOLD_KEY_LINE.captures(line) {
            meta.record(&caps["key"], &caps["value"]);
        }
    }

    meta
}
