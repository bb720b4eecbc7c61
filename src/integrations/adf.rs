//! Atlassian Document Format
//!
//! The structured body Jira Cloud's v3 API expects for rich-text fields.
//! Only the node kinds the bridge emits are modelled.

use serde::Serialize;

/// Root `doc` node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdfDocument {
    pub version: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    pub content: Vec<AdfNode>,
}

impl AdfDocument {
    pub fn new(content: Vec<AdfNode>) -> Self {
        Self {
            version: 1,
            kind: "doc",
            content,
        }
    }
}

impl Default for AdfDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Block and inline nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdfNode {
    Paragraph {
        content: Vec<AdfNode>,
    },
    Blockquote {
        content: Vec<AdfNode>,
    },
    Heading {
        attrs: HeadingAttrs,
        content: Vec<AdfNode>,
    },
    Table {
        content: Vec<AdfNode>,
    },
    TableRow {
        content: Vec<AdfNode>,
    },
    TableCell {
        content: Vec<AdfNode>,
    },
    CodeBlock {
        attrs: CodeBlockAttrs,
        content: Vec<AdfNode>,
    },
    Text {
        text: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        marks: Vec<AdfMark>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingAttrs {
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlockAttrs {
    pub language: String,
}

/// Inline text formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdfMark {
    Strong,
    Code,
    Link { attrs: LinkAttrs },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAttrs {
    pub href: String,
}

impl AdfNode {
    pub fn text(text: impl Into<String>) -> Self {
        AdfNode::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<AdfMark>) -> Self {
        AdfNode::Text {
            text: text.into(),
            marks,
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::marked_text(
            text,
            vec![AdfMark::Link {
                attrs: LinkAttrs { href: href.into() },
            }],
        )
    }

    pub fn paragraph(content: Vec<AdfNode>) -> Self {
        AdfNode::Paragraph { content }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        AdfNode::Heading {
            attrs: HeadingAttrs { level },
            content: vec![Self::text(text)],
        }
    }

    pub fn code_block(language: impl Into<String>, code: impl Into<String>) -> Self {
        let code = code.into();
        // ADF rejects empty text nodes
        let content = if code.is_empty() {
            Vec::new()
        } else {
            vec![Self::text(code)]
        };
        AdfNode::CodeBlock {
            attrs: CodeBlockAttrs {
                language: language.into(),
            },
            content,
        }
    }

    /// A row of single-paragraph cells
    pub fn table_row(cells: Vec<Vec<AdfNode>>) -> Self {
        AdfNode::TableRow {
            content: cells
                .into_iter()
                .map(|inline| AdfNode::TableCell {
                    content: vec![Self::paragraph(inline)],
                })
                .collect(),
        }
    }

    /// Child nodes, empty for text
    pub fn children(&self) -> &[AdfNode] {
        match self {
            AdfNode::Paragraph { content }
            | AdfNode::Blockquote { content }
            | AdfNode::Heading { content, .. }
            | AdfNode::Table { content }
            | AdfNode::TableRow { content }
            | AdfNode::TableCell { content }
            | AdfNode::CodeBlock { content, .. } => content,
            AdfNode::Text { .. } => &[],
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn plain_text(&self) -> String {
        match self {
            AdfNode::Text { text, .. } => text.clone(),
            other => other.children().iter().map(AdfNode::plain_text).collect(),
        }
    }
}
