//! Structured rich-text content as returned by the CMS "blocks" field type.
//!
//! Blocks are passed through to the presentation layer untouched: keys this
//! crate does not model (image payloads, custom attributes) are kept in
//! `extra`, and style flags are only written back when the CMS sent them.
//! The helpers here only flatten blocks to plain text for terminals and
//! search.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn paragraph_kind() -> String {
    "paragraph".to_owned()
}

fn text_kind() -> String {
    "text".to_owned()
}

/// An inline node: a styled text span, or a container such as a link or a
/// list item with nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextNode {
    #[serde(rename = "type", default = "text_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RichTextNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RichTextNode {
    /// Plain text span with no styling.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: text_kind(),
            text: Some(text.into()),
            bold: None,
            italic: None,
            underline: None,
            strikethrough: None,
            code: None,
            url: None,
            children: Vec::new(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.plain_text());
        }
        out
    }
}

/// A top-level block: paragraph, heading, list, quote, image, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type", default = "paragraph_kind")]
    pub kind: String,
    #[serde(default)]
    pub children: Vec<RichTextNode>,
    /// Heading level (1-6) for `heading` blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// `ordered` or `unordered` for `list` blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RichTextBlock {
    #[must_use]
    pub fn paragraph(children: Vec<RichTextNode>) -> Self {
        Self {
            kind: paragraph_kind(),
            children,
            level: None,
            format: None,
            extra: Map::new(),
        }
    }

    /// Concatenated text of the block. List items go on separate lines;
    /// every other block type, known or not, joins its spans.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let parts = self.children.iter().map(RichTextNode::plain_text);
        if self.kind == "list" {
            parts.collect::<Vec<_>>().join("\n")
        } else {
            parts.collect()
        }
    }

    /// A paragraph holding a single whitespace-only span. The CMS editor
    /// emits these for blank lines.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self.children.as_slice() {
            [only] => {
                self.kind == "paragraph"
                    && only.children.is_empty()
                    && only.text.as_deref().unwrap_or_default().trim().is_empty()
            }
            _ => false,
        }
    }
}

/// Flattens a block sequence to text, one block per line.
#[must_use]
pub fn blocks_plain_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(RichTextBlock::plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}
