//! Story body rendering.
//!
//! A line starting with `## ` is a subheading; every other non-blank line
//! is a paragraph.

use serde::Serialize;

const HEADING_MARKER: &str = "## ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading(String),
    Paragraph(String),
}

/// Split `content` into display blocks.
pub fn render(content: &str) -> Vec<ContentBlock> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.strip_prefix(HEADING_MARKER) {
            Some(heading) => ContentBlock::Heading(heading.to_string()),
            None => ContentBlock::Paragraph(line.to_string()),
        })
        .collect()
}
