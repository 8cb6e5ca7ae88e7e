//! Text blocks: the atomic retrieval units extracted from a page.

use serde::{Deserialize, Serialize};

use crate::{segmenter, url_title};

/// Kind of retrievable block. Currently only prose text; the payload keeps
/// the tag so future block kinds (code, tables) can share the index.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Text,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clean, immutable unit of retrievable text extracted from a page.
///
/// `content` is non-empty, trimmed, and free of residual Markdown link and
/// image syntax (pilcrow permalinks excepted).
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub source_url: String,
    pub title: String,
    pub content: String,
    pub block_type: BlockType,
}

/// The payload shape persisted next to each vector. Field names are fixed
/// by the index format; `block_type` stays a plain string so payloads
/// written with future block kinds still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPayload {
    pub text: String,
    pub url: String,
    pub section_anchor: String,
    pub block_type: String,
}

impl TextBlock {
    /// Segment one page into its text block.
    ///
    /// Returns `None` when segmentation finds no body content (a page
    /// without the boundary marker). The block content is the surviving
    /// paragraphs joined by single newlines; the title is the URL slug.
    pub fn from_page(url: &str, markdown: &str) -> Option<TextBlock> {
        let paragraphs = segmenter::segment(markdown);
        if paragraphs.is_empty() {
            return None;
        }

        Some(TextBlock {
            source_url: url.to_string(),
            title: url_title::extract_title(url),
            content: paragraphs.join("\n"),
            block_type: BlockType::Text,
        })
    }

    /// The payload stored with this block's vector.
    pub fn payload(&self) -> BlockPayload {
        BlockPayload {
            text: self.content.clone(),
            url: self.source_url.clone(),
            section_anchor: self.title.clone(),
            block_type: self.block_type.as_str().to_string(),
        }
    }
}
