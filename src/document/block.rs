//! Block and inline content types
//!
//! Mirrors the JSON shape the host editor uses for its blocks, so documents
//! can be loaded from and written back to the same files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a block in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Heading,
    #[default]
    Paragraph,
    BulletListItem,
    NumberedListItem,
    CheckListItem,
    /// Images, tables, formulas and anything else without plain text
    #[serde(other)]
    Other,
}

impl BlockType {
    pub fn is_heading(self) -> bool {
        self == BlockType::Heading
    }

    pub fn is_list_item(self) -> bool {
        matches!(
            self,
            BlockType::BulletListItem | BlockType::NumberedListItem | BlockType::CheckListItem
        )
    }
}

/// Inline styling flags for a text span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Styles {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub code: bool,
}

/// A run of text sharing the same styles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InlineSpan {
    pub text: String,
    #[serde(default)]
    pub styles: Styles,
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: Styles::default(),
        }
    }

    pub fn styled(text: impl Into<String>, styles: Styles) -> Self {
        Self {
            text: text.into(),
            styles,
        }
    }
}

/// One element of a block's inline content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineContent {
    Text(InlineSpan),
    Link { href: String, content: Vec<InlineSpan> },
    /// Mentions, inline formulas and other nodes the core does not read
    #[serde(other)]
    Unsupported,
}

impl InlineContent {
    pub fn text(text: impl Into<String>) -> Self {
        InlineContent::Text(InlineSpan::plain(text))
    }
}

fn default_level() -> u8 {
    1
}

fn is_default_level(level: &u8) -> bool {
    *level == 1
}

/// A node in the ordered block sequence of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Heading level (1-3); ignored for other block types
    #[serde(default = "default_level", skip_serializing_if = "is_default_level")]
    pub level: u8,
    #[serde(default)]
    pub content: Vec<InlineContent>,
    /// Check list state; ignored for other block types
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
}

/// Generate a fresh block identifier
pub fn new_block_id() -> String {
    Uuid::new_v4().to_string()
}

impl Block {
    pub fn new(block_type: BlockType, content: Vec<InlineContent>) -> Self {
        Self {
            id: new_block_id(),
            block_type,
            level: 1,
            content,
            checked: false,
        }
    }

    /// Replace the generated id, mostly useful for fixtures
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn heading(text: &str, level: u8) -> Self {
        let mut block = Self::new(BlockType::Heading, text_content(text));
        block.level = level.clamp(1, 3);
        block
    }

    pub fn paragraph(text: &str) -> Self {
        Self::new(BlockType::Paragraph, text_content(text))
    }

    pub fn empty_paragraph() -> Self {
        Self::new(BlockType::Paragraph, Vec::new())
    }

    pub fn bullet(text: &str) -> Self {
        Self::new(BlockType::BulletListItem, text_content(text))
    }

    pub fn numbered(text: &str) -> Self {
        Self::new(BlockType::NumberedListItem, text_content(text))
    }

    pub fn check(text: &str) -> Self {
        Self::new(BlockType::CheckListItem, text_content(text))
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn is_heading(&self) -> bool {
        self.block_type.is_heading()
    }
}

fn text_content(text: &str) -> Vec<InlineContent> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![InlineContent::text(text)]
    }
}

/// Partial update applied to a block in place; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockUpdate {
    pub block_type: Option<BlockType>,
    pub level: Option<u8>,
    pub content: Option<Vec<InlineContent>>,
}

impl BlockUpdate {
    pub fn content(content: Vec<InlineContent>) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn text(text: &str) -> Self {
        Self::content(text_content(text))
    }

    pub(crate) fn apply(self, block: &mut Block) {
        if let Some(block_type) = self.block_type {
            block.block_type = block_type;
        }
        if let Some(level) = self.level {
            block.level = level;
        }
        if let Some(content) = self.content {
            block.content = content;
        }
    }
}
