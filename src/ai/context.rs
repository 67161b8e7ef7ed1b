//! Cursor context analysis
//!
//! Classifies where the cursor sits in the document (on a heading, in the
//! first empty paragraph under one, mid-paragraph, in a list) and collects a
//! small window of preceding text. The classification picks the prompt
//! template, so it must be deterministic for a given document and cursor.

use serde::Serialize;

use crate::document::{Block, BlockType, Document, extract_text};

/// Number of blocks before the cursor included as preceding context
pub const DEFAULT_CONTEXT_WINDOW: usize = 3;

/// Where the cursor is, as far as prompting is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextType {
    /// Cursor on a heading ("judul")
    Judul,
    /// Empty paragraph directly below a heading
    UnderJudul,
    /// Inside (or continuing) a paragraph
    Paragraph,
    /// Inside a list item
    List,
    General,
}

impl ContextType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextType::Judul => "judul",
            ContextType::UnderJudul => "under_judul",
            ContextType::Paragraph => "paragraph",
            ContextType::List => "list",
            ContextType::General => "general",
        }
    }
}

/// Heading that governs the cursor position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingInfo {
    pub block_id: String,
    pub text: String,
    pub level: u8,
    pub position: usize,
}

impl HeadingInfo {
    fn from_block(block: &Block, position: usize) -> Self {
        Self {
            block_id: block.id.clone(),
            text: extract_text(block),
            level: block.level,
            position,
        }
    }
}

/// Derived description of the cursor's surroundings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursorContext {
    pub block_id: String,
    pub position: usize,
    pub block_type: BlockType,
    pub context_type: ContextType,
    pub heading: Option<HeadingInfo>,
    pub current_text: String,
    pub preceding: String,
}

/// Analyze the cursor position with the default context window
pub fn analyze(document: &Document, cursor_block_id: &str) -> Option<CursorContext> {
    analyze_with_window(document, cursor_block_id, DEFAULT_CONTEXT_WINDOW)
}

/// Analyze the cursor position, looking back at most `window` blocks
///
/// Returns `None` when the cursor block is not part of the document.
pub fn analyze_with_window(
    document: &Document,
    cursor_block_id: &str,
    window: usize,
) -> Option<CursorContext> {
    let position = document.position(cursor_block_id)?;
    let blocks = document.blocks();
    let block = &blocks[position];
    let current_text = extract_text(block);

    let heading = document
        .heading_at_or_before(position)
        .map(|(pos, heading)| HeadingInfo::from_block(heading, pos));

    let context_type = match block.block_type {
        BlockType::Heading => ContextType::Judul,
        t if t.is_list_item() => ContextType::List,
        BlockType::Paragraph => {
            let directly_under_heading = position
                .checked_sub(1)
                .is_some_and(|prev| blocks[prev].is_heading());
            if current_text.trim().is_empty() && directly_under_heading {
                ContextType::UnderJudul
            } else {
                ContextType::Paragraph
            }
        }
        _ => ContextType::General,
    };

    Some(CursorContext {
        block_id: block.id.clone(),
        position,
        block_type: block.block_type,
        context_type,
        heading,
        current_text,
        preceding: preceding_context(blocks, position, window),
    })
}

/// Text of up to `window` blocks before `position`, headings marked with `#`
fn preceding_context(blocks: &[Block], position: usize, window: usize) -> String {
    let start = position.saturating_sub(window);
    blocks[start..position]
        .iter()
        .filter_map(|block| {
            let text = extract_text(block);
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(if block.is_heading() {
                format!("{} {}", "#".repeat(block.level.max(1) as usize), text)
            } else {
                text.to_string()
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
