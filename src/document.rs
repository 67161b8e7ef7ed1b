//! Document model adapter
//!
//! Owns the ordered block sequence of a document and is the only way to
//! mutate it. Every mutation keeps the id → position index in sync, notifies
//! subscribers, and guarantees the document is never left malformed: when a
//! mutation cannot be applied the adapter logs the failure and falls back to a
//! single empty paragraph instead.

mod block;
pub mod markdown;

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;

pub use block::{
    Block, BlockType, BlockUpdate, InlineContent, InlineSpan, Styles, new_block_id,
};

/// Errors reported by document mutations
///
/// By the time one of these is returned the document has already been
/// brought back to a valid state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Duplicate block id: {0}")]
    DuplicateId(String),

    #[error("Replacement document is empty")]
    EmptyReplacement,

    #[error("Invalid document JSON: {0}")]
    InvalidJson(String),
}

/// Change notification emitted after every applied mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentChange {
    Inserted { ids: Vec<String> },
    Updated { id: String },
    Removed { id: String },
    Replaced,
}

/// Extract the plain text of a block
///
/// Concatenates every text span (including link text). Non-text blocks and
/// inline nodes the core does not understand contribute nothing.
pub fn extract_text(block: &Block) -> String {
    if block.block_type == BlockType::Other {
        return String::new();
    }
    content_text(&block.content)
}

/// Plain text of a run of inline content
pub fn content_text(content: &[InlineContent]) -> String {
    let mut text = String::new();
    for item in content {
        match item {
            InlineContent::Text(span) => text.push_str(&span.text),
            InlineContent::Link { content, .. } => {
                for span in content {
                    text.push_str(&span.text);
                }
            }
            InlineContent::Unsupported => log::debug!("Skipping unsupported inline content"),
        }
    }
    text
}

/// Ordered block sequence with an incrementally maintained id index
#[derive(Debug)]
pub struct Document {
    blocks: Vec<Block>,
    index: HashMap<String, usize>,
    subscribers: Vec<Sender<DocumentChange>>,
}

/// Clones the blocks only; subscribers stay with the original
impl Clone for Document {
    fn clone(&self) -> Self {
        Self {
            blocks: self.blocks.clone(),
            index: self.index.clone(),
            subscribers: Vec::new(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// Create a document from blocks
    ///
    /// An empty sequence becomes a single empty paragraph. Blocks with ids
    /// already seen are given fresh ids.
    pub fn new(blocks: Vec<Block>) -> Self {
        let mut seen = HashSet::new();
        let mut blocks: Vec<Block> = blocks
            .into_iter()
            .map(|mut block| {
                if !seen.insert(block.id.clone()) {
                    log::warn!("Duplicate block id {} on load, assigning a new one", block.id);
                    block.id = new_block_id();
                    seen.insert(block.id.clone());
                }
                block
            })
            .collect();

        if blocks.is_empty() {
            blocks.push(Block::empty_paragraph());
        }

        let mut document = Self {
            blocks,
            index: HashMap::new(),
            subscribers: Vec::new(),
        };
        document.reindex_from(0);
        document
    }

    /// Parse a document from the editor's JSON block array
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let blocks: Vec<Block> =
            serde_json::from_str(json).map_err(|e| DocumentError::InvalidJson(e.to_string()))?;
        Ok(Self::new(blocks))
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn position(&self, block_id: &str) -> Option<usize> {
        self.index.get(block_id).copied()
    }

    pub fn get(&self, block_id: &str) -> Option<&Block> {
        self.position(block_id).map(|pos| &self.blocks[pos])
    }

    pub fn contains(&self, block_id: &str) -> bool {
        self.index.contains_key(block_id)
    }

    /// Plain text of a block by id, empty when the block does not exist
    pub fn text_of(&self, block_id: &str) -> String {
        self.get(block_id).map(extract_text).unwrap_or_default()
    }

    /// Subscribe to change notifications
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<DocumentChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Insert blocks immediately after `after_id`, preserving their order
    pub fn insert_blocks(
        &mut self,
        new_blocks: Vec<Block>,
        after_id: &str,
    ) -> Result<(), DocumentError> {
        if new_blocks.is_empty() {
            return Ok(());
        }

        let result = self.validate_insert(&new_blocks, after_id);
        let position = match result {
            Ok(position) => position,
            Err(e) => {
                log::error!("insert_blocks after {} failed: {}", after_id, e);
                self.insert_placeholder(self.position(after_id).map(|p| p + 1));
                return Err(e);
            }
        };

        let ids: Vec<String> = new_blocks.iter().map(|b| b.id.clone()).collect();
        let at = position + 1;
        self.blocks.splice(at..at, new_blocks);
        self.reindex_from(at);
        self.notify(DocumentChange::Inserted { ids });
        Ok(())
    }

    /// Atomically replace the entire block sequence
    ///
    /// The new sequence is validated and indexed before it is swapped in, so
    /// readers only ever see the old or the new document.
    pub fn replace_all(&mut self, new_blocks: Vec<Block>) -> Result<(), DocumentError> {
        if let Err(e) = validate_replacement(&new_blocks) {
            log::error!("replace_all failed: {}", e);
            self.swap_in(vec![Block::empty_paragraph()]);
            return Err(e);
        }

        self.swap_in(new_blocks);
        Ok(())
    }

    /// Mutate a single block's content or type without changing its id
    pub fn update_block(&mut self, block_id: &str, update: BlockUpdate) -> Result<(), DocumentError> {
        let Some(position) = self.position(block_id) else {
            log::error!("update_block failed: block {} not found", block_id);
            return Err(DocumentError::BlockNotFound(block_id.to_string()));
        };

        update.apply(&mut self.blocks[position]);
        self.notify(DocumentChange::Updated {
            id: block_id.to_string(),
        });
        Ok(())
    }

    /// Remove a block; the last remaining block is replaced by an empty paragraph
    pub fn remove_block(&mut self, block_id: &str) -> Result<(), DocumentError> {
        let Some(position) = self.position(block_id) else {
            log::error!("remove_block failed: block {} not found", block_id);
            return Err(DocumentError::BlockNotFound(block_id.to_string()));
        };

        self.blocks.remove(position);
        self.index.remove(block_id);
        if self.blocks.is_empty() {
            self.blocks.push(Block::empty_paragraph());
        }
        self.reindex_from(position.min(self.blocks.len() - 1));
        self.notify(DocumentChange::Removed {
            id: block_id.to_string(),
        });
        Ok(())
    }

    /// Nearest heading at or before `position`
    pub fn heading_at_or_before(&self, position: usize) -> Option<(usize, &Block)> {
        let end = position.min(self.blocks.len().checked_sub(1)?);
        self.blocks[..=end]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, block)| block.is_heading())
    }

    fn validate_insert(&self, new_blocks: &[Block], after_id: &str) -> Result<usize, DocumentError> {
        let position = self
            .position(after_id)
            .ok_or_else(|| DocumentError::BlockNotFound(after_id.to_string()))?;

        let mut seen = HashSet::new();
        for block in new_blocks {
            if self.contains(&block.id) || !seen.insert(block.id.as_str()) {
                return Err(DocumentError::DuplicateId(block.id.clone()));
            }
        }
        Ok(position)
    }

    fn insert_placeholder(&mut self, at: Option<usize>) {
        let placeholder = Block::empty_paragraph();
        let id = placeholder.id.clone();
        let at = at.unwrap_or(self.blocks.len()).min(self.blocks.len());
        self.blocks.insert(at, placeholder);
        self.reindex_from(at);
        log::warn!("Inserted empty paragraph {} as fallback", id);
        self.notify(DocumentChange::Inserted { ids: vec![id] });
    }

    fn swap_in(&mut self, blocks: Vec<Block>) {
        let index = blocks
            .iter()
            .enumerate()
            .map(|(pos, block)| (block.id.clone(), pos))
            .collect();
        self.blocks = blocks;
        self.index = index;
        self.notify(DocumentChange::Replaced);
    }

    fn reindex_from(&mut self, start: usize) {
        for (pos, block) in self.blocks.iter().enumerate().skip(start) {
            self.index.insert(block.id.clone(), pos);
        }
    }

    fn notify(&mut self, change: DocumentChange) {
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }
}

fn validate_replacement(blocks: &[Block]) -> Result<(), DocumentError> {
    if blocks.is_empty() {
        return Err(DocumentError::EmptyReplacement);
    }
    let mut seen = HashSet::new();
    for block in blocks {
        if !seen.insert(block.id.as_str()) {
            return Err(DocumentError::DuplicateId(block.id.clone()));
        }
    }
    Ok(())
}
