//! Streaming insertion engine
//!
//! Reveals generated text into a block word by word, then waits for the user
//! to accept or revert it. Headings are never written into: streaming into a
//! heading first inserts an empty paragraph after it and reveals there.
//!
//! The target stays editable while words are revealed. Every step rebases on
//! the target's current content: the generated span is found and replaced,
//! and anything else in the block belongs to the user. If the user edits the
//! generated words themselves, the words shown so far become the user's and
//! later words are appended after them.
//!
//! ```text
//! Idle --start--> Revealing --last word--> AwaitingDecision
//!   ^                 |                          |
//!   +---- accept / revert / restart -------------+
//! ```

use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::document::{Block, BlockUpdate, Document, DocumentError, InlineContent, content_text};
use crate::revision::{RevisionTag, RevisionTracker};

pub const DEFAULT_WORD_DELAY_MS: u64 = 40;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamingError {
    #[error("Another generation is still being streamed")]
    AlreadyStreaming,

    #[error("Nothing is being streamed")]
    NotStreaming,

    #[error("Streaming target not found: {0}")]
    TargetNotFound(String),

    #[error("Generated text is empty")]
    EmptyText,

    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamingPhase {
    #[default]
    Idle,
    Revealing,
    /// Everything is visible; accept/revert/restart controls are shown
    AwaitingDecision,
}

/// An in-progress stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingState {
    /// Block the generation was requested for
    pub anchor_block_id: String,
    /// Block receiving the text; differs from the anchor for heading anchors
    pub target_block_id: String,
    /// Target as it was before anything was revealed
    pub original_block: Block,
    /// Target was created by this stream
    pub inserted_block: bool,
    words: Vec<String>,
    revealed: usize,
    /// Leading words taken over by a user edit
    absorbed: usize,
    /// Generated span currently in the target
    shown: Option<InlineContent>,
}

impl StreamingState {
    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    pub fn revealed_words(&self) -> usize {
        self.revealed
    }

    /// Generated words shown so far, space-joined
    pub fn revealed_text(&self) -> String {
        self.words[..self.revealed].join(" ")
    }

    pub fn full_text(&self) -> String {
        self.words.join(" ")
    }

    pub fn progress(&self) -> u8 {
        if self.words.is_empty() {
            return 100;
        }
        (self.revealed * 100 / self.words.len()) as u8
    }

    /// Split the target's current content into the user's part and the
    /// number of leading words the user has taken over
    fn user_content(&self, current: &[InlineContent]) -> (Vec<InlineContent>, usize) {
        let mut content = current.to_vec();
        let Some(shown) = &self.shown else {
            return (content, self.absorbed);
        };

        match content.iter().rposition(|item| item == shown) {
            Some(position) => {
                content.remove(position);
                (content, self.absorbed)
            }
            // Generated span was edited; what is there now is the user's
            None => (content, self.revealed),
        }
    }

    /// Target content with the first `revealed` words showing
    fn rebased(&self, current: &[InlineContent], revealed: usize) -> Rendered {
        let (mut content, absorbed) = self.user_content(current);
        let absorbed = absorbed.min(revealed);

        let shown = (revealed > absorbed).then(|| {
            let existing = content_text(&content);
            let separator = if existing.is_empty() || existing.ends_with(char::is_whitespace) {
                ""
            } else {
                " "
            };
            InlineContent::text(format!(
                "{}{}",
                separator,
                self.words[absorbed..revealed].join(" ")
            ))
        });
        if let Some(span) = &shown {
            content.push(span.clone());
        }

        Rendered {
            content,
            absorbed,
            shown,
        }
    }
}

/// Result of rebasing the reveal on the target's current content
struct Rendered {
    content: Vec<InlineContent>,
    absorbed: usize,
    shown: Option<InlineContent>,
}

/// What `revert` did to the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertOutcome {
    /// Target content restored and tagged for review
    Restored(String),
    /// Target had been inserted by the stream and was removed again
    Removed(String),
}

#[derive(Debug, Default)]
pub struct StreamingEngine {
    phase: StreamingPhase,
    state: Option<StreamingState>,
}

impl StreamingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> StreamingPhase {
        self.phase
    }

    pub fn is_streaming(&self) -> bool {
        self.phase != StreamingPhase::Idle
    }

    pub fn controls_visible(&self) -> bool {
        self.phase == StreamingPhase::AwaitingDecision
    }

    pub fn state(&self) -> Option<&StreamingState> {
        self.state.as_ref()
    }

    pub fn progress(&self) -> u8 {
        self.state.as_ref().map_or(0, StreamingState::progress)
    }

    /// Begin revealing `text` into `target_id`
    pub fn start(
        &mut self,
        document: &mut Document,
        target_id: &str,
        text: &str,
    ) -> Result<(), StreamingError> {
        if self.is_streaming() {
            return Err(StreamingError::AlreadyStreaming);
        }

        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return Err(StreamingError::EmptyText);
        }

        let target = document
            .get(target_id)
            .ok_or_else(|| StreamingError::TargetNotFound(target_id.to_string()))?;

        let (original_block, inserted_block) = if target.is_heading() {
            let paragraph = Block::empty_paragraph();
            document.insert_blocks(vec![paragraph.clone()], target_id)?;
            (paragraph, true)
        } else {
            (target.clone(), false)
        };

        log::debug!(
            "Streaming {} words into {} (anchor {})",
            words.len(),
            original_block.id,
            target_id
        );

        self.state = Some(StreamingState {
            anchor_block_id: target_id.to_string(),
            target_block_id: original_block.id.clone(),
            original_block,
            inserted_block,
            words,
            revealed: 0,
            absorbed: 0,
            shown: None,
        });
        self.phase = StreamingPhase::Revealing;
        Ok(())
    }

    /// Reveal one more word; returns whether words remain
    pub fn advance(&mut self, document: &mut Document) -> Result<bool, StreamingError> {
        let state = self.state.as_mut().ok_or(StreamingError::NotStreaming)?;
        if state.revealed >= state.words.len() {
            return Ok(false);
        }

        let next = state.revealed + 1;
        Self::render(state, document, next)?;
        let remaining = state.revealed < state.words.len();
        if !remaining {
            self.phase = StreamingPhase::AwaitingDecision;
        }
        Ok(remaining)
    }

    /// Show the whole text at once
    pub fn reveal_all(&mut self, document: &mut Document) -> Result<(), StreamingError> {
        let state = self.state.as_mut().ok_or(StreamingError::NotStreaming)?;
        let total = state.words.len();
        if state.revealed < total {
            Self::render(state, document, total)?;
        }
        self.phase = StreamingPhase::AwaitingDecision;
        Ok(())
    }

    /// Reveal a word every `word_delay` until done or cancelled
    ///
    /// Cancelling stops the reveal; the stream stays open for accept/revert.
    pub async fn run(
        &mut self,
        document: &mut Document,
        word_delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), StreamingError> {
        if self.state.is_none() {
            return Err(StreamingError::NotStreaming);
        }
        if word_delay.is_zero() {
            return self.reveal_all(document);
        }

        let mut ticker = tokio::time::interval(word_delay);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        while self.advance(document)? {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::debug!("Reveal cancelled at {}%", self.progress());
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }
        }
        Ok(())
    }

    /// Commit the generated text and tag the target `ai-generated`
    ///
    /// If the target is gone the stream is dropped and `TargetNotFound`
    /// returned.
    pub fn accept(
        &mut self,
        document: &mut Document,
        revisions: &mut RevisionTracker,
    ) -> Result<String, StreamingError> {
        self.ensure_target(document)?;
        self.reveal_all(document)?;
        let state = self.finish()?;
        revisions.set(&state.target_block_id, RevisionTag::AiGenerated, None);
        log::debug!("Accepted generated text in {}", state.target_block_id);
        Ok(state.target_block_id)
    }

    /// Take the generated words back out of the target
    ///
    /// User edits made during the stream are kept. A paragraph inserted by
    /// the stream that is left empty is removed again.
    pub fn revert(
        &mut self,
        document: &mut Document,
        revisions: &mut RevisionTracker,
    ) -> Result<RevertOutcome, StreamingError> {
        self.ensure_target(document)?;
        let state = self.finish()?;
        let id = state.target_block_id.clone();
        let current = document
            .get(&id)
            .map(|block| block.content.clone())
            .unwrap_or_default();
        let (content, _) = state.user_content(&current);

        if state.inserted_block && content_text(&content).is_empty() {
            document.remove_block(&id)?;
            revisions.clear(&id);
            log::debug!("Reverted stream by removing inserted block {}", id);
            return Ok(RevertOutcome::Removed(id));
        }

        document.update_block(&id, BlockUpdate::content(content))?;
        revisions.set(
            &id,
            RevisionTag::NeedsReview,
            Some("AI suggestion reverted".to_string()),
        );
        log::debug!("Reverted stream in {}", id);
        Ok(RevertOutcome::Restored(id))
    }

    /// Revert and return the anchor block the generation should be re-issued for
    pub fn restart(
        &mut self,
        document: &mut Document,
        revisions: &mut RevisionTracker,
    ) -> Result<String, StreamingError> {
        let anchor = self
            .state
            .as_ref()
            .map(|s| s.anchor_block_id.clone())
            .ok_or(StreamingError::NotStreaming)?;
        self.revert(document, revisions)?;
        Ok(anchor)
    }

    /// Drop the stream without touching the document
    pub fn abandon(&mut self) -> Option<StreamingState> {
        let state = self.state.take();
        self.phase = StreamingPhase::Idle;
        state
    }

    /// Whether a stream is open whose target has been removed
    pub fn target_missing(&self, document: &Document) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| !document.contains(&state.target_block_id))
    }

    fn ensure_target(&mut self, document: &Document) -> Result<(), StreamingError> {
        if self.target_missing(document)
            && let Some(state) = self.abandon()
        {
            log::warn!("Streaming target {} was removed", state.target_block_id);
            return Err(StreamingError::TargetNotFound(state.target_block_id));
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<StreamingState, StreamingError> {
        let state = self.state.take().ok_or(StreamingError::NotStreaming)?;
        self.phase = StreamingPhase::Idle;
        Ok(state)
    }

    /// Show the first `revealed` words; state only moves once the document has
    fn render(
        state: &mut StreamingState,
        document: &mut Document,
        revealed: usize,
    ) -> Result<(), StreamingError> {
        let current = document
            .get(&state.target_block_id)
            .map(|block| block.content.clone())
            .ok_or_else(|| StreamingError::TargetNotFound(state.target_block_id.clone()))?;
        let rendered = state.rebased(&current, revealed);

        document.update_block(&state.target_block_id, BlockUpdate::content(rendered.content))?;
        state.revealed = revealed;
        state.absorbed = rendered.absorbed;
        state.shown = rendered.shown;
        Ok(())
    }
}

#[cfg(test)]
#[path = "streaming_tests.rs"]
mod streaming_tests;
