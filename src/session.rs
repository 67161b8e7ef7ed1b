//! Editing session controller
//!
//! One `EditorSession` per open document. It owns the document together with
//! everything that reacts to it (history, streaming, revision indicators,
//! notifications) and sequences them: edits are debounced into history, undo
//! and redo replay snapshots without recording themselves, and a generated
//! answer is either streamed into a block or replaces the whole document.
//!
//! Failures never escape as panics and never leave the document unusable.
//! Each one is reported through `notifications()` and also returned so
//! callers without a UI can react.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::ai::{
    AiError, Behavior, ContextAnchors, GenerationCoordinator, GenerationTransport, HttpTransport,
    analyze_with_window, build_prompt,
};
use crate::config::Config;
use crate::document::markdown::blocks_from_markdown;
use crate::document::{Block, Document, DocumentChange, DocumentError};
use crate::history::{HistoryDebouncer, HistoryTracker};
use crate::notification::NotificationState;
use crate::revision::{RevisionTag, RevisionTracker};
use crate::streaming::{RevertOutcome, StreamingEngine, StreamingError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Generation is already running; accept or revert the current suggestion first")]
    Busy,

    #[error("Cursor block not found: {0}")]
    CursorNotFound(String),

    #[error("No generation to restart")]
    NothingToRestart,

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Streaming(#[from] StreamingError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Parameters of the last generation, kept for restart
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingGeneration {
    cursor_block_id: String,
    topic: String,
    behavior: Behavior,
}

pub struct EditorSession<T> {
    document: Document,
    changes: Receiver<DocumentChange>,
    history: HistoryTracker,
    debouncer: HistoryDebouncer,
    streaming: StreamingEngine,
    revisions: RevisionTracker,
    notifications: NotificationState,
    coordinator: Option<GenerationCoordinator<T>>,
    config: Config,
    anchors: ContextAnchors,
    last_generation: Option<PendingGeneration>,
}

impl EditorSession<HttpTransport> {
    /// Session talking to the configured endpoint; generation is disabled
    /// when no endpoint is set
    pub fn connect(blocks: Vec<Block>, config: Config) -> Self {
        let coordinator = config.generation.endpoint().map(|endpoint| {
            GenerationCoordinator::new(
                HttpTransport::new(endpoint.to_string()),
                config.generation.session_id(),
            )
            .with_policy(config.generation.retry_policy())
            .with_stages(config.progress.stages())
            .with_force_web(config.generation.force_web)
        });
        Self::new(blocks, config, coordinator)
    }
}

impl<T: GenerationTransport> EditorSession<T> {
    /// Open a session; the initial document becomes the first history entry
    pub fn new(
        blocks: Vec<Block>,
        config: Config,
        coordinator: Option<GenerationCoordinator<T>>,
    ) -> Self {
        let mut document = Document::new(blocks);
        let changes = document.subscribe();
        let mut history = HistoryTracker::new(config.history.max_size);
        history.save_to_history(&document);

        Self {
            document,
            changes,
            history,
            debouncer: HistoryDebouncer::new(config.history.debounce_ms),
            streaming: StreamingEngine::new(),
            revisions: RevisionTracker::new(),
            notifications: NotificationState::new(),
            coordinator,
            config,
            anchors: ContextAnchors::new(),
            last_generation: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    pub fn revisions(&self) -> &RevisionTracker {
        &self.revisions
    }

    pub fn revisions_mut(&mut self) -> &mut RevisionTracker {
        &mut self.revisions
    }

    pub fn notifications(&self) -> &NotificationState {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationState {
        &mut self.notifications
    }

    pub fn streaming(&self) -> &StreamingEngine {
        &self.streaming
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.is_streaming()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn anchors(&self) -> &ContextAnchors {
        &self.anchors
    }

    pub fn is_generation_configured(&self) -> bool {
        self.coordinator.is_some()
    }

    /// Request progress (0..=100), if generation is configured
    pub fn generation_progress(&self) -> Option<tokio::sync::watch::Receiver<u8>> {
        self.coordinator.as_ref().map(GenerationCoordinator::progress)
    }

    /// Apply a user edit to the document
    ///
    /// Edits may touch the block being streamed into; the reveal carries on
    /// around them. Removing that block drops the stream.
    pub fn apply_edit<R>(&mut self, edit: impl FnOnce(&mut Document) -> R) -> R {
        let result = edit(&mut self.document);
        self.on_document_changed();
        if self.streaming.target_missing(&self.document) {
            self.streaming.abandon();
            self.end_stream();
            self.notifications
                .show_warning("AI suggestion discarded because its block was removed");
        }
        result
    }

    /// Consume pending change notifications
    ///
    /// Returns whether anything changed. Changes made while history is
    /// suppressed are not scheduled for recording.
    pub fn on_document_changed(&mut self) -> bool {
        let mut changed = false;
        let mut structure_changed = false;
        for change in self.changes.try_iter() {
            changed = true;
            structure_changed |=
                matches!(change, DocumentChange::Removed { .. } | DocumentChange::Replaced);
        }

        if structure_changed {
            self.revisions.retain_existing(&self.document);
        }
        if changed && !self.history.is_suppressed() {
            self.debouncer.schedule();
        }
        changed
    }

    /// Periodic tick: record history once edits have settled
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        self.on_document_changed();
        self.notifications.clear_if_expired();
        if self.debouncer.is_ready_at(now) {
            return self.flush_history();
        }
        false
    }

    /// Record the current document right away
    pub fn flush_history(&mut self) -> bool {
        self.debouncer.mark_complete();
        self.history.save_to_history(&self.document)
    }

    pub fn can_undo(&self) -> bool {
        !self.streaming.is_streaming() && (self.history.can_undo() || self.debouncer.has_pending())
    }

    pub fn can_redo(&self) -> bool {
        !self.streaming.is_streaming() && self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.travel(HistoryTracker::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.travel(HistoryTracker::redo)
    }

    fn travel(&mut self, step: fn(&mut HistoryTracker) -> Option<Vec<Block>>) -> bool {
        if self.streaming.is_streaming() {
            self.notifications
                .show_warning("Accept or revert the AI suggestion before undoing");
            return false;
        }

        // Settle pending edits so they are what gets undone
        self.on_document_changed();
        if self.debouncer.has_pending() {
            self.flush_history();
        }

        self.history.suppress();
        let restored = step(&mut self.history);
        let applied = match restored {
            Some(blocks) => {
                if let Err(e) = self.document.replace_all(blocks) {
                    log::error!("Failed to restore history snapshot: {}", e);
                }
                true
            }
            None => false,
        };
        self.on_document_changed();
        self.history.resume();
        applied
    }

    pub fn select_anchor(&mut self, node_id: &str) {
        self.anchors.add_node(node_id);
    }

    pub fn select_relation(&mut self, edge_id: &str) {
        self.anchors.add_edge(edge_id);
    }

    pub fn clear_anchors(&mut self) {
        self.anchors.clear();
    }

    /// Generate text for `topic` at the cursor
    ///
    /// Rewrite replaces the document immediately. Other behaviors start a
    /// stream; drive it with `reveal`/`reveal_now` and finish it with
    /// `accept` or `revert`.
    pub async fn generate(
        &mut self,
        cursor_block_id: &str,
        topic: &str,
        behavior: Behavior,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        let result = self
            .try_generate(cursor_block_id, topic, behavior, cancel)
            .await;
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    async fn try_generate(
        &mut self,
        cursor_block_id: &str,
        topic: &str,
        behavior: Behavior,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        if self.streaming.is_streaming() {
            return Err(SessionError::Busy);
        }
        let Some(coordinator) = &self.coordinator else {
            return Err(AiError::NotConfigured("no generation endpoint".to_string()).into());
        };

        let context =
            analyze_with_window(&self.document, cursor_block_id, self.config.context.window)
                .ok_or_else(|| SessionError::CursorNotFound(cursor_block_id.to_string()))?;
        log::debug!(
            "Generating ({}) for {} in {} context",
            behavior,
            cursor_block_id,
            context.context_type.as_str()
        );

        let prompt = build_prompt(&context, topic, behavior);
        let answer = coordinator.generate(&prompt, &self.anchors, cancel).await?;

        self.last_generation = Some(PendingGeneration {
            cursor_block_id: cursor_block_id.to_string(),
            topic: topic.to_string(),
            behavior,
        });

        // Whatever the user typed before asking is its own history step
        self.on_document_changed();
        if self.debouncer.has_pending() {
            self.flush_history();
        }

        match behavior {
            Behavior::Rewrite => self.apply_rewrite(&answer),
            Behavior::Add | Behavior::Cursor => self.begin_stream(cursor_block_id, &answer),
            Behavior::ContentCursor => {
                let target = context
                    .heading
                    .map(|h| h.block_id)
                    .unwrap_or_else(|| cursor_block_id.to_string());
                self.begin_stream(&target, &answer)
            }
        }
    }

    fn apply_rewrite(&mut self, answer: &str) -> Result<(), SessionError> {
        let blocks = blocks_from_markdown(answer);
        if blocks.is_empty() {
            return Err(AiError::EmptyResponse.into());
        }

        self.history.suppress();
        let replaced = self.document.replace_all(blocks);
        self.on_document_changed();
        self.history.resume();
        replaced?;

        let ids: Vec<String> = self.document.blocks().iter().map(|b| b.id.clone()).collect();
        for id in &ids {
            self.revisions.set(id, RevisionTag::AiGenerated, None);
        }
        self.flush_history();
        self.notifications.show("Document rewritten by AI");
        Ok(())
    }

    fn begin_stream(&mut self, target_block_id: &str, answer: &str) -> Result<(), SessionError> {
        self.history.suppress();
        if let Err(e) = self.streaming.start(&mut self.document, target_block_id, answer) {
            self.on_document_changed();
            self.history.resume();
            return Err(e.into());
        }
        self.on_document_changed();
        Ok(())
    }

    /// Reveal the stream word by word at the configured pace
    pub async fn reveal(&mut self, cancel: &CancellationToken) -> Result<(), SessionError> {
        let delay = self.config.streaming.word_delay();
        let result = self.streaming.run(&mut self.document, delay, cancel).await;
        self.on_document_changed();
        result.map_err(|e| self.reported(e.into()))
    }

    /// Show the remaining words at once
    pub fn reveal_now(&mut self) -> Result<(), SessionError> {
        let result = self.streaming.reveal_all(&mut self.document);
        self.on_document_changed();
        result.map_err(|e| self.reported(e.into()))
    }

    /// Keep the generated text
    pub fn accept(&mut self) -> Result<String, SessionError> {
        let id = self.finish_stream(StreamingEngine::accept)?;
        self.notifications.show("AI suggestion accepted");
        Ok(id)
    }

    /// Discard the generated text
    pub fn revert(&mut self) -> Result<RevertOutcome, SessionError> {
        let outcome = self.finish_stream(StreamingEngine::revert)?;
        self.notifications.show("AI suggestion reverted");
        Ok(outcome)
    }

    /// Discard the generated text and ask again with the same parameters
    pub async fn restart(&mut self, cancel: &CancellationToken) -> Result<(), SessionError> {
        let Some(pending) = self.last_generation.clone() else {
            return Err(self.reported(SessionError::NothingToRestart));
        };

        let anchor = self.finish_stream(StreamingEngine::restart)?;
        log::debug!("Restarting generation anchored at {}", anchor);

        self.generate(&pending.cursor_block_id, &pending.topic, pending.behavior, cancel)
            .await
    }

    /// Run a stream-ending operation; history only resumes once the stream
    /// is actually over
    fn finish_stream<R>(
        &mut self,
        finish: impl FnOnce(
            &mut StreamingEngine,
            &mut Document,
            &mut RevisionTracker,
        ) -> Result<R, StreamingError>,
    ) -> Result<R, SessionError> {
        let was_streaming = self.streaming.is_streaming();
        let result = finish(&mut self.streaming, &mut self.document, &mut self.revisions);
        if was_streaming && !self.streaming.is_streaming() {
            self.end_stream();
        } else {
            self.on_document_changed();
        }
        result.map_err(|e| self.reported(e.into()))
    }

    /// Resume history after a stream ended and record the outcome once
    fn end_stream(&mut self) {
        self.on_document_changed();
        if self.history.is_suppressed() {
            self.history.resume();
        }
        self.debouncer.cancel();
        self.history.save_to_history(&self.document);
    }

    fn reported(&mut self, error: SessionError) -> SessionError {
        self.report(&error);
        error
    }

    fn report(&mut self, error: &SessionError) {
        match error {
            SessionError::Busy => self.notifications.show_warning(&error.to_string()),
            SessionError::Ai(AiError::Cancelled) => self.notifications.show("Generation cancelled"),
            SessionError::Ai(e) => self.notifications.show_error(&e.user_message()),
            e => self.notifications.show_error(&e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
