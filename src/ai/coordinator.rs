//! Generation request coordinator
//!
//! Builds the request payload, sends it through the transport with retry and
//! synthetic progress, and reduces the response to plain answer text.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::progress::{DEFAULT_STAGES, ProgressStage, run_with_progress};
use super::provider::{AiError, GenerationTransport};
use super::request::{ContextAnchors, GenerationRequest};
use super::response::extract_answer;
use super::retry::RetryPolicy;

pub struct GenerationCoordinator<T> {
    transport: T,
    policy: RetryPolicy,
    stages: Vec<ProgressStage>,
    progress: watch::Sender<u8>,
    session_id: String,
    force_web: bool,
}

impl<T: GenerationTransport> GenerationCoordinator<T> {
    pub fn new(transport: T, session_id: impl Into<String>) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            transport,
            policy: RetryPolicy::default(),
            stages: DEFAULT_STAGES.to_vec(),
            progress,
            session_id: session_id.into(),
            force_web: false,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_stages(mut self, stages: Vec<ProgressStage>) -> Self {
        self.stages = stages;
        self
    }

    pub fn with_force_web(mut self, force_web: bool) -> Self {
        self.force_web = force_web;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Subscribe to progress updates (0..=100)
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn current_progress(&self) -> u8 {
        *self.progress.borrow()
    }

    /// Send `question` and return the cleaned answer text
    ///
    /// An answer that is empty after cleanup is `AiError::EmptyResponse`.
    pub async fn generate(
        &self,
        question: &str,
        anchors: &ContextAnchors,
        cancel: &CancellationToken,
    ) -> Result<String, AiError> {
        let request = GenerationRequest::new(&self.session_id, question, anchors, self.force_web);
        log::debug!(
            "Sending generation request (mode {:?}, {} chars)",
            request.mode,
            question.len()
        );

        let transport = &self.transport;
        let request = &request;
        let send = self.policy.run(cancel, move |attempt| {
            if attempt > 0 {
                log::debug!("Generation attempt {}", attempt + 1);
            }
            transport.send(request, cancel)
        });

        let body = run_with_progress(&self.stages, &self.progress, cancel, send).await?;

        match extract_answer(&body) {
            Some(answer) => {
                log::debug!("Received answer ({} chars)", answer.len());
                Ok(answer)
            }
            None => {
                log::warn!("Generation response contained no usable text");
                Err(AiError::EmptyResponse)
            }
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod coordinator_tests;
