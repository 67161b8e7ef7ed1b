//! Shared test utilities for draftwise
//!
//! Common fixtures and a scripted transport used across test modules.

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;

    use crate::ai::request::GenerationRequest;
    use crate::ai::{AiError, GenerationTransport};
    use crate::document::Block;

    /// Blocks with ids that are easy to refer to in assertions:
    ///
    /// ```text
    /// h1  # Introduction
    /// p1  Machine learning is a field of study.
    /// h2  ## Methods
    /// l1  - Collect data
    /// l2  - Train model
    /// ```
    pub fn sample_blocks() -> Vec<Block> {
        vec![
            Block::heading("Introduction", 1).with_id("h1"),
            Block::paragraph("Machine learning is a field of study.").with_id("p1"),
            Block::heading("Methods", 2).with_id("h2"),
            Block::bullet("Collect data").with_id("l1"),
            Block::bullet("Train model").with_id("l2"),
        ]
    }

    /// Response body in the most common shape
    pub fn answer(text: &str) -> Result<Value, AiError> {
        Ok(json!({ "answer": text }))
    }

    /// Transport that replays scripted responses and records every request
    #[derive(Debug, Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<Value, AiError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
        delay: Duration,
    }

    impl MockTransport {
        pub fn new(responses: Vec<Result<Value, AiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        pub fn answering(text: &str) -> Self {
            Self::new(vec![answer(text)])
        }

        /// Simulated network latency per request
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl GenerationTransport for MockTransport {
        async fn send(
            &self,
            request: &GenerationRequest,
            cancel: &CancellationToken,
        ) -> Result<Value, AiError> {
            if cancel.is_cancelled() {
                return Err(AiError::Cancelled);
            }
            self.requests.lock().unwrap().push(request.clone());

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AiError::Cancelled),
                _ = tokio::time::sleep(self.delay) => {}
            }

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AiError::Parse("no scripted response left".to_string())))
        }
    }
}
