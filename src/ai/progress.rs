//! Synthetic progress reporting
//!
//! The endpoint gives no progress of its own, so a staged ticker walks
//! through fixed percentages while the request is in flight. Both run
//! concurrently; 100 is only published once the ticker and the request have
//! both finished and the request succeeded.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::provider::AiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStage {
    pub percent: u8,
    /// Time spent before this stage is reported
    pub duration: Duration,
}

impl ProgressStage {
    pub const fn new(percent: u8, duration_ms: u64) -> Self {
        Self {
            percent,
            duration: Duration::from_millis(duration_ms),
        }
    }
}

impl From<(u8, u64)> for ProgressStage {
    fn from((percent, duration_ms): (u8, u64)) -> Self {
        Self::new(percent.min(99), duration_ms)
    }
}

pub const DEFAULT_STAGES: [ProgressStage; 5] = [
    ProgressStage::new(15, 400),
    ProgressStage::new(30, 600),
    ProgressStage::new(50, 800),
    ProgressStage::new(75, 800),
    ProgressStage::new(90, 600),
];

/// Walk through `stages`, publishing each percentage after its duration
///
/// Stops early when `stop` is cancelled.
async fn tick(stages: &[ProgressStage], progress: &watch::Sender<u8>, stop: &CancellationToken) {
    for stage in stages {
        tokio::select! {
            biased;
            _ = stop.cancelled() => return,
            _ = tokio::time::sleep(stage.duration) => {}
        }
        progress.send_replace(stage.percent);
    }
}

/// Run `request` alongside the staged ticker
///
/// A failed request stops the ticker and resets progress to 0.
pub async fn run_with_progress<T, F>(
    stages: &[ProgressStage],
    progress: &watch::Sender<u8>,
    cancel: &CancellationToken,
    request: F,
) -> Result<T, AiError>
where
    F: Future<Output = Result<T, AiError>>,
{
    progress.send_replace(0);
    let stop = cancel.child_token();

    let request = async {
        let result = request.await;
        if result.is_err() {
            stop.cancel();
        }
        result
    };

    let ((), result) = futures::join!(tick(stages, progress, &stop), request);

    match result {
        Ok(value) => {
            progress.send_replace(100);
            Ok(value)
        }
        Err(e) => {
            progress.send_replace(0);
            Err(e)
        }
    }
}
