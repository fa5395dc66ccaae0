//! Cancellation and progress reporting for a running traversal.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// Shared flag a caller flips to stop a traversal at its current frontier.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Periodic traversal progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub visited: usize,
    pub queued: usize,
}

pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Per-request hooks passed to [`Analyzer::analyze_with`](super::Analyzer::analyze_with).
#[derive(Clone, Default)]
pub struct AnalysisControl {
    pub cancel: Option<CancellationToken>,
    pub progress: Option<ProgressCallback>,
}

impl AnalysisControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_progress(mut self, callback: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(callback) = &self.progress {
            callback(progress);
        }
    }
}

impl fmt::Debug for AnalysisControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisControl")
            .field("cancel", &self.cancel)
            .field("has_progress", &self.progress.is_some())
            .finish()
    }
}
