//! Debounced autosave with newest-wins cancellation.
//!
//! Local edits schedule a save after a quiet period; every new edit resets
//! the clock by superseding the previous attempt. Supersession is tracked
//! with a generation token rather than by aborting the transport: an
//! attempt re-checks the current generation after its debounce sleep (so a
//! superseded attempt never issues the save at all) and again after the
//! save returns (so a stale completion is discarded instead of clobbering
//! newer state). A hung save is abandoned after the max wait.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config;
use crate::error::RingshelfError;

/// Terminal state of one scheduled save attempt.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The save ran and its result is current.
    Saved,
    /// A newer edit superseded this attempt (before or during the save);
    /// nothing of it was applied to caller-visible state.
    Superseded,
    /// The save did not complete within the max wait.
    TimedOut,
    /// The save itself failed. Recoverable by editing again; there is no
    /// automatic retry.
    Failed(RingshelfError),
}

pub struct Autosaver {
    generation: Arc<AtomicU64>,
    debounce: Duration,
    max_wait: Duration,
}

impl Default for Autosaver {
    fn default() -> Self {
        Self::new(config::AUTOSAVE_DEBOUNCE, config::AUTOSAVE_MAX_WAIT)
    }
}

impl Autosaver {
    pub fn new(debounce: Duration, max_wait: Duration) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            debounce,
            max_wait,
        }
    }

    /// Schedule a save attempt for the state as of now.
    ///
    /// `save` is only invoked if no newer attempt has been scheduled by the
    /// time the quiet period elapses. The returned handle resolves to the
    /// attempt's outcome; callers that only care about the newest attempt
    /// can drop it.
    pub fn schedule<F, Fut>(&self, save: F) -> JoinHandle<SaveOutcome>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = crate::error::Result<()>> + Send,
    {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let debounce = self.debounce;
        let max_wait = self.max_wait;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if generation.load(Ordering::SeqCst) != token {
                return SaveOutcome::Superseded;
            }

            match tokio::time::timeout(max_wait, save()).await {
                Err(_) => SaveOutcome::TimedOut,
                Ok(Err(err)) => SaveOutcome::Failed(err),
                Ok(Ok(())) => {
                    // The response of a save that was superseded mid-flight
                    // must not be applied over newer local state.
                    if generation.load(Ordering::SeqCst) != token {
                        SaveOutcome::Superseded
                    } else {
                        SaveOutcome::Saved
                    }
                }
            }
        })
    }

    /// Invalidate all in-flight attempts without scheduling a new one
    /// (e.g. when the edited record is closed or deleted).
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
