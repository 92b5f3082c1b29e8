//! Delivery of job status updates to whoever owns the display.

use super::StatusUpdate;
use tokio::sync::mpsc;

/// Receives a snapshot after every job transition.
///
/// Called from worker threads. Implementations must not touch
/// display-owned state directly; forward the update instead.
pub trait StatusObserver: Send + Sync {
    fn notify(&self, update: StatusUpdate);
}

impl<F> StatusObserver for F
where
    F: Fn(StatusUpdate) + Send + Sync,
{
    fn notify(&self, update: StatusUpdate) {
        self(update)
    }
}

/// Forwards updates over a channel drained by the display thread.
///
/// The receiver sees the stream end once the observer is dropped, which
/// happens when the run that owns it finishes.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<StatusUpdate>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end for the display thread.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatusUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl StatusObserver for ChannelObserver {
    fn notify(&self, update: StatusUpdate) {
        if self.tx.send(update).is_err() {
            tracing::debug!("No receiver for status update");
        }
    }
}
