//! Cancellation plumbing for in-flight eligibility lookups
//!
//! A voice session that ends mid-lookup must not wait for the clearinghouse.
//! The session owns a [`CancellationHandle`]; every lookup receives a
//! [`CancellationSignal`] and races its HTTP call against it.

use tokio::sync::watch;

/// Owning side: fires cancellation for every signal cloned from it
#[derive(Debug)]
pub struct CancellationHandle {
    sender: watch::Sender<bool>,
}

/// Observing side, cheap to clone and pass into calls
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    receiver: watch::Receiver<bool>,
}

impl CancellationHandle {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        let (sender, receiver) = watch::channel(false);
        // Dropping the sender freezes the value at `false`
        drop(sender);
        Self { receiver }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation fires; pends forever if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
