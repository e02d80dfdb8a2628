//! Cooperative cancellation for background builds

use std::sync::Arc;
use tokio::sync::watch;

/// Create a connected cancellation handle and listener
pub fn cancellation() -> (CancelHandle, CancelListener) {
    let (tx, rx) = watch::channel(false);
    (
        CancelHandle {
            sender: Arc::new(tx),
        },
        CancelListener { receiver: rx },
    )
}

/// A clonable listener that build loops poll between records
#[derive(Debug, Clone)]
pub struct CancelListener {
    receiver: watch::Receiver<bool>,
}

/// Handle to trigger cancellation
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelListener {
    /// A listener that is never cancelled, for foreground builds
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { receiver: rx }
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait asynchronously until cancellation is requested.
    ///
    /// Never completes if the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl CancelHandle {
    /// Signal cancellation to all associated listeners
    pub fn cancel(&self) {
        // Ignore the result - if listeners are gone, the build already ended
        let _ = self.sender.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout, Duration};

    #[tokio::test]
    async fn test_cancel_reaches_all_listeners() {
        let (handle, listener1) = cancellation();
        let listener2 = listener1.clone();

        assert!(!listener1.is_cancelled());
        handle.cancel();

        assert!(listener1.is_cancelled());
        assert!(listener2.is_cancelled());
        assert!(handle.is_cancelled());
        let result = timeout(Duration::from_millis(100), listener2.cancelled()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_async_wait_for_cancel() {
        let (handle, listener) = cancellation();

        tokio::spawn(async move {
            sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        listener.cancelled().await;
        assert!(listener.is_cancelled());
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_cancel() {
        let (handle, listener) = cancellation();
        drop(handle);

        assert!(!listener.is_cancelled());
        let result = timeout(Duration::from_millis(50), listener.cancelled()).await;
        assert!(result.is_err());
        assert!(!CancelListener::never().is_cancelled());
    }
}
