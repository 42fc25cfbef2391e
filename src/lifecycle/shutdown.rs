//! Graceful shutdown coordinator.

use std::future::Future;

use tokio::sync::broadcast;

/// Broadcasts a single "stop now" event to every interested task.
///
/// Cloning is cheap; all clones share the channel.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A future resolving once shutdown is triggered.
    ///
    /// Subscribes immediately, so a trigger that happens before the future
    /// is first polled is not missed.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // Closed channel means every sender is gone: treat as shutdown too.
            let _ = rx.recv().await;
        }
    }

    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no listeners");
        }
    }

    /// Number of tasks currently waiting on [`Shutdown::signalled`].
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_listener() {
        let shutdown = Shutdown::new();
        let a = shutdown.signalled();
        let b = shutdown.clone().signalled();
        assert_eq!(shutdown.listeners(), 2);

        shutdown.trigger();
        a.await;
        b.await;
    }
}
