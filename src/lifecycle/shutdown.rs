//! Shutdown coordination for the relay.

use tokio::sync::broadcast;

/// Broadcast handle that stops the HTTP server.
///
/// The signal handler and tests hold a clone and call [`Shutdown::trigger`];
/// the server awaits a receiver from [`Shutdown::subscribe`].
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop. Triggering twice is harmless.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once shutdown was triggered or every sender is gone.
pub async fn wait_for(mut rx: broadcast::Receiver<()>) {
    // Lagged only happens after a send, which is itself the signal.
    let _ = rx.recv().await;
}
