//! Cooperative shutdown signalling
//!
//! A single sender flips the flag; every worker, the resource monitor, and
//! any sleep inside the retry loop can race against it so an interrupt is
//! observed within one polling cycle.

use tokio::sync::watch;

/// Receiving half of the shutdown signal
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Non-blocking check of the shutdown flag
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until shutdown is signalled
    pub async fn wait(&mut self) {
        // Already signalled: changed() would miss a value sent before this
        // receiver was cloned, so check the current value first.
        if *self.rx.borrow() {
            return;
        }
        let _ = self.rx.changed().await;
    }
}

/// Sending half of the shutdown signal
#[derive(Debug)]
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Signals shutdown to every token
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Creates a connected shutdown channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_initially_not_shutdown() {
        let (_sender, token) = shutdown_channel();
        assert!(!token.is_shutdown());
    }

    #[test]
    fn test_flag_visible_after_signal() {
        let (sender, token) = shutdown_channel();
        sender.shutdown();
        assert!(token.is_shutdown());
    }

    #[tokio::test]
    async fn test_wait_returns_after_signal() {
        let (sender, mut token) = shutdown_channel();

        let waiter = tokio::spawn(async move {
            token.wait().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        sender.shutdown();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait() should return after shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_returns_when_already_signalled() {
        let (sender, mut token) = shutdown_channel();
        sender.shutdown();

        tokio::time::timeout(Duration::from_millis(100), token.wait())
            .await
            .expect("wait() should return immediately when already signalled");
    }
}
