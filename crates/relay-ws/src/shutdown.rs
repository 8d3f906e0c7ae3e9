use tokio::sync::broadcast;

/// Process-wide shutdown coordinator.
///
/// The only cancellation primitive in the system: a SIGINT flips this and
/// every endpoint server and connection task observes it through a guard.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { shutdown_tx }
    }

    /// Trigger shutdown (call this from the signal handler)
    pub fn shutdown(&self) {
        log::info!("Shutdown signal received, notifying all subsystems");
        let _ = self.shutdown_tx.send(());
    }

    /// Create a guard that resolves when shutdown is triggered
    pub fn subscribe_guard(&self) -> ShutdownGuard {
        ShutdownGuard {
            shutdown_rx: self.shutdown_tx.subscribe(),
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for observing shutdown in async tasks
pub struct ShutdownGuard {
    shutdown_rx: broadcast::Receiver<()>,
}

impl ShutdownGuard {
    /// Wait for the shutdown signal
    pub async fn wait(&mut self) {
        let _ = self.shutdown_rx.recv().await;
    }
}
