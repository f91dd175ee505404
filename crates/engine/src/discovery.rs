//! Repository-discovery readiness gate.

use async_trait::async_trait;
use tokio::sync::watch;
use triage::RepositoryDiscovery;

/// Tracks whether repository discovery is running.
///
/// Whoever drives discovery calls [`DiscoveryGate::begin`] and
/// [`DiscoveryGate::finish`]; the orchestrator awaits the gate before
/// classifying so it never runs against a half-discovered git context.
#[derive(Debug)]
pub struct DiscoveryGate {
    discovering: watch::Sender<bool>,
}

impl DiscoveryGate {
    /// A gate with no discovery in progress.
    pub fn new() -> Self {
        let (discovering, _) = watch::channel(false);
        Self { discovering }
    }

    pub fn begin(&self) {
        self.discovering.send_replace(true);
    }

    pub fn finish(&self) {
        self.discovering.send_replace(false);
    }

    pub fn is_discovering(&self) -> bool {
        *self.discovering.borrow()
    }
}

impl Default for DiscoveryGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryDiscovery for DiscoveryGate {
    async fn wait_for_discovery(&self) {
        let mut receiver = self.discovering.subscribe();
        // Only fails if the sender is dropped, which cannot happen while
        // `self` is borrowed.
        let _ = receiver.wait_for(|discovering| !*discovering).await;
    }
}
