//! Cooperative shutdown signaling shared by the consumer and generator loops.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Cloneable handle for requesting a graceful stop from another task.
///
/// Loops check the flag between iterations and exit promptly once it is set;
/// underlying transport connections are released when their owners drop.
#[derive(Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<RwLock<bool>>,
}

impl ShutdownHandle {
    /// Creates a handle in the not-triggered state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a graceful shutdown.
    pub async fn shutdown(&self) {
        info!("shutdown requested");
        let mut flag = self.flag.write().await;
        *flag = true;
    }

    /// Whether shutdown has been requested.
    pub async fn is_shutdown(&self) -> bool {
        *self.flag.read().await
    }
}
