use async_trait::async_trait;

use crate::errors::UpdateError;

/// Result of comparing the deployed copy with its upstream reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    UpdateAvailable { local: String, remote: String },
}

/// Source of truth for the process's own deployed copy.
///
/// Decoupled from any particular version-control system: the watchdog only
/// needs a divergence check and two ways of applying an update.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Compare the deployed copy with upstream.
    async fn check(&self) -> Result<UpdateStatus, UpdateError>;

    /// Apply the update without discarding local history.
    async fn fast_forward(&self) -> Result<(), UpdateError>;

    /// Force the deployed copy to match upstream exactly.
    async fn hard_reset(&self) -> Result<(), UpdateError>;
}
