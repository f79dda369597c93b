use async_trait::async_trait;

use crate::errors::DemandError;

/// Reports how many artifacts are currently wanted remotely.
#[async_trait]
pub trait DemandSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<u64, DemandError>;
}
