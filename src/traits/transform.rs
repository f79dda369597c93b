use async_trait::async_trait;
use std::path::Path;

use crate::errors::TransformError;

/// Protects a single staged file in place.
///
/// The transform receives the file path and must leave the protected contents
/// at that same path. A returned error means the file may be unprotected.
#[async_trait]
pub trait ProtectionTransform: Send + Sync {
    async fn protect(&self, path: &Path) -> Result<(), TransformError>;

    fn name(&self) -> &'static str;
}

/// Makes a remote destination equal to a local directory, deleting extras.
///
/// Every call is a full mirror: a failed call is healed by the next success.
#[async_trait]
pub trait MirrorTransform: Send + Sync {
    async fn mirror(&self, local_dir: &Path, remote: &str) -> Result<(), TransformError>;

    fn name(&self) -> &'static str;
}
