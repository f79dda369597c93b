pub mod demand;
pub mod transform;
pub mod update;

pub use demand::DemandSource;
pub use transform::{MirrorTransform, ProtectionTransform};
pub use update::{UpdateSource, UpdateStatus};
