// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod demand;
mod pipeline;
mod update;

pub use config::{ConfigError, ManifestError};
pub use demand::DemandError;
pub(crate) use demand::parse_demand_body;
pub use pipeline::{FailurePolicy, PipelineError, StoreError, TransformError};
pub use update::UpdateError;
