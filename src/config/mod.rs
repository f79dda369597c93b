// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod discovery;
mod loader;
mod project;
mod validation;

pub mod consts;

pub use discovery::{discover_projects, inspect_project};
pub use loader::{
    load_runtime_config, DemandConfig, MirrorConfig, MirrorKind, ProtectConfig, RuntimeConfig,
    ScheduleConfig, SupervisorConfig, TimestampSource, WatchdogConfig,
};
pub use project::ProjectConfig;
pub use validation::{check_source_dir, validate_manifest, Manifest};
