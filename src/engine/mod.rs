// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod demand;
pub mod factory;
pub mod orchestrator;
pub mod supervisor;
pub mod watchdog;
#[cfg(test)]
pub mod integration_tests;

pub use demand::{needed_this_cycle, DemandPoller};
pub use factory::OrchestratorFactory;
pub use orchestrator::{CycleReport, Phase, ProjectOrchestrator};
pub use supervisor::{RunOutcome, Supervisor};
pub use watchdog::{UpdateWatchdog, WatchdogExit, WatchdogStep};
