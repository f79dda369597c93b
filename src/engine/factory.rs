// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::{DemandConfig, ProjectConfig, RuntimeConfig, ScheduleConfig, TimestampSource};
use crate::engine::demand::DemandPoller;
use crate::engine::orchestrator::ProjectOrchestrator;
use crate::errors::ConfigError;
use crate::observability::metrics::FailureCounters;
use crate::pipeline::{GenerationPipeline, PassOptions};
use crate::store::ArtifactStore;
use crate::traits::{DemandSource, MirrorTransform, ProtectionTransform};

/// Builds orchestrators that share one set of backends.
pub struct OrchestratorFactory {
    protector: Arc<dyn ProtectionTransform>,
    mirror: Arc<dyn MirrorTransform>,
    demand: Arc<dyn DemandSource>,
    options: PassOptions,
    timestamps: TimestampSource,
    schedule: ScheduleConfig,
    demand_config: DemandConfig,
}

impl OrchestratorFactory {
    pub fn new(
        config: &RuntimeConfig,
        protector: Arc<dyn ProtectionTransform>,
        mirror: Arc<dyn MirrorTransform>,
        demand: Arc<dyn DemandSource>,
    ) -> Self {
        Self {
            protector,
            mirror,
            demand,
            options: PassOptions::from(config),
            timestamps: config.timestamp_source,
            schedule: config.schedule.clone(),
            demand_config: config.demand.clone(),
        }
    }

    /// A fresh orchestrator in the Priming phase for `project`.
    pub fn build(
        &self,
        project: &ProjectConfig,
        counters: Arc<FailureCounters>,
    ) -> Result<ProjectOrchestrator, ConfigError> {
        let store = Arc::new(ArtifactStore::new(
            project.name.clone(),
            project.output_dir.clone(),
            self.timestamps,
        ));
        let pipeline = GenerationPipeline::new(
            project.clone(),
            store,
            Arc::clone(&self.protector),
            Arc::clone(&self.mirror),
            self.options.clone(),
            Arc::clone(&counters),
        )?;
        let poller = DemandPoller::new(Arc::clone(&self.demand), &self.demand_config);

        Ok(ProjectOrchestrator::new(
            pipeline,
            poller,
            self.schedule.clone(),
            counters,
        ))
    }
}
