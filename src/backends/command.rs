// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use crate::backends::process::{render, run_tool};
use crate::config::ProtectConfig;
use crate::errors::TransformError;
use crate::traits::ProtectionTransform;

/// Protects a file by running an external protector with the file as both
/// input and output.
pub struct CommandProtector {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandProtector {
    pub fn new(config: &ProtectConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: config.timeout(),
        }
    }

    fn arguments_for(&self, path: &Path) -> Vec<String> {
        let lossy = path.to_string_lossy();
        let path: &str = &lossy;
        self.args
            .iter()
            .map(|arg| render(arg, &[("input", path), ("output", path)]))
            .collect()
    }
}

#[async_trait]
impl ProtectionTransform for CommandProtector {
    async fn protect(&self, path: &Path) -> Result<(), TransformError> {
        let args = self.arguments_for(path);
        tracing::debug!(program = %self.program, ?args, "Running protector");
        run_tool(&self.program, &args, None, self.timeout).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "command"
    }
}
