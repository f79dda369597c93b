// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::command::CommandProtector;
use crate::backends::mirror::{LocalMirror, ScriptedMirror};
use crate::config::{MirrorConfig, MirrorKind, ProtectConfig};
use crate::traits::{MirrorTransform, ProtectionTransform};

/// Builds the configured transform backends.
pub struct BackendFactory;

impl BackendFactory {
    pub fn protector(config: &ProtectConfig) -> Arc<dyn ProtectionTransform> {
        Arc::new(CommandProtector::new(config))
    }

    pub fn mirror(config: &MirrorConfig) -> Arc<dyn MirrorTransform> {
        match config.kind {
            MirrorKind::Scripted => Arc::new(ScriptedMirror::new(config)),
            MirrorKind::Local => Arc::new(LocalMirror::new()),
        }
    }
}
