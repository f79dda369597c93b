// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Discovery of project folders under the setup directory.
//!
//! A project folder holds a `Setup.json` manifest and a non-empty `Src` tree.
//! Invalid folders are logged with every problem found and skipped; they never
//! prevent other projects from starting.

use std::path::Path;

use crate::config::consts::{MANIFEST_FILE, SOURCE_DIR};
use crate::config::validation::{check_source_dir, validate_manifest};
use crate::config::ProjectConfig;
use crate::errors::ManifestError;
use crate::observability::messages::discovery::{
    DiscoveryCompleted, ProjectAccepted, ProjectRejected, SetupDirUnavailable,
};
use crate::observability::messages::StructuredLog;

/// Scan `setup_dir` and return every valid project, sorted by name.
pub fn discover_projects(setup_dir: &Path) -> Vec<ProjectConfig> {
    let setup_display = setup_dir.display().to_string();

    let entries = match std::fs::read_dir(setup_dir) {
        Ok(entries) if setup_dir.is_dir() => entries,
        Ok(_) => {
            SetupDirUnavailable {
                path: &setup_display,
                reason: "not a directory",
            }
            .log();
            return Vec::new();
        }
        Err(e) => {
            SetupDirUnavailable {
                path: &setup_display,
                reason: &e.to_string(),
            }
            .log();
            return Vec::new();
        }
    };

    let mut folders: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let mut projects = Vec::new();
    let mut rejected = 0;
    for folder in folders {
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match inspect_project(&folder) {
            Ok(project) => {
                ProjectAccepted {
                    project: &project.name,
                    file_amount: project.file_amount,
                    pattern_count: project.patterns.len(),
                }
                .log();
                projects.push(project);
            }
            Err(errors) => {
                rejected += 1;
                let problems = errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                ProjectRejected {
                    project: &name,
                    problems: &problems,
                }
                .log();
            }
        }
    }

    DiscoveryCompleted {
        setup_dir: &setup_display,
        accepted: projects.len(),
        rejected,
    }
    .log();

    projects
}

/// Validate one project folder, returning its configuration or all problems found.
pub fn inspect_project(folder: &Path) -> Result<ProjectConfig, Vec<ManifestError>> {
    let manifest_path = folder.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(vec![ManifestError::MissingManifest]);
    }

    let mut errors = Vec::new();
    let manifest = match std::fs::read_to_string(&manifest_path) {
        Ok(content) => match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(doc) => match validate_manifest(&doc) {
                Ok(manifest) => Some(manifest),
                Err(mut problems) => {
                    errors.append(&mut problems);
                    None
                }
            },
            Err(e) => {
                errors.push(ManifestError::MalformedJson {
                    reason: e.to_string(),
                });
                None
            }
        },
        Err(e) => {
            errors.push(ManifestError::Unreadable {
                reason: e.to_string(),
            });
            None
        }
    };

    if let Err(e) = check_source_dir(&folder.join(SOURCE_DIR)) {
        errors.push(e);
    }

    match manifest {
        Some(manifest) if errors.is_empty() => {
            let name = folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(ProjectConfig::from_root(
                name,
                folder,
                manifest.remote_path,
                manifest.demand_url,
                manifest.patterns,
                manifest.file_amount,
            ))
        }
        _ => Err(errors),
    }
}
