// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::errors::PipelineError;

/// Rebuild `staging` as a verbatim copy of `source`. Returns the number of files copied.
///
/// Anything already at `staging` is removed first, so protections applied by an
/// earlier pass never leak into the next one.
pub fn stage_workspace(source: &Path, staging: &Path) -> Result<usize, PipelineError> {
    let fail = |reason: String| PipelineError::Staging {
        path: staging.to_path_buf(),
        reason,
    };

    if staging.is_dir() {
        fs::remove_dir_all(staging)
            .map_err(|e| fail(format!("could not clear workspace: {}", e)))?;
    } else if staging.exists() {
        fs::remove_file(staging).map_err(|e| fail(format!("could not clear workspace: {}", e)))?;
    }
    fs::create_dir_all(staging).map_err(|e| fail(format!("could not create workspace: {}", e)))?;

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| fail(format!("could not read source tree: {}", e)))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| fail(e.to_string()))?;
        let target = staging.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                fail(format!("could not create '{}': {}", target.display(), e))
            })?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(|e| {
                fail(format!("could not copy '{}': {}", entry.path().display(), e))
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
