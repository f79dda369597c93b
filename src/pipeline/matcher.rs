// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use glob::{Pattern, PatternError};
use std::path::{Path, PathBuf};

/// Compiled filename patterns selecting which staged files get protected.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True when any pattern matches; evaluation stops at the first hit.
    pub fn is_match(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(file_name))
    }

    /// Regular files directly inside `dir` whose names match, in name order.
    pub fn select(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut selected = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if self.is_match(&name.to_string_lossy()) {
                selected.push(entry.path());
            }
        }
        selected.sort();
        Ok(selected)
    }
}
