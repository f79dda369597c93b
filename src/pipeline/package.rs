// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub file_count: usize,
    pub size_bytes: u64,
}

/// Zip every regular file under `source` into `dest`, using paths relative to
/// `source` as entry names. The parent of `dest` is created if missing; a
/// partially written archive is removed on failure.
pub fn package_dir(source: &Path, dest: &Path) -> Result<ArchiveSummary, PipelineError> {
    let fail = |reason: String| PipelineError::Packaging {
        path: dest.to_path_buf(),
        reason,
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| fail(format!("could not create output directory: {}", e)))?;
    }

    let file_count = match write_archive(source, dest) {
        Ok(count) => count,
        Err(e) => {
            let _ = fs::remove_file(dest);
            return Err(fail(e.to_string()));
        }
    };

    let size_bytes = fs::metadata(dest)
        .map_err(|e| fail(format!("archive vanished after write: {}", e)))?
        .len();

    Ok(ArchiveSummary {
        file_count,
        size_bytes,
    })
}

fn write_archive(source: &Path, dest: &Path) -> Result<usize, ZipError> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(dest)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0;
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        zip.start_file(entry_name(relative), options)?;
        let mut file = File::open(entry.path())?;
        io::copy(&mut file, &mut zip)?;
        count += 1;
    }

    zip.finish()?;
    Ok(count)
}

/// Archive entry names always use forward slashes.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
