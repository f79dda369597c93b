// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the runtime configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Problems found while validating a single project folder.
///
/// A project with one or more of these is skipped; other projects proceed.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestError {
    /// The manifest file is not present in the project folder
    MissingManifest,
    /// The manifest is not valid JSON
    MalformedJson { reason: String },
    /// The manifest could not be read
    Unreadable { reason: String },
    /// A required field is absent
    MissingField { field: &'static str },
    /// A field has the wrong JSON type
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    /// A string or array field is empty
    EmptyField { field: &'static str },
    /// The remote path contains characters no destination accepts
    InvalidPath { value: String },
    /// The demand URL lacks a scheme or host
    InvalidUrl { value: String },
    /// A protection pattern is not a valid glob
    InvalidPattern { pattern: String, reason: String },
    /// The artifact target count is zero or negative
    NonPositiveAmount { value: i64 },
    /// The source directory does not exist
    MissingSource,
    /// The source path exists but is not a directory
    SourceNotDirectory,
    /// The source directory has no entries
    EmptySource,
    /// The source directory could not be listed
    SourceUnreadable { reason: String },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::MissingManifest => write!(f, "missing Setup.json"),
            ManifestError::MalformedJson { reason } => write!(f, "not valid JSON: {}", reason),
            ManifestError::Unreadable { reason } => write!(f, "failed to read manifest: {}", reason),
            ManifestError::MissingField { field } => write!(f, "missing '{}' field", field),
            ManifestError::WrongType { field, expected } => {
                write!(f, "'{}' must be {}", field, expected)
            }
            ManifestError::EmptyField { field } => write!(f, "'{}' must not be empty", field),
            ManifestError::InvalidPath { value } => {
                write!(f, "'remotePath' is not a valid path: {}", value)
            }
            ManifestError::InvalidUrl { value } => {
                write!(f, "'getNeedURL' is not a valid URL: {}", value)
            }
            ManifestError::InvalidPattern { pattern, reason } => {
                write!(f, "'vmpFiles' pattern '{}' is invalid: {}", pattern, reason)
            }
            ManifestError::NonPositiveAmount { value } => {
                write!(f, "'fileAmount' must be greater than 0 (got {})", value)
            }
            ManifestError::MissingSource => write!(f, "missing Src folder"),
            ManifestError::SourceNotDirectory => write!(f, "Src is not a folder"),
            ManifestError::EmptySource => write!(f, "Src folder is empty"),
            ManifestError::SourceUnreadable { reason } => {
                write!(f, "failed to inspect Src folder: {}", reason)
            }
        }
    }
}

impl std::error::Error for ManifestError {}
