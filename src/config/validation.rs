// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validation of per-project manifests and source folders.
//!
//! Every check runs even after an earlier one fails, so a broken project is
//! reported with the full list of problems in a single log line instead of one
//! problem per restart.
//!
//! # Manifest fields
//!
//! * `vmpFiles` - non-empty array of glob patterns
//! * `remotePath` - non-empty destination path
//! * `getNeedURL` - absolute URL with scheme and host
//! * `fileAmount` - integer greater than zero

use serde_json::Value;
use std::path::Path;

use crate::errors::ManifestError;

/// Characters that no supported destination accepts in a path.
const INVALID_PATH_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

/// Manifest fields after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub patterns: Vec<String>,
    pub remote_path: String,
    pub demand_url: String,
    pub file_amount: usize,
}

/// Validate a parsed manifest document, collecting every problem found.
pub fn validate_manifest(doc: &Value) -> Result<Manifest, Vec<ManifestError>> {
    let mut errors = Vec::new();

    let patterns = validate_patterns(doc, &mut errors);
    let remote_path = validate_string(doc, "remotePath", &mut errors).and_then(|value| {
        if is_valid_path(&value) {
            Some(value)
        } else {
            errors.push(ManifestError::InvalidPath { value });
            None
        }
    });
    let demand_url = validate_string(doc, "getNeedURL", &mut errors).and_then(|value| {
        if is_valid_url(&value) {
            Some(value)
        } else {
            errors.push(ManifestError::InvalidUrl { value });
            None
        }
    });
    let file_amount = validate_amount(doc, &mut errors);

    match (patterns, remote_path, demand_url, file_amount) {
        (Some(patterns), Some(remote_path), Some(demand_url), Some(file_amount))
            if errors.is_empty() =>
        {
            Ok(Manifest {
                patterns,
                remote_path,
                demand_url,
                file_amount,
            })
        }
        _ => Err(errors),
    }
}

/// Check that a project's source folder exists, is a directory and is not empty.
pub fn check_source_dir(path: &Path) -> Result<(), ManifestError> {
    if !path.exists() {
        return Err(ManifestError::MissingSource);
    }
    if !path.is_dir() {
        return Err(ManifestError::SourceNotDirectory);
    }
    let mut entries = std::fs::read_dir(path).map_err(|e| ManifestError::SourceUnreadable {
        reason: e.to_string(),
    })?;
    if entries.next().is_none() {
        return Err(ManifestError::EmptySource);
    }
    Ok(())
}

fn validate_patterns(doc: &Value, errors: &mut Vec<ManifestError>) -> Option<Vec<String>> {
    const FIELD: &str = "vmpFiles";
    let Some(value) = doc.get(FIELD) else {
        errors.push(ManifestError::MissingField { field: FIELD });
        return None;
    };
    let Some(items) = value.as_array() else {
        errors.push(ManifestError::WrongType {
            field: FIELD,
            expected: "an array",
        });
        return None;
    };
    if items.is_empty() {
        errors.push(ManifestError::EmptyField { field: FIELD });
        return None;
    }

    let mut patterns = Vec::with_capacity(items.len());
    for item in items {
        let Some(pattern) = item.as_str() else {
            errors.push(ManifestError::WrongType {
                field: FIELD,
                expected: "an array of strings",
            });
            return None;
        };
        if let Err(e) = glob::Pattern::new(pattern) {
            errors.push(ManifestError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            });
            return None;
        }
        patterns.push(pattern.to_string());
    }
    Some(patterns)
}

fn validate_string(
    doc: &Value,
    field: &'static str,
    errors: &mut Vec<ManifestError>,
) -> Option<String> {
    match doc.get(field) {
        None => {
            errors.push(ManifestError::MissingField { field });
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(ManifestError::EmptyField { field });
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(ManifestError::WrongType {
                field,
                expected: "a string",
            });
            None
        }
    }
}

fn validate_amount(doc: &Value, errors: &mut Vec<ManifestError>) -> Option<usize> {
    const FIELD: &str = "fileAmount";
    let Some(value) = doc.get(FIELD) else {
        errors.push(ManifestError::MissingField { field: FIELD });
        return None;
    };
    if let Some(amount) = value.as_u64() {
        if amount == 0 {
            errors.push(ManifestError::NonPositiveAmount { value: 0 });
            return None;
        }
        return usize::try_from(amount).ok();
    }
    if let Some(amount) = value.as_i64() {
        errors.push(ManifestError::NonPositiveAmount { value: amount });
        return None;
    }
    errors.push(ManifestError::WrongType {
        field: FIELD,
        expected: "an integer",
    });
    None
}

/// A destination path may carry a drive letter (`C:\`) or a scheme (`sftp://`);
/// past that prefix none of the reserved characters are allowed.
fn is_valid_path(path: &str) -> bool {
    let rest = strip_drive_or_scheme(path);
    !rest.is_empty() && !rest.contains(INVALID_PATH_CHARS)
}

fn strip_drive_or_scheme(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
    {
        return &path[2..];
    }
    if let Some(idx) = path.find("://") {
        let scheme = &path[..idx];
        let is_scheme = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if is_scheme {
            return &path[idx + 3..];
        }
    }
    path
}

fn is_valid_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => url.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_doc() -> Value {
        json!({
            "vmpFiles": ["*.dll", "core.*"],
            "remotePath": "/srv/releases/alpha",
            "getNeedURL": "http://demand.example.com/need?project=alpha",
            "fileAmount": 5
        })
    }

    #[test]
    fn accepts_well_formed_manifest() {
        let manifest = validate_manifest(&valid_doc()).unwrap();
        assert_eq!(manifest.patterns, vec!["*.dll", "core.*"]);
        assert_eq!(manifest.remote_path, "/srv/releases/alpha");
        assert_eq!(manifest.file_amount, 5);
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = validate_manifest(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ManifestError::MissingField { field: "vmpFiles" }));
        assert!(errors.contains(&ManifestError::MissingField { field: "remotePath" }));
        assert!(errors.contains(&ManifestError::MissingField { field: "getNeedURL" }));
        assert!(errors.contains(&ManifestError::MissingField { field: "fileAmount" }));
    }

    #[test]
    fn rejects_empty_pattern_list() {
        let mut doc = valid_doc();
        doc["vmpFiles"] = json!([]);
        let errors = validate_manifest(&doc).unwrap_err();
        assert_eq!(errors, vec![ManifestError::EmptyField { field: "vmpFiles" }]);
    }

    #[test]
    fn rejects_pattern_list_of_wrong_type() {
        let mut doc = valid_doc();
        doc["vmpFiles"] = json!("*.dll");
        let errors = validate_manifest(&doc).unwrap_err();
        assert!(matches!(
            errors[0],
            ManifestError::WrongType { field: "vmpFiles", .. }
        ));
    }

    #[test]
    fn rejects_invalid_glob() {
        let mut doc = valid_doc();
        doc["vmpFiles"] = json!(["[unclosed"]);
        let errors = validate_manifest(&doc).unwrap_err();
        assert!(matches!(errors[0], ManifestError::InvalidPattern { .. }));
    }

    #[test]
    fn rejects_non_positive_and_non_integer_amounts() {
        let mut doc = valid_doc();
        doc["fileAmount"] = json!(0);
        assert_eq!(
            validate_manifest(&doc).unwrap_err(),
            vec![ManifestError::NonPositiveAmount { value: 0 }]
        );

        doc["fileAmount"] = json!(-2);
        assert_eq!(
            validate_manifest(&doc).unwrap_err(),
            vec![ManifestError::NonPositiveAmount { value: -2 }]
        );

        doc["fileAmount"] = json!(2.5);
        assert!(matches!(
            validate_manifest(&doc).unwrap_err()[0],
            ManifestError::WrongType { field: "fileAmount", .. }
        ));
    }

    #[test]
    fn rejects_relative_url() {
        let mut doc = valid_doc();
        doc["getNeedURL"] = json!("/need");
        assert!(matches!(
            validate_manifest(&doc).unwrap_err()[0],
            ManifestError::InvalidUrl { .. }
        ));
    }

    #[test]
    fn remote_path_rules() {
        assert!(is_valid_path("/srv/releases"));
        assert!(is_valid_path("releases/alpha"));
        assert!(is_valid_path("C:\\releases\\alpha"));
        assert!(is_valid_path("sftp://host/releases"));
        assert!(!is_valid_path("/srv/rel|eases"));
        assert!(!is_valid_path("/srv/what?"));
        assert!(!is_valid_path("host:/srv"));
    }

    #[test]
    fn empty_remote_path_is_reported() {
        let mut doc = valid_doc();
        doc["remotePath"] = json!("");
        assert_eq!(
            validate_manifest(&doc).unwrap_err(),
            vec![ManifestError::EmptyField { field: "remotePath" }]
        );
    }

    #[test]
    fn source_dir_checks() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Src");

        assert_eq!(check_source_dir(&src), Err(ManifestError::MissingSource));

        std::fs::write(&src, b"not a dir").unwrap();
        assert_eq!(check_source_dir(&src), Err(ManifestError::SourceNotDirectory));

        std::fs::remove_file(&src).unwrap();
        std::fs::create_dir(&src).unwrap();
        assert_eq!(check_source_dir(&src), Err(ManifestError::EmptySource));

        std::fs::write(src.join("core.dll"), b"bin").unwrap();
        assert_eq!(check_source_dir(&src), Ok(()));
    }
}
