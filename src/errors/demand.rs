// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failure reading remote demand from a project's endpoint.
#[derive(Error, Debug)]
pub enum DemandError {
    #[error("Demand request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Demand endpoint '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Demand endpoint '{url}' returned a non-numeric body: {body:?}")]
    NotANumber { url: String, body: String },

    #[error("Demand endpoint '{url}' returned a negative count: {value}")]
    Negative { url: String, value: i64 },
}

/// Parse a demand body as a decimal, non-negative count.
///
/// Surrounding whitespace (a trailing newline, typically) is ignored.
pub(crate) fn parse_demand_body(url: &str, body: &str) -> Result<u64, DemandError> {
    let trimmed = body.trim();
    let value: i64 = trimmed.parse().map_err(|_| DemandError::NotANumber {
        url: url.to_string(),
        body: trimmed.chars().take(64).collect(),
    })?;
    if value < 0 {
        return Err(DemandError::Negative {
            url: url.to_string(),
            value,
        });
    }
    Ok(value as u64)
}
