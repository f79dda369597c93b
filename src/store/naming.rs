// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::config::consts::ARTIFACT_TOKEN_LEN;

/// Random alphanumeric token of `len` characters.
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// File name for a new artifact: `<prefix>[<token>].zip`.
pub fn artifact_file_name(prefix: &str) -> String {
    format!("{}[{}].zip", prefix, random_token(ARTIFACT_TOKEN_LEN))
}
