// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::{parse_demand_body, DemandError};
use crate::traits::DemandSource;

/// Reads demand with a plain `GET`; the body is a decimal count.
pub struct HttpDemandSource {
    client: reqwest::Client,
}

impl HttpDemandSource {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coresync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DemandSource for HttpDemandSource {
    async fn fetch(&self, url: &str) -> Result<u64, DemandError> {
        let transport = |source| DemandError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DemandError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        parse_demand_body(url, &body)
    }
}
