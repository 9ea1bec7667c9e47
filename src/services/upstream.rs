// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared HTTP plumbing for upstream sources.

use crate::config::Config;
use crate::error::SourceError;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("portfolio-site/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by every source.
///
/// Tiers run sequentially, so the per-request timeout bounds how long a
/// failing tier can delay the ones below it.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(SourceError::from)
}

/// Check response status and parse the JSON body.
pub async fn json_or_error<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::from_status(status, &body));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(SourceError::from)
}
