// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted OAuth token.

use serde::{Deserialize, Serialize};

/// Margin before expiry inside which a token is treated as expired (5 minutes).
pub const TOKEN_EXPIRY_MARGIN_MS: i64 = 5 * 60 * 1000;

/// OAuth access token as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthTokenRecord {
    pub access_token: String,
    pub expires_at_epoch_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub token_type: String,
}

impl OAuthTokenRecord {
    /// Whether the token must be refreshed (or discarded) before use.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at_epoch_ms.saturating_sub(TOKEN_EXPIRY_MARGIN_MS)
    }
}
