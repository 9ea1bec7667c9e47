// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types.
//!
//! [`SourceError`] covers everything that can go wrong while talking to a
//! data source or the cache store. Those errors never reach a client: the
//! resolvers log them and fall through to the next tier. [`AppError`] is what
//! route handlers return and converts to a JSON response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure of a single data source tier or of the cache store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authorization error: {0}")]
    Auth(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("all sources failed")]
    ResolutionFailed,
}

impl SourceError {
    /// Map an HTTP status from an upstream source to an error.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => SourceError::Auth(format!("HTTP {}: {}", status, body)),
            _ => SourceError::Transport(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0} OAuth is not configured")]
    OAuthNotConfigured(&'static str),

    #[error("OAuth provider rejected the request: {0}")]
    OAuthRejected(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Cache(msg) => AppError::Cache(msg),
            other => AppError::Internal(anyhow::anyhow!(other)),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::OAuthNotConfigured(provider) => (
                StatusCode::BAD_REQUEST,
                "oauth_not_configured",
                Some(format!(
                    "{} OAuth is not configured. Set its client ID and client secret.",
                    provider
                )),
            ),
            AppError::OAuthRejected(msg) => {
                tracing::warn!(error = %msg, "OAuth provider rejected request");
                (StatusCode::BAD_GATEWAY, "oauth_rejected", Some(msg.clone()))
            }
            AppError::Cache(msg) => {
                tracing::error!(error = %msg, "Cache error");
                (StatusCode::INTERNAL_SERVER_ERROR, "cache_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
