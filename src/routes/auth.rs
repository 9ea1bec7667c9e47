// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth connect routes for LinkedIn and Google Photos.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::services::OAuthProvider;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/{provider}", get(auth_start))
        .route("/auth/{provider}/callback", get(auth_callback))
        .route("/auth/{provider}/disconnect", post(disconnect))
}

/// Start OAuth flow - redirect to the provider's authorization page.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<OAuthProvider>,
) -> Result<Redirect> {
    let url = state.oauth_service.begin_oauth(provider)?;
    Ok(Redirect::temporary(&url))
}

/// Query parameters the provider sends back.
#[derive(Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// OAuth callback - exchange the code, then send the visitor back to the
/// page that shows this provider's data.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<OAuthProvider>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(error) = params.error {
        let details = match params.error_description {
            Some(description) => format!("{}: {}", error, description),
            None => error,
        };
        return Err(AppError::OAuthRejected(details));
    }

    let (Some(code), Some(oauth_state)) = (params.code, params.state) else {
        return Err(AppError::BadRequest(
            "Missing code or state parameter".to_string(),
        ));
    };

    state
        .oauth_service
        .complete_oauth(provider, &code, &oauth_state)
        .await?;

    Ok(Redirect::to(&format!(
        "{}{}?oauth=connected",
        state.config.site_url,
        provider.landing_path()
    )))
}

#[derive(Serialize)]
pub struct DisconnectResponse {
    pub success: bool,
    pub provider: OAuthProvider,
}

/// Forget the stored token for a provider.
async fn disconnect(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<OAuthProvider>,
) -> Result<Json<DisconnectResponse>> {
    state.oauth_service.clear_oauth_token(provider).await?;
    Ok(Json(DisconnectResponse {
        success: true,
        provider,
    }))
}
