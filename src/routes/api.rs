// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public API routes for the profile, gallery and likes.

use crate::error::Result;
use crate::models::{ResolvedPhoto, ResolvedProfile, SourceTag, Sourced};
use crate::services::Cached;
use crate::services::OAuthProvider;
use crate::time_utils::format_epoch_ms;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/profile/refresh-cache", post(refresh_profile_cache))
        .route("/api/photos", get(get_photos))
        .route(
            "/api/photos/clear-cache",
            get(clear_photo_cache).post(clear_photo_cache),
        )
        .route("/api/likes", get(get_gallery_likes))
        .route("/api/likes/{photo_id}", get(get_likes).post(add_like))
}

/// Envelope for resolved data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub cached: bool,
    /// When the value will next be re-resolved (RFC 3339).
    pub cache_expiry: Option<String>,
    pub source: SourceTag,
}

impl<T> From<Cached<Sourced<T>>> for ApiResponse<T> {
    fn from(resolved: Cached<Sourced<T>>) -> Self {
        let cache_expiry = format_epoch_ms(resolved.expires_at_ms());
        Self {
            success: true,
            data: resolved.value.data,
            cached: resolved.cached,
            cache_expiry,
            source: resolved.value.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

// ─── Profile ─────────────────────────────────────────────────

async fn get_profile(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ResolvedProfile>> {
    Json(state.profile_service.resolve_profile().await.into())
}

/// Drop the cached profile and the LinkedIn token.
async fn refresh_profile_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>> {
    state.profile_service.clear_profile_cache().await?;
    state
        .oauth_service
        .clear_oauth_token(OAuthProvider::Linkedin)
        .await?;

    Ok(MessageResponse::ok(
        "Profile cache and LinkedIn token cleared",
    ))
}

// ─── Photos ──────────────────────────────────────────────────

async fn get_photos(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<ResolvedPhoto>>> {
    Json(state.photo_service.resolve_photos().await.into())
}

async fn clear_photo_cache(State(state): State<Arc<AppState>>) -> Result<Json<MessageResponse>> {
    state.photo_service.clear_photo_cache().await?;
    Ok(MessageResponse::ok("Photo cache cleared"))
}

// ─── Likes ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesResponse {
    pub photo_id: String,
    pub likes: u64,
}

/// Like counts for every photo in the current gallery, keyed by photo id.
/// Photos nobody has liked are left out.
async fn get_gallery_likes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, u64>>> {
    let gallery = state.photo_service.resolve_photos().await;
    let ids: Vec<&str> = gallery
        .value
        .data
        .iter()
        .map(|photo: &ResolvedPhoto| photo.id.as_str())
        .collect();
    Ok(Json(state.likes_service.likes_for(ids).await?))
}

async fn get_likes(
    State(state): State<Arc<AppState>>,
    Path(photo_id): Path<String>,
) -> Result<Json<LikesResponse>> {
    let likes = state.likes_service.get_likes(&photo_id).await?;
    Ok(Json(LikesResponse { photo_id, likes }))
}

async fn add_like(
    State(state): State<Arc<AppState>>,
    Path(photo_id): Path<String>,
) -> Result<Json<LikesResponse>> {
    let likes = state.likes_service.add_like(&photo_id).await?;
    Ok(Json(LikesResponse { photo_id, likes }))
}
