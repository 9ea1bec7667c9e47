// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile resolution across the OAuth, feed and static tiers.

mod common;

use axum::http::{HeaderMap, StatusCode};
use axum::{routing::get, Json, Router};
use common::{create_test_app, spawn_upstream};
use portfolio_site::config::Config;
use portfolio_site::db::{keys, CacheStore};
use portfolio_site::models::{OAuthTokenRecord, SourceTag};
use portfolio_site::time_utils::now_epoch_ms;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serve `body` as the profile document and count fetches.
async fn spawn_feed(body: serde_json::Value, calls: Arc<AtomicUsize>) -> String {
    let router = Router::new().route(
        "/profile.json",
        get(move || {
            let body = body.clone();
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Json(body)
            }
        }),
    );
    format!("{}/profile.json", spawn_upstream(router).await)
}

/// Fake LinkedIn API accepting a single access token.
async fn spawn_linkedin(accepted_token: &'static str) -> String {
    let router = Router::new().route(
        "/me",
        get(move |headers: HeaderMap| async move {
            let expected = format!("Bearer {}", accepted_token);
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == expected);
            if !authorized {
                return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid token"})));
            }
            (
                StatusCode::OK,
                Json(json!({
                    "id": "li-123",
                    "firstName": {"localized": {"en_US": "Raj"}, "preferredLocale": {"country": "US", "language": "en"}},
                    "lastName": {"localized": {"en_US": "B."}},
                    "headline": {"localized": {"en_US": "CTO"}}
                })),
            )
        }),
    );
    spawn_upstream(router).await
}

async fn store_token(store: &dyn CacheStore, access_token: &str) {
    let record = OAuthTokenRecord {
        access_token: access_token.to_string(),
        expires_at_epoch_ms: now_epoch_ms() + 3_600_000,
        refresh_token: None,
        scope: "r_liteprofile".to_string(),
        token_type: "Bearer".to_string(),
    };
    store
        .put(
            &keys::oauth_token("linkedin"),
            serde_json::to_string(&record).unwrap(),
        )
        .await
        .unwrap();
}

fn linkedin_config(api_base: String) -> Config {
    let mut config = Config::test_default();
    config.linkedin_client_id = "li_client".to_string();
    config.linkedin_client_secret = "li_secret".to_string();
    config.linkedin_api_base = api_base;
    config
}

#[tokio::test]
async fn test_static_profile_when_nothing_configured() {
    let (_app, state, store) = create_test_app(Config::test_default());

    let resolved = state.profile_service.resolve_profile().await;

    assert!(!resolved.cached);
    assert_eq!(resolved.value.source, SourceTag::StaticFallback);
    let profile = &resolved.value.data;
    assert_eq!(profile.first_name, "Raju");
    assert_eq!(profile.last_name, "Bhupatiraju");
    assert_eq!(profile.skills.len(), 12);
    assert!(store.contains_key(keys::PROFILE));
}

#[tokio::test]
async fn test_partial_feed_merges_over_baseline() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut config = Config::test_default();
    config.profile_photo_url = Some("https://img.example/raju.jpg".to_string());
    config.profile_json_url = Some(
        spawn_feed(
            json!({"firstName": "A", "lastName": "B", "headline": "", "skills": ["X"]}),
            calls.clone(),
        )
        .await,
    );
    let (_app, state, _store) = create_test_app(config);

    let resolved = state.profile_service.resolve_profile().await;

    assert_eq!(resolved.value.source, SourceTag::ExternalFeed);
    let profile = &resolved.value.data;
    assert_eq!(profile.first_name, "A");
    assert_eq!(profile.last_name, "B");
    assert_eq!(profile.skills, vec!["X".to_string()]);
    assert!(profile.headline.starts_with("Enterprise Applications Leader"));
    assert_eq!(profile.experience.len(), 3);
    assert_eq!(profile.education.len(), 2);
    assert_eq!(profile.certifications.len(), 2);
    assert_eq!(
        profile.profile_picture.as_deref(),
        Some("https://img.example/raju.jpg")
    );
}

#[tokio::test]
async fn test_source_tag_survives_cache_hit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut config = Config::test_default();
    config.profile_json_url =
        Some(spawn_feed(json!({"firstName": "Feed"}), calls.clone()).await);
    let (_app, state, _store) = create_test_app(config);

    let first = state.profile_service.resolve_profile().await;
    let second = state.profile_service.resolve_profile().await;

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(second.value.source, SourceTag::ExternalFeed);
    assert_eq!(second.value.data.first_name, "Feed");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_feed_error_falls_back_to_static() {
    let router = Router::new().route(
        "/profile.json",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let mut config = Config::test_default();
    config.profile_json_url = Some(format!("{}/profile.json", spawn_upstream(router).await));
    let (_app, state, _store) = create_test_app(config);

    let resolved = state.profile_service.resolve_profile().await;

    assert_eq!(resolved.value.source, SourceTag::StaticFallback);
    assert_eq!(resolved.value.data.first_name, "Raju");
}

#[tokio::test]
async fn test_malformed_feed_falls_back_to_static() {
    let router = Router::new().route("/profile.json", get(|| async { "<html>not json</html>" }));
    let mut config = Config::test_default();
    config.profile_json_url = Some(format!("{}/profile.json", spawn_upstream(router).await));
    let (_app, state, _store) = create_test_app(config);

    let resolved = state.profile_service.resolve_profile().await;

    assert_eq!(resolved.value.source, SourceTag::StaticFallback);
}

#[tokio::test]
async fn test_unreachable_feed_falls_back_to_static() {
    let mut config = Config::test_default();
    config.profile_json_url = Some("http://127.0.0.1:9/profile.json".to_string());
    let (_app, state, _store) = create_test_app(config);

    let resolved = state.profile_service.resolve_profile().await;

    assert_eq!(resolved.value.source, SourceTag::StaticFallback);
}

#[tokio::test]
async fn test_oauth_tier_preferred_with_token() {
    let feed_calls = Arc::new(AtomicUsize::new(0));
    let mut config = linkedin_config(spawn_linkedin("live-token").await);
    config.profile_json_url =
        Some(spawn_feed(json!({"firstName": "Feed"}), feed_calls.clone()).await);
    let (_app, state, store) = create_test_app(config);
    store_token(&store, "live-token").await;

    let resolved = state.profile_service.resolve_profile().await;

    assert_eq!(resolved.value.source, SourceTag::Oauth);
    let profile = &resolved.value.data;
    assert_eq!(profile.first_name, "Raj");
    assert_eq!(profile.last_name, "B.");
    assert_eq!(profile.headline, "CTO");
    // LinkedIn has no skills or positions; the baseline fills them in
    assert_eq!(profile.skills.len(), 12);
    assert_eq!(profile.experience.len(), 3);
    assert_eq!(feed_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oauth_without_token_falls_to_feed() {
    let feed_calls = Arc::new(AtomicUsize::new(0));
    let mut config = linkedin_config(spawn_linkedin("live-token").await);
    config.profile_json_url =
        Some(spawn_feed(json!({"firstName": "Feed"}), feed_calls.clone()).await);
    let (_app, state, _store) = create_test_app(config);

    let resolved = state.profile_service.resolve_profile().await;

    assert_eq!(resolved.value.source, SourceTag::ExternalFeed);
    assert_eq!(feed_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejected_token_falls_through() {
    let config = linkedin_config(spawn_linkedin("live-token").await);
    let (_app, state, store) = create_test_app(config);
    store_token(&store, "revoked-token").await;

    let resolved = state.profile_service.resolve_profile().await;

    assert_eq!(resolved.value.source, SourceTag::StaticFallback);
}

#[tokio::test]
async fn test_clear_profile_cache_forces_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut config = Config::test_default();
    config.profile_json_url = Some(spawn_feed(json!({"firstName": "Feed"}), calls.clone()).await);
    let (_app, state, store) = create_test_app(config);

    state.profile_service.resolve_profile().await;
    state.profile_service.clear_profile_cache().await.unwrap();
    assert!(!store.contains_key(keys::PROFILE));

    let resolved = state.profile_service.resolve_profile().await;
    assert!(!resolved.cached);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_feed_with_null_fields_is_accepted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut config = Config::test_default();
    config.profile_json_url = Some(
        spawn_feed(
            json!({"firstName": "A", "lastName": "B", "headline": null, "education": null, "skills": ["X"]}),
            calls,
        )
        .await,
    );
    let (_app, state, _store) = create_test_app(config);

    let resolved = state.profile_service.resolve_profile().await;

    assert_eq!(resolved.value.source, SourceTag::ExternalFeed);
    let profile = &resolved.value.data;
    assert_eq!(profile.first_name, "A");
    assert!(profile.headline.starts_with("Enterprise Applications Leader"));
    assert_eq!(profile.education.len(), 2);
    assert_eq!(profile.skills, vec!["X".to_string()]);
}
