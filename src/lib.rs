// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Portfolio site backend
//!
//! Serves a resume profile and a photo gallery. Each is resolved from a
//! list of upstream sources in priority order, falls back to built-in data,
//! and is cached with a TTL in a pluggable cache store.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::CacheStore;
use error::SourceError;
use services::{CacheAside, LikesService, OAuthService, PhotoService, ProfileService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub profile_service: ProfileService,
    pub photo_service: PhotoService,
    pub oauth_service: OAuthService,
    pub likes_service: LikesService,
}

impl AppState {
    /// Wire every service over one HTTP client and one cache store.
    pub fn new(config: Config, cache: Arc<dyn CacheStore>) -> Result<Self, SourceError> {
        Self::with_cache_aside(config, CacheAside::new(cache))
    }

    /// Like [`AppState::new`], with a caller-built orchestrator (custom clock).
    pub fn with_cache_aside(config: Config, cache_aside: CacheAside) -> Result<Self, SourceError> {
        let http = services::upstream::build_http_client(&config)?;
        let cache = cache_aside.store().clone();

        let oauth_service = OAuthService::new(&config, http.clone(), cache_aside.clone());
        let profile_service = ProfileService::new(
            &config,
            http.clone(),
            cache_aside.clone(),
            oauth_service.clone(),
        );
        let photo_service = PhotoService::new(&config, http, cache_aside);
        let likes_service = LikesService::new(cache);

        Ok(Self {
            config,
            profile_service,
            photo_service,
            oauth_service,
            likes_service,
        })
    }
}
