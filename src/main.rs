// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio site API server
//!
//! Serves the resume profile and photo gallery JSON consumed by the site
//! frontend, plus the OAuth connect flows for LinkedIn and Google Photos.

use portfolio_site::{
    config::{CacheBackend, Config},
    db::{CacheStore, FirestoreCache, MemoryCache},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting portfolio site API");

    let cache: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Firestore => Arc::new(FirestoreCache::new(&config.gcp_project_id).await?),
        CacheBackend::Memory => {
            tracing::info!("Using in-memory cache");
            Arc::new(MemoryCache::new())
        }
    };

    for (provider, configured) in [
        ("linkedin", !config.linkedin_client_id.is_empty()),
        ("google-photos", !config.google_photos_client_id.is_empty()),
    ] {
        tracing::info!(provider, configured, "OAuth provider");
    }

    let port = config.port;
    let state = Arc::new(AppState::new(config, cache)?);

    // Build router
    let app = portfolio_site::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_site=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
