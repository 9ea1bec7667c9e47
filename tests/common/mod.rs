// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use portfolio_site::config::Config;
use portfolio_site::db::{CacheStore, MemoryCache};
use portfolio_site::routes::create_router;
use portfolio_site::services::{CacheAside, Clock};
use portfolio_site::AppState;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Serve `router` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_upstream(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{}", addr)
}

/// Manually advanced clock, in epoch milliseconds.
#[derive(Clone)]
#[allow(dead_code)]
pub struct TestClock(Arc<AtomicI64>);

#[allow(dead_code)]
impl TestClock {
    pub fn new(start_ms: i64) -> Self {
        Self(Arc::new(AtomicI64::new(start_ms)))
    }

    pub fn advance_ms(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn as_clock(&self) -> Clock {
        let inner = self.0.clone();
        Arc::new(move || inner.load(Ordering::SeqCst))
    }
}

/// Create a test app over an in-memory cache.
/// Returns the router, the shared state and the cache for inspection.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>, MemoryCache) {
    let cache = MemoryCache::new();
    let store: Arc<dyn CacheStore> = Arc::new(cache.clone());
    let state = Arc::new(AppState::new(config, store).expect("Failed to build app state"));

    (create_router(state.clone()), state, cache)
}

/// Like [`create_test_app`], with a controllable clock.
#[allow(dead_code)]
pub fn create_test_app_with_clock(
    config: Config,
    clock: &TestClock,
) -> (axum::Router, Arc<AppState>, MemoryCache) {
    let cache = MemoryCache::new();
    let store: Arc<dyn CacheStore> = Arc::new(cache.clone());
    let cache_aside = CacheAside::new(store).with_clock(clock.as_clock());
    let state = Arc::new(
        AppState::with_cache_aside(config, cache_aside).expect("Failed to build app state"),
    );

    (create_router(state.clone()), state, cache)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
