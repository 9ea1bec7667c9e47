// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-through caching around a resolver.
//!
//! `get_or_resolve` checks the cache store, and on a miss runs the resolver
//! and writes its result back. There is no locking: concurrent misses for
//! the same key both resolve and both write, and the last write wins.
//! Cache failures never fail a call; a failed read is a miss and a failed
//! write is dropped.

use crate::db::CacheStore;
use crate::error::SourceError;
use crate::models::CacheEntry;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Source of the current time in epoch milliseconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// A value returned by [`CacheAside::get_or_resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    /// True when served from the cache without resolving.
    pub cached: bool,
    pub stored_at_ms: i64,
    pub ttl_ms: i64,
}

impl<T> Cached<T> {
    /// Epoch milliseconds after which this value will be re-resolved.
    pub fn expires_at_ms(&self) -> i64 {
        self.stored_at_ms.saturating_add(self.ttl_ms)
    }
}

/// Cache-aside orchestrator over a shared cache store.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    clock: Clock,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            clock: Arc::new(crate::time_utils::now_epoch_ms),
        }
    }

    /// Replace the wall clock (tests).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Current time according to this orchestrator's clock.
    pub fn now_ms(&self) -> i64 {
        (self.clock)()
    }

    /// Return the cached value for `key` if it is younger than `ttl`,
    /// otherwise run `resolve` and cache its result.
    ///
    /// Fails with [`SourceError::ResolutionFailed`] only when `resolve` fails.
    pub async fn get_or_resolve<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        resolve: F,
    ) -> Result<Cached<T>, SourceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

        if let Some(entry) = self.read::<T>(key).await {
            if entry.is_fresh(ttl_ms, self.now_ms()) {
                tracing::debug!(key, "Cache hit");
                return Ok(Cached {
                    value: entry.value,
                    cached: true,
                    stored_at_ms: entry.stored_at_epoch_ms,
                    ttl_ms,
                });
            }

            tracing::debug!(key, "Cache entry expired");
            self.evict(key).await;
        }

        let value = resolve().await.map_err(|e| {
            tracing::error!(key, error = %e, "Resolution failed");
            SourceError::ResolutionFailed
        })?;

        let stored_at_ms = self.now_ms();
        let entry = CacheEntry::new(&value, stored_at_ms, ttl_ms);
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.store.put(key, raw).await {
                    tracing::warn!(key, error = %e, "Failed to write cache entry");
                }
            }
            Err(e) => tracing::warn!(key, error = %e, "Failed to serialize cache entry"),
        }

        Ok(Cached {
            value,
            cached: false,
            stored_at_ms,
            ttl_ms,
        })
    }

    /// Delete `key`. Unlike the implicit evictions this reports failure.
    pub async fn invalidate(&self, key: &str) -> Result<(), SourceError> {
        self.store.delete(key).await?;
        tracing::info!(key, "Cache entry cleared");
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable cache entry");
                self.evict(key).await;
                None
            }
        }
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            tracing::warn!(key, error = %e, "Failed to delete cache entry");
        }
    }
}
