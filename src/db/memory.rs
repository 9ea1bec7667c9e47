// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process cache store.

use super::CacheStore;
use crate::error::SourceError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Cache store backed by a concurrent map. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, SourceError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> Result<(), SourceError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SourceError> {
        self.entries.remove(key);
        Ok(())
    }
}
