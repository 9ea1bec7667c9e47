// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-photo like counters kept in the cache store.
//!
//! Increments are read-modify-write with no locking, so two simultaneous
//! likes can count once. The store offers nothing stronger.

use crate::db::{keys, CacheStore};
use crate::error::SourceError;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct LikesService {
    store: Arc<dyn CacheStore>,
}

impl LikesService {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Current like count; missing or unreadable counters are zero.
    pub async fn get_likes(&self, photo_id: &str) -> Result<u64, SourceError> {
        let raw = self.store.get(&keys::photo_likes(photo_id)).await?;
        Ok(raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0))
    }

    /// Non-zero like counts for `photo_ids`.
    pub async fn likes_for<'a, I>(
        &self,
        photo_ids: I,
    ) -> Result<BTreeMap<String, u64>, SourceError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = BTreeMap::new();
        for photo_id in photo_ids {
            let likes = self.get_likes(photo_id).await?;
            if likes > 0 {
                counts.insert(photo_id.to_string(), likes);
            }
        }
        Ok(counts)
    }

    /// Add one like and return the new count.
    pub async fn add_like(&self, photo_id: &str) -> Result<u64, SourceError> {
        let likes = self.get_likes(photo_id).await?.saturating_add(1);
        self.store
            .put(&keys::photo_likes(photo_id), likes.to_string())
            .await?;

        tracing::debug!(photo_id, likes, "Photo liked");
        Ok(likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCache;

    #[tokio::test]
    async fn test_likes_count_up() {
        let store = Arc::new(MemoryCache::new());
        let likes = LikesService::new(store.clone());

        assert_eq!(likes.get_likes("heron").await.unwrap(), 0);
        assert_eq!(likes.add_like("heron").await.unwrap(), 1);
        assert_eq!(likes.add_like("heron").await.unwrap(), 2);
        assert_eq!(likes.get_likes("heron").await.unwrap(), 2);
        assert_eq!(likes.get_likes("owl").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_garbage_counter_reads_as_zero() {
        let store = Arc::new(MemoryCache::new());
        store
            .put(&keys::photo_likes("x"), "lots".to_string())
            .await
            .unwrap();

        let likes = LikesService::new(store);
        assert_eq!(likes.get_likes("x").await.unwrap(), 0);
        assert_eq!(likes.add_like("x").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_likes_for_skips_unliked() {
        let likes = LikesService::new(Arc::new(MemoryCache::new()));
        likes.add_like("heron").await.unwrap();
        likes.add_like("heron").await.unwrap();
        likes.add_like("owl").await.unwrap();

        let counts = likes.likes_for(["heron", "owl", "wren"]).await.unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts["heron"], 2);
        assert_eq!(counts["owl"], 1);
    }

    #[tokio::test]
    async fn test_ids_with_slashes_stay_separate() {
        let store = Arc::new(MemoryCache::new());
        let likes = LikesService::new(store.clone());

        likes.add_like("a/b").await.unwrap();

        assert!(store.contains_key("photo_likes:a%2Fb"));
        assert_eq!(likes.get_likes("a/b").await.unwrap(), 1);
        assert_eq!(likes.get_likes("a").await.unwrap(), 0);
    }
}
