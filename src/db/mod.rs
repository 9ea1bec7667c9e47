// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cache store layer.
//!
//! A [`CacheStore`] is a plain key-value store of strings. It has no notion
//! of expiry; callers embed timestamps in the values they write.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreCache;
pub use memory::MemoryCache;

use crate::error::SourceError;
use async_trait::async_trait;

/// Key-value store shared by every request.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value, `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, SourceError>;

    /// Write a value, replacing any previous one.
    async fn put(&self, key: &str, value: String) -> Result<(), SourceError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), SourceError>;
}

/// Cache key names.
pub mod keys {
    pub const PROFILE: &str = "profile:resolved";
    pub const PHOTOS: &str = "photos:gallery";

    /// Key holding the OAuth token for a provider.
    pub fn oauth_token(provider: &str) -> String {
        format!("oauth_token:{}", provider)
    }

    /// Key holding the like counter for a photo.
    ///
    /// The id comes from a URL path, so it is percent-encoded to keep `/`
    /// and other reserved characters out of the document ID.
    pub fn photo_likes(photo_id: &str) -> String {
        format!("photo_likes:{}", urlencoding::encode(photo_id))
    }
}

/// Collection names as constants.
pub mod collections {
    pub const CACHE: &str = "cache";
}
