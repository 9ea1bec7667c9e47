// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cached values and their provenance.

use serde::{Deserialize, Serialize};

/// A value stored in the cache together with the time it was stored.
///
/// The cache store has no native expiry, so freshness is decided by the
/// reader from the embedded timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at_epoch_ms: i64,
    pub ttl_ms: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, stored_at_epoch_ms: i64, ttl_ms: i64) -> Self {
        Self {
            value,
            stored_at_epoch_ms,
            ttl_ms,
        }
    }

    /// Whether the entry is still valid at `now_ms` for the given TTL.
    pub fn is_fresh(&self, ttl_ms: i64, now_ms: i64) -> bool {
        is_fresh(self.stored_at_epoch_ms, ttl_ms, now_ms)
    }

    /// Epoch milliseconds at which the entry stops being valid.
    pub fn expires_at_ms(&self) -> i64 {
        self.stored_at_epoch_ms.saturating_add(self.ttl_ms)
    }
}

/// An entry stored at `stored_at_ms` is valid iff `now - stored_at < ttl`.
pub fn is_fresh(stored_at_ms: i64, ttl_ms: i64, now_ms: i64) -> bool {
    now_ms.saturating_sub(stored_at_ms) < ttl_ms
}

/// Which tier produced a resolved value. Used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Live profile API reached with an OAuth access token.
    Oauth,
    /// Complete profile document at a configured URL.
    ExternalFeed,
    /// Built-in baseline profile.
    StaticFallback,
    /// Image files listed from the photo repository.
    ContentListing,
    /// Built-in sample gallery.
    SampleSet,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Oauth => "oauth",
            SourceTag::ExternalFeed => "external_feed",
            SourceTag::StaticFallback => "static_fallback",
            SourceTag::ContentListing => "content_listing",
            SourceTag::SampleSet => "sample_set",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved value and the tier it came from.
///
/// This is what gets cached, so the tag survives cache hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub data: T,
    pub source: SourceTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_valid_until_ttl_elapses() {
        let t0 = 1_700_000_000_000;
        let ttl = 60_000;
        let entry = CacheEntry::new("v", t0, ttl);

        assert!(entry.is_fresh(ttl, t0));
        assert!(entry.is_fresh(ttl, t0 + ttl - 1));
        assert!(!entry.is_fresh(ttl, t0 + ttl));
        assert!(!entry.is_fresh(ttl, t0 + ttl + 1));
        assert_eq!(entry.expires_at_ms(), t0 + ttl);
    }

    #[test]
    fn test_zero_ttl_is_never_fresh() {
        assert!(!is_fresh(1_000, 0, 1_000));
    }

    #[test]
    fn test_entry_wire_format() {
        let entry = CacheEntry::new(
            Sourced {
                data: vec!["a".to_string()],
                source: SourceTag::ExternalFeed,
            },
            5,
            10,
        );
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["storedAtEpochMs"], 5);
        assert_eq!(json["ttlMs"], 10);
        assert_eq!(json["value"]["source"], "external_feed");
    }
}
