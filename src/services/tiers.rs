// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered fallback across data sources.
//!
//! A resolver is a list of [`Tier`]s in priority order. [`first_success`]
//! awaits them one at a time and returns the first `Ok`. Tier futures are
//! lazy, so a lower tier does no work unless every tier above it failed.
//! Each tier gets exactly one attempt.

use crate::error::SourceError;
use crate::models::SourceTag;
use futures_util::future::BoxFuture;
use std::future::Future;

/// One candidate data source.
pub struct Tier<'a, T> {
    tag: SourceTag,
    fetch: BoxFuture<'a, Result<T, SourceError>>,
}

impl<'a, T> Tier<'a, T> {
    pub fn new<F>(tag: SourceTag, fetch: F) -> Self
    where
        F: Future<Output = Result<T, SourceError>> + Send + 'a,
    {
        Self {
            tag,
            fetch: Box::pin(fetch),
        }
    }
}

/// Await `tiers` in order and return the first success with its tag.
///
/// Failures are logged and skipped. If every tier fails the result is
/// [`SourceError::ResolutionFailed`].
pub async fn first_success<T>(tiers: Vec<Tier<'_, T>>) -> Result<(T, SourceTag), SourceError> {
    for tier in tiers {
        match tier.fetch.await {
            Ok(value) => {
                tracing::info!(source = %tier.tag, "Resolved from source");
                return Ok((value, tier.tag));
            }
            Err(e) => {
                tracing::warn!(source = %tier.tag, error = %e, "Source failed, falling through");
            }
        }
    }

    Err(SourceError::ResolutionFailed)
}
