// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod cache;
pub mod photo;
pub mod profile;
pub mod token;

pub use cache::{CacheEntry, Sourced, SourceTag};
pub use photo::{PhotoMetadata, ResolvedPhoto};
pub use profile::{Certification, Education, Experience, ResolvedProfile};
pub use token::OAuthTokenRecord;
