// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - resolvers, OAuth and upstream clients.

pub mod cache_aside;
pub mod github_photos;
pub mod likes;
pub mod linkedin;
pub mod oauth;
pub mod photos;
pub mod profile;
pub mod tiers;
pub mod upstream;

pub use cache_aside::{CacheAside, Cached, Clock};
pub use likes::LikesService;
pub use oauth::{OAuthProvider, OAuthService};
pub use photos::PhotoService;
pub use profile::ProfileService;
