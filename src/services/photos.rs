// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo gallery resolution.
//!
//! Sources, in priority order:
//! 1. Image files listed from the photo repository, with optional metadata
//! 2. A built-in sample gallery

use crate::config::Config;
use crate::db::keys;
use crate::error::SourceError;
use crate::models::{PhotoMetadata, ResolvedPhoto, SourceTag, Sourced};
use crate::services::cache_aside::{CacheAside, Cached};
use crate::services::github_photos::{build_gallery, GitHubPhotosClient};
use crate::services::tiers::{first_success, Tier};
use std::time::Duration;

/// Resolves the photo gallery through the cache.
#[derive(Clone)]
pub struct PhotoService {
    cache: CacheAside,
    github: GitHubPhotosClient,
    ttl: Duration,
}

impl PhotoService {
    pub fn new(config: &Config, http: reqwest::Client, cache: CacheAside) -> Self {
        Self {
            cache,
            github: GitHubPhotosClient::new(config, http),
            ttl: Duration::from_secs(config.photo_cache_ttl_secs),
        }
    }

    /// Resolve the gallery, serving from cache when fresh. Never fails.
    pub async fn resolve_photos(&self) -> Cached<Sourced<Vec<ResolvedPhoto>>> {
        let result = self
            .cache
            .get_or_resolve(keys::PHOTOS, self.ttl, || self.resolve_uncached())
            .await;

        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Photo resolution failed, serving samples");
            Cached {
                value: Sourced {
                    data: sample_photos(),
                    source: SourceTag::SampleSet,
                },
                cached: false,
                stored_at_ms: self.cache.now_ms(),
                ttl_ms: 0,
            }
        })
    }

    /// Drop the cached gallery so the next request re-lists the repository.
    pub async fn clear_photo_cache(&self) -> Result<(), SourceError> {
        self.cache.invalidate(keys::PHOTOS).await
    }

    /// Run the tiers without consulting the cache.
    pub async fn resolve_uncached(&self) -> Result<Sourced<Vec<ResolvedPhoto>>, SourceError> {
        let tiers = vec![
            Tier::new(SourceTag::ContentListing, self.from_repository()),
            Tier::new(SourceTag::SampleSet, async { Ok(sample_photos()) }),
        ];

        let (data, source) = first_success(tiers).await?;
        Ok(Sourced { data, source })
    }

    async fn from_repository(&self) -> Result<Vec<ResolvedPhoto>, SourceError> {
        let images = self.github.list_images().await?;
        if images.is_empty() {
            return Err(SourceError::Transport(
                "Photo directory has no images".to_string(),
            ));
        }

        tracing::info!(count = images.len(), "Found photos in repository");
        let metadata = self.github.load_metadata().await;
        Ok(build_gallery(images, &metadata))
    }
}

fn sample(
    id: &str,
    base_url: &str,
    filename: &str,
    title: &str,
    description: &str,
    details: [&str; 5],
    tags: [&str; 3],
) -> ResolvedPhoto {
    let [camera, lens, settings, location, date] = details.map(|s| Some(s.to_string()));
    ResolvedPhoto {
        id: id.to_string(),
        base_url: base_url.to_string(),
        filename: filename.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        metadata: PhotoMetadata {
            camera,
            lens,
            settings,
            location,
            date,
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        },
    }
}

/// Built-in gallery shown when the repository is unavailable.
pub fn sample_photos() -> Vec<ResolvedPhoto> {
    vec![
        sample(
            "fallback-1",
            "https://images.unsplash.com/photo-1444464666168-49d633b86797",
            "cardinal-winter.jpg",
            "Northern Cardinal in Winter",
            "A vibrant male cardinal perched on a snow-covered branch during the early morning hours.",
            ["Canon EOS R5", "400mm f/5.6", "f/5.6, 1/500s, ISO 800", "Central Park, New York", "2024-01-15"],
            ["cardinal", "winter", "snow"],
        ),
        sample(
            "fallback-2",
            "https://images.unsplash.com/photo-1551731409-43eb3e517a1a",
            "hummingbird-flight.jpg",
            "Ruby-throated Hummingbird",
            "Captured mid-flight as this tiny jewel hovers near a feeder, wings beating at incredible speed.",
            ["Nikon D850", "600mm f/4", "f/4.0, 1/2000s, ISO 1600", "Backyard Garden, Connecticut", "2024-02-20"],
            ["hummingbird", "flight", "action"],
        ),
        sample(
            "fallback-3",
            "https://images.unsplash.com/photo-1518709268805-4e9042af2176",
            "eagle-portrait.jpg",
            "Bald Eagle Portrait",
            "A majestic bald eagle showcasing the intense gaze and detailed feather patterns.",
            ["Sony A7R IV", "800mm f/6.3", "f/6.3, 1/1000s, ISO 400", "Alaska Wildlife Reserve", "2024-03-10"],
            ["eagle", "portrait", "majestic"],
        ),
        sample(
            "fallback-4",
            "https://images.unsplash.com/photo-1559827260-dc66d52bef19",
            "owl-closeup.jpg",
            "Great Horned Owl",
            "An intimate portrait of a great horned owl, highlighting the piercing yellow eyes.",
            ["Canon EOS R6", "500mm f/4.5", "f/4.5, 1/800s, ISO 1000", "Pacific Northwest Forest", "2024-04-05"],
            ["owl", "eyes", "nocturnal"],
        ),
        sample(
            "fallback-5",
            "https://images.unsplash.com/photo-1583212292454-1fe6229603b7",
            "kingfisher-dive.jpg",
            "Kingfisher Diving",
            "Perfect timing captures a belted kingfisher just as it dives toward the water.",
            ["Nikon Z9", "600mm f/5.6", "f/5.6, 1/1600s, ISO 640", "Lake Tahoe, California", "2024-05-12"],
            ["kingfisher", "diving", "action"],
        ),
        sample(
            "fallback-6",
            "https://images.unsplash.com/photo-1574781330855-d0db2706b3d0",
            "peacock-display.jpg",
            "Peacock Display",
            "A stunning male peacock in full display, showing off the iridescent eye-spots.",
            ["Sony A1", "300mm f/2.8", "f/2.8, 1/250s, ISO 200", "Botanical Gardens, San Diego", "2024-06-18"],
            ["peacock", "display", "colorful"],
        ),
    ]
}
