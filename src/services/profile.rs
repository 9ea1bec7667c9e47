// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resume profile resolution.
//!
//! Sources, in priority order:
//! 1. LinkedIn API, when OAuth is configured and a token is available
//! 2. A JSON profile document at `PROFILE_JSON_URL`
//! 3. The built-in baseline
//!
//! Tiers 1 and 2 are merged field by field over the baseline, so a partial
//! source never blanks out a section of the resume.

use crate::config::Config;
use crate::db::keys;
use crate::error::SourceError;
use crate::models::{
    Certification, Education, Experience, ResolvedProfile, SourceTag, Sourced,
};
use crate::services::cache_aside::{CacheAside, Cached};
use crate::services::linkedin::LinkedInClient;
use crate::services::oauth::{OAuthProvider, OAuthService};
use crate::services::tiers::{first_success, Tier};
use crate::services::upstream::json_or_error;
use reqwest::header;
use std::time::Duration;

/// Photo used when neither a source nor the configuration supplies one.
const DEFAULT_PROFILE_PHOTO: &str =
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=300&h=300&fit=crop&crop=face";

/// Resolves the resume profile through the cache.
#[derive(Clone)]
pub struct ProfileService {
    http: reqwest::Client,
    cache: CacheAside,
    oauth: OAuthService,
    linkedin: LinkedInClient,
    feed_url: Option<String>,
    profile_photo_url: Option<String>,
    ttl: Duration,
}

impl ProfileService {
    pub fn new(
        config: &Config,
        http: reqwest::Client,
        cache: CacheAside,
        oauth: OAuthService,
    ) -> Self {
        Self {
            linkedin: LinkedInClient::new(http.clone(), &config.linkedin_api_base),
            http,
            cache,
            oauth,
            feed_url: config.profile_json_url.clone(),
            profile_photo_url: config.profile_photo_url.clone(),
            ttl: Duration::from_secs(config.profile_cache_ttl_secs),
        }
    }

    /// Resolve the profile, serving from cache when fresh.
    ///
    /// Never fails: if resolution somehow fails the baseline is returned
    /// without being cached.
    pub async fn resolve_profile(&self) -> Cached<Sourced<ResolvedProfile>> {
        let result = self
            .cache
            .get_or_resolve(keys::PROFILE, self.ttl, || self.resolve_uncached())
            .await;

        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Profile resolution failed, serving baseline");
            Cached {
                value: Sourced {
                    data: self.baseline(),
                    source: SourceTag::StaticFallback,
                },
                cached: false,
                stored_at_ms: self.cache.now_ms(),
                ttl_ms: 0,
            }
        })
    }

    /// Drop the cached profile so the next request re-resolves it.
    pub async fn clear_profile_cache(&self) -> Result<(), SourceError> {
        self.cache.invalidate(keys::PROFILE).await
    }

    /// Run the tiers without consulting the cache.
    pub async fn resolve_uncached(&self) -> Result<Sourced<ResolvedProfile>, SourceError> {
        let tiers = vec![
            Tier::new(SourceTag::Oauth, self.from_oauth()),
            Tier::new(SourceTag::ExternalFeed, self.from_feed()),
            Tier::new(SourceTag::StaticFallback, async { Ok(self.baseline()) }),
        ];

        let (data, source) = first_success(tiers).await?;
        Ok(Sourced { data, source })
    }

    async fn from_oauth(&self) -> Result<ResolvedProfile, SourceError> {
        if !self.oauth.is_configured(OAuthProvider::Linkedin) {
            return Err(SourceError::Auth("LinkedIn OAuth not configured".to_string()));
        }

        let access_token = self
            .oauth
            .get_cached_token(OAuthProvider::Linkedin)
            .await
            .ok_or_else(|| SourceError::Auth("No LinkedIn access token".to_string()))?;

        let profile = self
            .linkedin
            .get_profile(&access_token)
            .await?
            .into_profile(self.profile_photo_url.as_deref());

        Ok(profile.merged_over(self.baseline()))
    }

    async fn from_feed(&self) -> Result<ResolvedProfile, SourceError> {
        let Some(url) = self.feed_url.as_deref() else {
            return Err(SourceError::Transport("PROFILE_JSON_URL not configured".to_string()));
        };

        tracing::debug!(url, "Fetching profile document");
        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;

        let mut remote: ResolvedProfile = json_or_error(response).await?;
        if remote.profile_picture.as_deref().map_or(true, str::is_empty) {
            remote.profile_picture = self.profile_photo_url.clone();
        }

        Ok(remote.merged_over(self.baseline()))
    }

    /// Built-in profile, always available.
    pub fn baseline(&self) -> ResolvedProfile {
        baseline_profile(self.profile_photo_url.as_deref())
    }
}

/// The baseline resume.
pub fn baseline_profile(profile_photo_url: Option<&str>) -> ResolvedProfile {
    ResolvedProfile {
        first_name: "Raju".to_string(),
        last_name: "Bhupatiraju".to_string(),
        headline: "Enterprise Applications Leader | Digital Transformation Expert | Technology Strategist".to_string(),
        summary: "Seasoned Enterprise Applications Leader with extensive experience in driving digital transformation initiatives, leading cross-functional teams, and delivering scalable technology solutions. Passionate about leveraging cutting-edge technologies to solve complex business challenges and optimize operational efficiency.".to_string(),
        location: "United States".to_string(),
        industry: "Information Technology & Services".to_string(),
        profile_picture: Some(
            profile_photo_url
                .unwrap_or(DEFAULT_PROFILE_PHOTO)
                .to_string(),
        ),
        experience: vec![
            Experience {
                title: "Senior Director, Enterprise Applications".to_string(),
                company: "Fortune 500 Technology Company".to_string(),
                location: Some("United States".to_string()),
                start_date: "2020-01".to_string(),
                end_date: None,
                description: "Leading enterprise-wide application strategy and digital transformation initiatives. Managing a team of 50+ engineers and architects across multiple product lines. Driving adoption of cloud-native technologies and modern development practices.".to_string(),
                current: true,
            },
            Experience {
                title: "Director, Application Development".to_string(),
                company: "Global Technology Solutions".to_string(),
                location: Some("United States".to_string()),
                start_date: "2017-03".to_string(),
                end_date: Some("2019-12".to_string()),
                description: "Directed application development lifecycle for mission-critical enterprise systems. Implemented DevOps practices and CI/CD pipelines, resulting in 40% faster deployment cycles and improved system reliability.".to_string(),
                current: false,
            },
            Experience {
                title: "Senior Manager, Software Engineering".to_string(),
                company: "Enterprise Software Corp".to_string(),
                location: Some("United States".to_string()),
                start_date: "2014-06".to_string(),
                end_date: Some("2017-02".to_string()),
                description: "Managed software engineering teams developing scalable web applications and microservices. Led migration from monolithic to microservices architecture, improving system scalability and maintainability.".to_string(),
                current: false,
            },
        ],
        education: vec![
            Education {
                school: "University of Technology".to_string(),
                degree: "Master of Science".to_string(),
                field: "Computer Science".to_string(),
                start_year: "2010".to_string(),
                end_year: Some("2012".to_string()),
                description: Some("Specialized in distributed systems and software architecture".to_string()),
            },
            Education {
                school: "Engineering Institute".to_string(),
                degree: "Bachelor of Technology".to_string(),
                field: "Information Technology".to_string(),
                start_year: "2006".to_string(),
                end_year: Some("2010".to_string()),
                description: Some("Foundation in computer science and software engineering principles".to_string()),
            },
        ],
        skills: [
            "Enterprise Architecture",
            "Digital Transformation",
            "Cloud Computing",
            "Microservices",
            "DevOps",
            "Agile Methodologies",
            "Team Leadership",
            "Strategic Planning",
            "Software Development",
            "System Integration",
            "Project Management",
            "Technology Strategy",
        ]
        .into_iter()
        .map(str::to_string)
        .collect(),
        certifications: vec![
            Certification {
                name: "AWS Certified Solutions Architect".to_string(),
                issuer: "Amazon Web Services".to_string(),
                issue_date: "2023-06".to_string(),
                expiration_date: Some("2026-06".to_string()),
                credential_id: Some("AWS-SA-2023-001".to_string()),
                credential_url: None,
            },
            Certification {
                name: "Certified Scrum Master".to_string(),
                issuer: "Scrum Alliance".to_string(),
                issue_date: "2022-03".to_string(),
                expiration_date: Some("2024-03".to_string()),
                credential_id: Some("CSM-2022-001".to_string()),
                credential_url: None,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_shape() {
        let profile = baseline_profile(None);

        assert_eq!(profile.first_name, "Raju");
        assert_eq!(profile.skills.len(), 12);
        assert_eq!(profile.experience.len(), 3);
        assert!(profile.experience[0].current);
        assert_eq!(profile.education.len(), 2);
        assert_eq!(profile.certifications.len(), 2);
        assert_eq!(
            profile.profile_picture.as_deref(),
            Some(DEFAULT_PROFILE_PHOTO)
        );
    }

    #[test]
    fn test_baseline_uses_configured_photo() {
        let profile = baseline_profile(Some("https://img.example/raju.jpg"));
        assert_eq!(
            profile.profile_picture.as_deref(),
            Some("https://img.example/raju.jpg")
        );
    }
}
