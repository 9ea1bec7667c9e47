// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LinkedIn profile API client.
//!
//! The API only exposes identity fields (no positions, schools or skills),
//! so the mapped profile is always merged over a baseline.

use crate::error::SourceError;
use crate::models::ResolvedProfile;
use crate::services::upstream::json_or_error;
use serde::Deserialize;
use std::collections::BTreeMap;

/// LinkedIn API client.
#[derive(Clone)]
pub struct LinkedInClient {
    http: reqwest::Client,
    base_url: String,
}

impl LinkedInClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the authenticated member's profile.
    pub async fn get_profile(&self, access_token: &str) -> Result<LinkedInProfile, SourceError> {
        let url = format!("{}/me", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        json_or_error(response).await
    }
}

/// Member profile as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInProfile {
    #[serde(default)]
    pub id: String,
    pub first_name: Option<LocalizedString>,
    pub last_name: Option<LocalizedString>,
    pub headline: Option<LocalizedString>,
    pub summary: Option<String>,
    pub industry: Option<String>,
    pub location: Option<LinkedInLocation>,
    pub profile_picture: Option<LinkedInPicture>,
}

/// Text available in several locales.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedString {
    #[serde(default)]
    pub localized: BTreeMap<String, String>,
    pub preferred_locale: Option<Locale>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Locale {
    pub country: String,
    pub language: String,
}

impl LocalizedString {
    /// Text in the preferred locale (`en_US` if none), else any locale.
    pub fn resolve(&self) -> String {
        let key = match &self.preferred_locale {
            Some(locale) => format!("{}_{}", locale.language, locale.country),
            None => "en_US".to_string(),
        };

        self.localized
            .get(&key)
            .or_else(|| self.localized.values().next())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedInLocation {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInPicture {
    pub display_image: Option<String>,
}

impl LinkedInProfile {
    /// Map to the canonical shape. List fields are left empty.
    pub fn into_profile(self, fallback_photo: Option<&str>) -> ResolvedProfile {
        let text = |value: Option<LocalizedString>| value.map(|v| v.resolve()).unwrap_or_default();

        ResolvedProfile {
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            headline: text(self.headline),
            summary: self.summary.unwrap_or_default(),
            location: self.location.map(|l| l.name).unwrap_or_default(),
            industry: self.industry.unwrap_or_default(),
            profile_picture: self
                .profile_picture
                .and_then(|p| p.display_image)
                .or_else(|| fallback_photo.map(str::to_string)),
            ..Default::default()
        }
    }
}
