// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resume profile model.

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical resume profile served to the site.
///
/// Every field has a default so partial documents from a feed deserialize
/// cleanly; list fields are always present (possibly empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolvedProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,
}

/// One position held.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issuer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issue_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_url: Option<String>,
}

impl ResolvedProfile {
    /// Overlay this profile's non-empty fields on `baseline`.
    ///
    /// Each scalar and each list is taken from `self` when it is non-empty
    /// and from `baseline` otherwise.
    pub fn merged_over(self, baseline: ResolvedProfile) -> ResolvedProfile {
        ResolvedProfile {
            first_name: pick_text(self.first_name, baseline.first_name),
            last_name: pick_text(self.last_name, baseline.last_name),
            headline: pick_text(self.headline, baseline.headline),
            summary: pick_text(self.summary, baseline.summary),
            location: pick_text(self.location, baseline.location),
            industry: pick_text(self.industry, baseline.industry),
            profile_picture: self
                .profile_picture
                .filter(|url| !url.trim().is_empty())
                .or(baseline.profile_picture),
            experience: pick_list(self.experience, baseline.experience),
            education: pick_list(self.education, baseline.education),
            skills: pick_list(self.skills, baseline.skills),
            certifications: pick_list(self.certifications, baseline.certifications),
        }
    }
}

/// Read an explicit `null` as the type's default, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn pick_text(primary: String, fallback: String) -> String {
    if primary.trim().is_empty() {
        fallback
    } else {
        primary
    }
}

fn pick_list<T>(primary: Vec<T>, fallback: Vec<T>) -> Vec<T> {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}
