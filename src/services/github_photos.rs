// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo listing from a GitHub repository.
//!
//! Image files are listed through the contents API. An optional metadata
//! document in the same repository supplies titles, captions and capture
//! details keyed by filename (or blob SHA).

use crate::config::Config;
use crate::error::SourceError;
use crate::models::{PhotoMetadata, ResolvedPhoto};
use crate::services::upstream::json_or_error;
use reqwest::header;
use serde::Deserialize;

const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".webp", ".gif"];

const DEFAULT_DESCRIPTION: &str = "Beautiful bird photography captured in stunning detail.";

/// GitHub contents API client for one photo directory.
#[derive(Clone)]
pub struct GitHubPhotosClient {
    http: reqwest::Client,
    contents_url: String,
    metadata_url: String,
}

/// Entry returned by the contents API.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
    #[serde(default)]
    pub size: u64,
    pub sha: String,
}

impl ContentEntry {
    fn is_image(&self) -> bool {
        let name = self.name.to_lowercase();
        self.kind == "file" && IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }
}

/// One record of the metadata document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetadataRecord {
    pub id: Option<String>,
    pub filename: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub settings: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl GitHubPhotosClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let contents_url = format!(
            "{}/repos/{}/{}/contents/{}",
            config.github_api_base.trim_end_matches('/'),
            config.github_username,
            config.github_photos_repo,
            config.github_photos_path.trim_matches('/'),
        );
        let metadata_url = format!(
            "{}/{}/{}/{}/{}",
            config.github_raw_base.trim_end_matches('/'),
            config.github_username,
            config.github_photos_repo,
            config.github_photos_branch,
            config.github_photos_metadata_path.trim_start_matches('/'),
        );

        Self {
            http,
            contents_url,
            metadata_url,
        }
    }

    /// List image files in the photo directory, in listing order.
    pub async fn list_images(&self) -> Result<Vec<ContentEntry>, SourceError> {
        tracing::debug!(url = %self.contents_url, "Listing photo directory");

        let response = self
            .http
            .get(&self.contents_url)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?;

        let entries: Vec<ContentEntry> = json_or_error(response).await?;
        Ok(entries.into_iter().filter(ContentEntry::is_image).collect())
    }

    /// Load the metadata document. Missing or malformed documents yield no
    /// metadata rather than an error, and malformed records are skipped.
    pub async fn load_metadata(&self) -> Vec<MetadataRecord> {
        let result = async {
            let response = self.http.get(&self.metadata_url).send().await?;
            json_or_error::<Vec<serde_json::Value>>(response).await
        }
        .await;

        match result {
            Ok(values) => parse_metadata(values),
            Err(e) => {
                tracing::info!(url = %self.metadata_url, error = %e, "No photo metadata, using defaults");
                Vec::new()
            }
        }
    }
}

/// Deserialize each metadata record on its own, dropping the ones that
/// do not fit.
pub fn parse_metadata(values: Vec<serde_json::Value>) -> Vec<MetadataRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(index, error = %e, "Skipping malformed photo metadata record");
                None
            }
        })
        .collect()
}

/// Pair each listed image with its metadata, keeping listing order.
pub fn build_gallery(entries: Vec<ContentEntry>, metadata: &[MetadataRecord]) -> Vec<ResolvedPhoto> {
    entries
        .into_iter()
        .map(|entry| {
            let meta = metadata
                .iter()
                .find(|m| m.filename == entry.name || m.id.as_deref() == Some(entry.sha.as_str()));

            let title = meta
                .and_then(|m| m.title.clone())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| title_from_filename(&entry.name));
            let description = meta
                .and_then(|m| m.description.clone())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
            let metadata = meta
                .map(|m| PhotoMetadata {
                    camera: m.camera.clone(),
                    lens: m.lens.clone(),
                    settings: m.settings.clone(),
                    location: m.location.clone(),
                    date: m.date.clone(),
                    tags: m.tags.clone(),
                })
                .unwrap_or_default();

            ResolvedPhoto {
                id: entry.sha,
                base_url: entry.download_url.unwrap_or_default(),
                filename: entry.name,
                title,
                description,
                metadata,
            }
        })
        .collect()
}

/// Derive a display title: drop the extension, turn `-` and `_` into spaces
/// and capitalize the first letter of each word.
pub fn title_from_filename(filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(idx) if !filename[idx + 1..].is_empty() && !filename[idx + 1..].contains('/') => {
            &filename[..idx]
        }
        _ => filename,
    };

    let mut title = String::with_capacity(stem.len());
    let mut at_word_start = true;
    for c in stem.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                title.extend(c.to_uppercase());
            } else {
                title.push(c);
            }
            at_word_start = false;
        } else {
            title.push(c);
            at_word_start = true;
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: &str) -> ContentEntry {
        ContentEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            download_url: Some(format!("https://raw.example/{}", name)),
            size: 1024,
            sha: format!("sha-{}", name),
        }
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(title_from_filename("blue-jay_in-flight.jpg"), "Blue Jay In Flight");
        assert_eq!(title_from_filename("IMG_0042.JPEG"), "IMG 0042");
        assert_eq!(title_from_filename("heron.v2.png"), "Heron.V2");
        assert_eq!(title_from_filename("no_extension"), "No Extension");
        assert_eq!(title_from_filename("owl's-nest.webp"), "Owl'S Nest");
    }

    #[test]
    fn test_image_filter() {
        assert!(entry("cardinal.JPG", "file").is_image());
        assert!(entry("wren.webp", "file").is_image());
        assert!(!entry("notes.md", "file").is_image());
        assert!(!entry("album.jpg", "dir").is_image());
    }

    #[test]
    fn test_parse_metadata_skips_bad_records() {
        let values: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"filename": "heron.jpg", "title": "Great Blue Heron"},
                {"filename": "other.jpg", "tags": "a,b"},
                "not an object",
                {"filename": "owl.png", "tags": ["owl"]}
            ]"#,
        )
        .unwrap();

        let records = parse_metadata(values);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("Great Blue Heron"));
        assert_eq!(records[1].filename, "owl.png");
    }

    #[test]
    fn test_build_gallery_matches_by_filename_or_sha() {
        let entries = vec![entry("a-b.jpg", "file"), entry("c.png", "file"), entry("d.gif", "file")];
        let metadata = vec![
            MetadataRecord {
                filename: "a-b.jpg".to_string(),
                title: Some("Sunrise Egret".to_string()),
                camera: Some("Canon EOS R5".to_string()),
                tags: Some(vec!["egret".to_string()]),
                ..Default::default()
            },
            MetadataRecord {
                id: Some("sha-c.png".to_string()),
                filename: "renamed.png".to_string(),
                description: Some("Caption".to_string()),
                ..Default::default()
            },
        ];

        let gallery = build_gallery(entries, &metadata);

        assert_eq!(gallery.len(), 3);
        assert_eq!(gallery[0].title, "Sunrise Egret");
        assert_eq!(gallery[0].description, DEFAULT_DESCRIPTION);
        assert_eq!(gallery[0].metadata.camera.as_deref(), Some("Canon EOS R5"));
        assert_eq!(gallery[1].title, "C");
        assert_eq!(gallery[1].description, "Caption");
        assert_eq!(gallery[2].title, "D");
        assert_eq!(gallery[2].metadata, PhotoMetadata::default());
        assert_eq!(gallery[2].base_url, "https://raw.example/d.gif");
        assert_eq!(gallery[2].id, "sha-d.gif");
    }
}
