//! Application configuration loaded from environment variables.
//!
//! Every upstream source is optional. An unset (or empty) variable simply
//! disables the tier that depends on it, so a bare environment still serves
//! the static profile and sample gallery.

use std::env;

/// Where cached values are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Process-local map (local development, tests).
    Memory,
    /// One Firestore document per cache key.
    Firestore,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Public base URL of the site (used for OAuth redirect URIs)
    pub site_url: String,
    /// Profile photo used when a source has none
    pub profile_photo_url: Option<String>,
    /// JSON document with the full resume profile
    pub profile_json_url: Option<String>,

    // --- OAuth ---
    pub linkedin_client_id: String,
    pub linkedin_client_secret: String,
    pub linkedin_redirect_uri: Option<String>,
    pub google_photos_client_id: String,
    pub google_photos_client_secret: String,
    pub google_photos_redirect_uri: Option<String>,
    /// HMAC key for the OAuth `state` parameter (defaults to the client secret)
    pub oauth_state_key: Option<Vec<u8>>,

    // --- Photo repository ---
    pub github_username: String,
    pub github_photos_repo: String,
    pub github_photos_path: String,
    pub github_photos_metadata_path: String,
    pub github_photos_branch: String,

    // --- Cache ---
    pub cache_backend: CacheBackend,
    pub gcp_project_id: String,
    pub profile_cache_ttl_secs: u64,
    pub photo_cache_ttl_secs: u64,

    /// Per-request timeout for every upstream call
    pub http_timeout_secs: u64,

    // --- Upstream endpoints ---
    pub linkedin_api_base: String,
    pub linkedin_auth_base: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub github_api_base: String,
    pub github_raw_base: String,
}

impl Config {
    /// Offline configuration for tests: no OAuth, no feed, memory cache.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            site_url: "http://localhost:8080".to_string(),
            profile_photo_url: None,
            profile_json_url: None,
            linkedin_client_id: String::new(),
            linkedin_client_secret: String::new(),
            linkedin_redirect_uri: None,
            google_photos_client_id: String::new(),
            google_photos_client_secret: String::new(),
            google_photos_redirect_uri: None,
            oauth_state_key: Some(b"test_oauth_state_key".to_vec()),
            github_username: "tinkeran".to_string(),
            github_photos_repo: "raju-bhupatiraju-portfolio".to_string(),
            github_photos_path: "public/photos".to_string(),
            github_photos_metadata_path: "data/photos-metadata.json".to_string(),
            github_photos_branch: "main".to_string(),
            cache_backend: CacheBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            profile_cache_ttl_secs: 24 * 60 * 60,
            photo_cache_ttl_secs: 60 * 60,
            http_timeout_secs: 2,
            linkedin_api_base: "https://api.linkedin.com/v2".to_string(),
            linkedin_auth_base: "https://www.linkedin.com/oauth/v2".to_string(),
            google_auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            google_token_url: "https://oauth2.googleapis.com/token".to_string(),
            // Unroutable so an offline test never reaches GitHub.
            github_api_base: "http://127.0.0.1:9".to_string(),
            github_raw_base: "http://127.0.0.1:9".to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let cache_backend = match optional("CACHE_BACKEND").as_deref() {
            None | Some("memory") => CacheBackend::Memory,
            Some("firestore") => CacheBackend::Firestore,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "CACHE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            port: parsed("PORT", 8080)?,
            site_url: optional("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            profile_photo_url: optional("PROFILE_PHOTO_URL"),
            profile_json_url: optional("PROFILE_JSON_URL"),

            linkedin_client_id: optional("LINKEDIN_CLIENT_ID").unwrap_or_default(),
            linkedin_client_secret: optional("LINKEDIN_CLIENT_SECRET").unwrap_or_default(),
            linkedin_redirect_uri: optional("LINKEDIN_REDIRECT_URI"),
            google_photos_client_id: optional("GOOGLE_PHOTOS_CLIENT_ID").unwrap_or_default(),
            google_photos_client_secret: optional("GOOGLE_PHOTOS_CLIENT_SECRET")
                .unwrap_or_default(),
            google_photos_redirect_uri: optional("GOOGLE_PHOTOS_REDIRECT_URI"),
            oauth_state_key: optional("OAUTH_STATE_KEY").map(String::into_bytes),

            github_username: optional("GITHUB_USERNAME").unwrap_or_else(|| "tinkeran".to_string()),
            github_photos_repo: optional("GITHUB_PHOTOS_REPO")
                .unwrap_or_else(|| "raju-bhupatiraju-portfolio".to_string()),
            github_photos_path: optional("GITHUB_PHOTOS_PATH")
                .unwrap_or_else(|| "public/photos".to_string()),
            github_photos_metadata_path: optional("GITHUB_PHOTOS_METADATA_PATH")
                .unwrap_or_else(|| "data/photos-metadata.json".to_string()),
            github_photos_branch: optional("GITHUB_PHOTOS_BRANCH")
                .unwrap_or_else(|| "main".to_string()),

            cache_backend,
            gcp_project_id: optional("GCP_PROJECT_ID").unwrap_or_else(|| "local-dev".to_string()),
            profile_cache_ttl_secs: parsed("PROFILE_CACHE_TTL_SECS", 24 * 60 * 60)?,
            photo_cache_ttl_secs: parsed("PHOTO_CACHE_TTL_SECS", 60 * 60)?,
            http_timeout_secs: parsed("HTTP_TIMEOUT_SECS", 5)?,

            linkedin_api_base: optional("LINKEDIN_API_BASE")
                .unwrap_or_else(|| "https://api.linkedin.com/v2".to_string()),
            linkedin_auth_base: optional("LINKEDIN_AUTH_BASE")
                .unwrap_or_else(|| "https://www.linkedin.com/oauth/v2".to_string()),
            google_auth_url: optional("GOOGLE_AUTH_URL")
                .unwrap_or_else(|| "https://accounts.google.com/o/oauth2/v2/auth".to_string()),
            google_token_url: optional("GOOGLE_TOKEN_URL")
                .unwrap_or_else(|| "https://oauth2.googleapis.com/token".to_string()),
            github_api_base: optional("GITHUB_API_BASE")
                .unwrap_or_else(|| "https://api.github.com".to_string()),
            github_raw_base: optional("GITHUB_RAW_BASE")
                .unwrap_or_else(|| "https://raw.githubusercontent.com".to_string()),
        })
    }
}

/// Read an environment variable, treating empty values as unset.
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both assertions live in one test because the environment is process-global.
    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "9090");
        env::set_var("SITE_URL", "https://portfolio.example.com/");
        env::set_var("LINKEDIN_CLIENT_ID", "linkedin_id");
        env::set_var("PROFILE_JSON_URL", "");
        env::set_var("CACHE_BACKEND", "firestore");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 9090);
        assert_eq!(config.site_url, "https://portfolio.example.com");
        assert_eq!(config.linkedin_client_id, "linkedin_id");
        assert_eq!(config.profile_json_url, None);
        assert_eq!(config.cache_backend, CacheBackend::Firestore);
        assert_eq!(config.github_photos_branch, "main");

        env::set_var("CACHE_BACKEND", "redis");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("CACHE_BACKEND"));

        for name in [
            "PORT",
            "SITE_URL",
            "LINKEDIN_CLIENT_ID",
            "PROFILE_JSON_URL",
            "CACHE_BACKEND",
        ] {
            env::remove_var(name);
        }
    }
}
