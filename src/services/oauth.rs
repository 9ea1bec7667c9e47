// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth authorization and token lifecycle.
//!
//! One token per provider lives in the cache store under
//! `oauth_token:{provider}`. The lifecycle is:
//!
//! - no record: unauthenticated
//! - code exchange succeeds: record written (authorized)
//! - read within 5 minutes of expiry: expired, detected lazily
//! - expired with a refresh token: one refresh call; success overwrites the
//!   record, failure deletes it
//! - expired without a refresh token: record deleted
//! - `clear_oauth_token`: record deleted regardless of state

use crate::config::Config;
use crate::db::{keys, CacheStore};
use crate::error::{AppError, SourceError};
use crate::models::OAuthTokenRecord;
use crate::services::cache_aside::CacheAside;
use crate::services::upstream::json_or_error;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// How long an issued `state` parameter stays acceptable (1 hour).
const STATE_MAX_AGE_MS: i64 = 60 * 60 * 1000;

/// Supported OAuth providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OAuthProvider {
    Linkedin,
    GooglePhotos,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Linkedin => "linkedin",
            OAuthProvider::GooglePhotos => "google-photos",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Linkedin => "LinkedIn",
            OAuthProvider::GooglePhotos => "Google Photos",
        }
    }

    /// Site page that shows data from this provider.
    pub fn landing_path(&self) -> &'static str {
        match self {
            OAuthProvider::Linkedin => "/resume",
            OAuthProvider::GooglePhotos => "/photography",
        }
    }

    /// Cached data that must be re-resolved once a new token is available.
    pub fn dependent_cache_key(&self) -> &'static str {
        match self {
            OAuthProvider::Linkedin => keys::PROFILE,
            OAuthProvider::GooglePhotos => keys::PHOTOS,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "linkedin" => Some(OAuthProvider::Linkedin),
            "google-photos" => Some(OAuthProvider::GooglePhotos),
            _ => None,
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endpoints and credentials for one provider.
#[derive(Debug, Clone)]
struct ProviderSettings {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    authorize_url: String,
    token_url: String,
    scopes: &'static [&'static str],
    extra_params: &'static [(&'static str, &'static str)],
}

impl ProviderSettings {
    fn linkedin(config: &Config) -> Self {
        let auth_base = config.linkedin_auth_base.trim_end_matches('/');
        Self {
            client_id: config.linkedin_client_id.clone(),
            client_secret: config.linkedin_client_secret.clone(),
            redirect_uri: config.linkedin_redirect_uri.clone().unwrap_or_else(|| {
                format!("{}/auth/linkedin/callback", config.site_url)
            }),
            authorize_url: format!("{}/authorization", auth_base),
            token_url: format!("{}/accessToken", auth_base),
            scopes: &["r_liteprofile", "r_emailaddress", "w_member_social"],
            extra_params: &[],
        }
    }

    fn google_photos(config: &Config) -> Self {
        Self {
            client_id: config.google_photos_client_id.clone(),
            client_secret: config.google_photos_client_secret.clone(),
            redirect_uri: config.google_photos_redirect_uri.clone().unwrap_or_else(|| {
                format!("{}/auth/google-photos/callback", config.site_url)
            }),
            authorize_url: config.google_auth_url.clone(),
            token_url: config.google_token_url.clone(),
            scopes: &[
                "https://www.googleapis.com/auth/photoslibrary.readonly",
                "https://www.googleapis.com/auth/photoslibrary.sharing",
            ],
            extra_params: &[("access_type", "offline"), ("prompt", "consent")],
        }
    }

    fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub token_type: String,
}

/// OAuth flows and token storage for every provider.
#[derive(Clone)]
pub struct OAuthService {
    http: reqwest::Client,
    cache: CacheAside,
    linkedin: ProviderSettings,
    google_photos: ProviderSettings,
    state_key: Option<Vec<u8>>,
}

impl OAuthService {
    pub fn new(config: &Config, http: reqwest::Client, cache: CacheAside) -> Self {
        Self {
            http,
            cache,
            linkedin: ProviderSettings::linkedin(config),
            google_photos: ProviderSettings::google_photos(config),
            state_key: config.oauth_state_key.clone(),
        }
    }

    fn settings(&self, provider: OAuthProvider) -> &ProviderSettings {
        match provider {
            OAuthProvider::Linkedin => &self.linkedin,
            OAuthProvider::GooglePhotos => &self.google_photos,
        }
    }

    fn store(&self) -> &Arc<dyn CacheStore> {
        self.cache.store()
    }

    fn state_key(&self, provider: OAuthProvider) -> Vec<u8> {
        self.state_key
            .clone()
            .unwrap_or_else(|| self.settings(provider).client_secret.clone().into_bytes())
    }

    /// Client ID and secret are both set.
    pub fn is_configured(&self, provider: OAuthProvider) -> bool {
        self.settings(provider).is_configured()
    }

    // ─── Authorization Flow ──────────────────────────────────────────────────

    /// Build the provider's authorization URL with a signed `state`.
    pub fn begin_oauth(&self, provider: OAuthProvider) -> Result<String, AppError> {
        let settings = self.settings(provider);
        if !settings.is_configured() {
            return Err(AppError::OAuthNotConfigured(provider.display_name()));
        }

        let state = sign_state(provider, self.cache.now_ms(), &self.state_key(provider))?;
        let scope = settings.scopes.join(" ");

        let mut params: Vec<(&str, &str)> = vec![
            ("response_type", "code"),
            ("client_id", settings.client_id.as_str()),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("scope", scope.as_str()),
        ];
        params.extend_from_slice(settings.extra_params);
        params.push(("state", state.as_str()));

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        tracing::info!(provider = %provider, "Starting OAuth flow");
        Ok(format!("{}?{}", settings.authorize_url, query))
    }

    /// Exchange an authorization code for a token and store it.
    ///
    /// Also drops the cached data that depends on this provider so the next
    /// request resolves with the new token.
    pub async fn complete_oauth(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
    ) -> Result<(), AppError> {
        let settings = self.settings(provider);
        if !settings.is_configured() {
            return Err(AppError::OAuthNotConfigured(provider.display_name()));
        }

        match verify_state(state, &self.state_key(provider), self.cache.now_ms()) {
            Some(p) if p == provider => {}
            _ => {
                tracing::warn!(provider = %provider, "Invalid or tampered OAuth state");
                return Err(AppError::BadRequest("Invalid OAuth state".to_string()));
            }
        }

        let token = self
            .request_token(
                settings,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("client_id", settings.client_id.as_str()),
                    ("client_secret", settings.client_secret.as_str()),
                    ("redirect_uri", settings.redirect_uri.as_str()),
                ],
            )
            .await
            .map_err(|e| {
                tracing::error!(provider = %provider, error = %e, "Token exchange failed");
                AppError::OAuthRejected(format!(
                    "{} token exchange failed: {}",
                    provider.display_name(),
                    e
                ))
            })?;

        self.store_token(provider, token, None).await?;

        if let Err(e) = self.cache.invalidate(provider.dependent_cache_key()).await {
            tracing::warn!(provider = %provider, error = %e, "Failed to clear dependent cache");
        }

        tracing::info!(provider = %provider, "OAuth completed, token stored");
        Ok(())
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Get a usable access token, refreshing it once if it has expired.
    ///
    /// Returns `None` when there is no token, it expired without a refresh
    /// token, or the refresh failed. Never fails.
    pub async fn get_cached_token(&self, provider: OAuthProvider) -> Option<String> {
        let key = keys::oauth_token(provider.as_str());

        let raw = match self.store().get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(provider = %provider, error = %e, "Failed to read OAuth token");
                return None;
            }
        };

        let record: OAuthTokenRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(provider = %provider, error = %e, "Discarding unreadable OAuth token");
                self.discard_token(provider).await;
                return None;
            }
        };

        if !record.is_expired(self.cache.now_ms()) {
            return Some(record.access_token);
        }

        let Some(refresh_token) = record.refresh_token else {
            tracing::info!(provider = %provider, "OAuth token expired without refresh token");
            self.discard_token(provider).await;
            return None;
        };

        tracing::info!(provider = %provider, "OAuth token expired, refreshing");
        match self.refresh_access_token(provider, &refresh_token).await {
            Ok(access_token) => Some(access_token),
            Err(e) => {
                tracing::warn!(provider = %provider, error = %e, "OAuth token refresh failed");
                self.discard_token(provider).await;
                None
            }
        }
    }

    /// Forget the stored token, forcing re-authentication.
    pub async fn clear_oauth_token(&self, provider: OAuthProvider) -> Result<(), SourceError> {
        self.store()
            .delete(&keys::oauth_token(provider.as_str()))
            .await?;
        tracing::info!(provider = %provider, "OAuth token cleared");
        Ok(())
    }

    async fn refresh_access_token(
        &self,
        provider: OAuthProvider,
        refresh_token: &str,
    ) -> Result<String, SourceError> {
        let settings = self.settings(provider);
        let token = self
            .request_token(
                settings,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", settings.client_id.as_str()),
                    ("client_secret", settings.client_secret.as_str()),
                ],
            )
            .await?;

        let access_token = token.access_token.clone();
        if let Err(e) = self
            .store_token(provider, token, Some(refresh_token.to_string()))
            .await
        {
            // The new token is still good for this request.
            tracing::warn!(provider = %provider, error = %e, "Failed to store refreshed token");
        }

        tracing::info!(provider = %provider, "OAuth token refreshed");
        Ok(access_token)
    }

    /// POST a form to the token endpoint.
    async fn request_token(
        &self,
        settings: &ProviderSettings,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, SourceError> {
        let response = self
            .http
            .post(&settings.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await?;

        json_or_error(response).await
    }

    /// Persist a token. A refresh response without a refresh token keeps
    /// the previous one.
    async fn store_token(
        &self,
        provider: OAuthProvider,
        token: TokenResponse,
        previous_refresh_token: Option<String>,
    ) -> Result<(), SourceError> {
        let record = OAuthTokenRecord {
            access_token: token.access_token,
            expires_at_epoch_ms: self
                .cache
                .now_ms()
                .saturating_add(token.expires_in.saturating_mul(1000)),
            refresh_token: token.refresh_token.or(previous_refresh_token),
            scope: token.scope,
            token_type: token.token_type,
        };

        let raw = serde_json::to_string(&record)?;
        self.store()
            .put(&keys::oauth_token(provider.as_str()), raw)
            .await
    }

    async fn discard_token(&self, provider: OAuthProvider) {
        if let Err(e) = self.clear_oauth_token(provider).await {
            tracing::warn!(provider = %provider, error = %e, "Failed to delete OAuth token");
        }
    }
}

// ─── State Parameter ─────────────────────────────────────────────────────────

/// Sign `provider|timestamp_hex` and encode it for the `state` parameter.
fn sign_state(provider: OAuthProvider, now_ms: i64, secret: &[u8]) -> Result<String, AppError> {
    let payload = format!("{}|{:x}", provider.as_str(), now_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
}

/// Verify a `state` parameter and return the provider it was issued for.
fn verify_state(state: &str, secret: &[u8], now_ms: i64) -> Option<OAuthProvider> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "provider|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    let [provider, timestamp_hex, signature_hex] = parts.as_slice() else {
        return None;
    };

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(format!("{}|{}", provider, timestamp_hex).as_bytes());
    mac.verify_slice(&hex::decode(signature_hex).ok()?).ok()?;

    let issued_at = i64::from_str_radix(timestamp_hex, 16).ok()?;
    if now_ms.saturating_sub(issued_at) > STATE_MAX_AGE_MS {
        return None;
    }

    OAuthProvider::from_name(provider)
}
