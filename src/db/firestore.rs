// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed cache store.
//!
//! Each cache key is one document in the `cache` collection holding the
//! caller-serialized value and the time it was last written.

use super::{collections, CacheStore};
use crate::error::SourceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Document stored for each cache key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheDocument {
    value: String,
    /// Last write (ISO 8601)
    updated_at: String,
}

/// Firestore cache client.
#[derive(Clone)]
pub struct FirestoreCache {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreCache {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, SourceError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| SourceError::Cache(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, SourceError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            SourceError::Cache(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client for testing.
    ///
    /// Every operation fails with a cache error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, SourceError> {
        self.client
            .as_ref()
            .ok_or_else(|| SourceError::Cache("Firestore not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl CacheStore for FirestoreCache {
    async fn get(&self, key: &str) -> Result<Option<String>, SourceError> {
        let doc: Option<CacheDocument> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CACHE)
            .obj()
            .one(key)
            .await
            .map_err(|e| SourceError::Cache(e.to_string()))?;

        Ok(doc.map(|d| d.value))
    }

    async fn put(&self, key: &str, value: String) -> Result<(), SourceError> {
        let doc = CacheDocument {
            value,
            updated_at: crate::time_utils::format_utc_rfc3339(chrono::Utc::now()),
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CACHE)
            .document_id(key)
            .object(&doc)
            .execute()
            .await
            .map_err(|e| SourceError::Cache(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SourceError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::CACHE)
            .document_id(key)
            .execute()
            .await
            .map_err(|e| SourceError::Cache(e.to_string()))?;
        Ok(())
    }
}
