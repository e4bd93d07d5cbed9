//! Remote `recipes` table.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::model::CanonicalRecord;

pub const RECIPES_TABLE: &str = "recipes";

/// Per-request limit on inserts.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("insert rejected ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid credentials header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// Single-row insert. `Ok` carries the rows the store echoed back; an empty
/// vec means the insert was not confirmed.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn insert(&self, record: &CanonicalRecord) -> Result<Vec<serde_json::Value>, StoreError>;
}

/// Supabase table accessed through its PostgREST endpoint.
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
}

impl SupabaseStore {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: &Config, timeout: Duration) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&config.service_role_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.service_role_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("prefer", HeaderValue::from_static("return=representation"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: table_endpoint(&config.supabase_url, RECIPES_TABLE),
        })
    }
}

pub fn table_endpoint(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

#[async_trait]
impl RecipeStore for SupabaseStore {
    async fn insert(&self, record: &CanonicalRecord) -> Result<Vec<serde_json::Value>, StoreError> {
        let response = self.client.post(&self.endpoint).json(record).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }
        let rows: Vec<serde_json::Value> = response.json().await?;
        debug!("Inserted {} row(s) for {}", rows.len(), record.id);
        Ok(rows)
    }
}
