use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::{errors::StorageError, repositories::object_store::ObjectStore, settings::AppConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Object store speaking the Supabase storage REST dialect.
#[derive(Clone)]
pub struct HttpObjectStore {
    client: Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct StorageErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpObjectStore {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.storage_url)?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(HttpObjectStore {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            bucket: config.storage_bucket.clone(),
            api_key: config.storage_api_key.clone(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    fn public_prefix(&self) -> String {
        format!("{}/storage/v1/object/public/{}/", self.base_url, self.bucket)
    }

    async fn failure_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<StorageErrorBody>().await {
            Ok(body) => body
                .message
                .or(body.error)
                .unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let response = self.client
            .post(self.object_url(key))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let message = Self::failure_message(response).await;
        tracing::warn!(key, %status, "Object upload rejected: {}", message);
        Err(StorageError::Upload(message))
    }

    async fn remove(&self, keys: &[String]) -> Result<(), StorageError> {
        if keys.is_empty() {
            return Ok(());
        }

        let response = self.client
            .delete(format!("{}/storage/v1/object/{}", self.base_url, self.bucket))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "prefixes": keys }))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Ok(()),
            _ => Err(StorageError::Remove(Self::failure_message(response).await)),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.public_prefix(), key)
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        let marker = format!("/{}/", self.bucket);
        url.split_once(&marker)
            .map(|(_, key)| key.split(['?', '#']).next().unwrap_or(key))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}
