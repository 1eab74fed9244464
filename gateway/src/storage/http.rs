//! HTTPオブジェクトストア
//!
//! `PUT {base}/{bucket}/{key}` / `DELETE {base}/{bucket}/{key}` を話す
//! S3互換ゲートウェイ等に転送する。

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use tracing::debug;

use super::ObjectStore;
use crate::common::error::{StoreError, StoreResult};

/// Object store reached over plain HTTP PUT/DELETE
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpObjectStore {
    /// Creates a store with its own HTTP client
    pub fn new(base_url: &str) -> StoreResult<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a store sharing an existing HTTP client (connection pooling)
    pub fn with_client(client: reqwest::Client, base_url: &str) -> StoreResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Http(format!("invalid store url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Http(format!(
                "store url cannot be a base: {base_url}"
            )));
        }
        Ok(Self { client, base_url })
    }

    /// URL of `bucket`/`key`; each key segment is percent-encoded separately
    pub fn object_url(&self, bucket: &str, key: &str) -> StoreResult<Url> {
        if bucket.is_empty() || bucket.contains('/') {
            return Err(StoreError::InvalidKey(format!("bucket {bucket:?}")));
        }
        if key.is_empty() || key.split('/').any(|s| s == "." || s == "..") {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidKey(key.to_string()))?
            .pop_if_empty()
            .push(bucket)
            .extend(key.split('/'));
        Ok(url)
    }
}

async fn rejected(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    StoreError::Rejected { status, message }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> StoreResult<()> {
        let url = self.object_url(bucket, key)?;
        debug!(%url, bytes = body.len(), "PUT object");

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, cache_control)
            .body(body)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejected(response).await)
        }
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let url = self.object_url(bucket, key)?;
        debug!(%url, "DELETE object");

        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(rejected(response).await)
        }
    }
}
