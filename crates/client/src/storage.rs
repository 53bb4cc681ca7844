//! Object storage client for a Supabase-compatible storage REST API.

use async_trait::async_trait;
use runhub_core::api::{ApiError, ApiResult, ObjectStore};
use runhub_core::storage::ObjectInfo;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Maximum entries requested per folder listing.
const LIST_LIMIT: u32 = 1000;

/// Client for the storage service holding event and profile images.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: String,
}

impl StorageClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    fn list_url(&self, bucket: &str) -> String {
        format!("{}/storage/v1/object/list/{}", self.base_url, bucket)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
    }

    async fn check(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}

/// Strips the `bucket/` prefix the storage service puts on returned keys.
fn path_from_key<'a>(bucket: &str, key: &'a str) -> &'a str {
    key.strip_prefix(bucket)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(key)
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<String> {
        tracing::debug!(bucket = %bucket, path = %path, size = bytes.len(), "Uploading object");
        let request = self
            .authorized(self.client.post(self.object_url(bucket, path)))
            .header("x-upsert", "true")
            .header("cache-control", "max-age=3600")
            .header("content-type", content_type)
            .body(bytes);

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from(ClientError::from(e)))?;
        let uploaded: UploadResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::from(ClientError::from(e)))?;

        Ok(path_from_key(bucket, &uploaded.key).to_string())
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        search: Option<&str>,
    ) -> ApiResult<Vec<ObjectInfo>> {
        let body = ListRequest {
            prefix,
            limit: LIST_LIMIT,
            offset: 0,
            search,
        };
        let response = self
            .authorized(self.client.post(self.list_url(bucket)))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::from(ClientError::from(e)))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::from(ClientError::from(e)))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }
}
