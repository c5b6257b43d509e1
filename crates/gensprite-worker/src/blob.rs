//! Vercel Blob storage over HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::collaborators::{BlobStore, BlobStoreProvider, CollaboratorError};

/// Public Vercel Blob API endpoint.
pub const DEFAULT_BLOB_API_URL: &str = "https://blob.vercel-storage.com";

const BLOB_API_VERSION: &str = "7";
const SERVICE: &str = "blob storage";

#[derive(Debug, Deserialize)]
struct PutBlobResponse {
    url: String,
}

/// Turns a non-success response into a [`CollaboratorError::Status`].
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, CollaboratorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(CollaboratorError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

/// A blob store bound to one read-write token.
#[derive(Debug, Clone)]
pub struct VercelBlobStore {
    client: reqwest::Client,
    api_url: String,
    token: String,
    upload_timeout: Duration,
    download_timeout: Duration,
}

#[async_trait]
impl BlobStore for VercelBlobStore {
    async fn put(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<String, CollaboratorError> {
        let url = format!("{}/{}", self.api_url.trim_end_matches('/'), path);
        log::debug!("blob: PUT {} ({} bytes)", url, bytes.len());

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, content_type)
            .header("x-api-version", BLOB_API_VERSION)
            .header("x-content-type", content_type)
            .timeout(self.upload_timeout)
            .body(bytes)
            .send()
            .await?;

        let body: PutBlobResponse = check_status(SERVICE, response).await?.json().await?;
        Ok(body.url)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, CollaboratorError> {
        log::debug!("blob: GET {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .await?;
        let bytes = check_status(SERVICE, response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Hands out [`VercelBlobStore`]s sharing one connection pool.
#[derive(Debug, Clone)]
pub struct VercelBlobProvider {
    client: reqwest::Client,
    api_url: String,
    upload_timeout: Duration,
    download_timeout: Duration,
}

impl VercelBlobProvider {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        upload_timeout: Duration,
        download_timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            upload_timeout,
            download_timeout,
        }
    }
}

impl BlobStoreProvider for VercelBlobProvider {
    fn store_for(&self, token: &str) -> Arc<dyn BlobStore> {
        Arc::new(VercelBlobStore {
            client: self.client.clone(),
            api_url: self.api_url.clone(),
            token: token.to_string(),
            upload_timeout: self.upload_timeout,
            download_timeout: self.download_timeout,
        })
    }
}
