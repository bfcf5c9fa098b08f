//! Object storage operations: blob upload, signed URLs, download.

use crate::error::{ClientError, ClientResult};
use crate::types::{ClientConfig, SignUrlRequest, SignUrlResponse};
use reqwest::{Client, StatusCode};
use tracing::debug;
use wavedrop_core::SignedUrl;

/// Storage surface over the audio bucket.
pub(crate) struct ObjectApi<'a> {
    http: &'a Client,
    config: &'a ClientConfig,
}

impl<'a> ObjectApi<'a> {
    pub(crate) fn new(http: &'a Client, config: &'a ClientConfig) -> Self {
        Self { http, config }
    }

    /// Upload a blob under `path` within the audio bucket.
    pub(crate) async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        bearer: Option<&str>,
    ) -> ClientResult<()> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, self.config.bucket, path
        );

        let mut request = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .header("Content-Type", "audio/wav")
            .body(bytes.to_vec());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        debug!(url = %url, size = bytes.len(), "uploading blob");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::AuthRequired)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Mint a signed playback URL for a stored blob.
    pub(crate) async fn sign(
        &self,
        path: &str,
        ttl_seconds: u32,
        bearer: Option<&str>,
    ) -> ClientResult<SignedUrl> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.config.base_url, self.config.bucket, path
        );

        let mut request = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&SignUrlRequest {
                expires_in: ttl_seconds,
            });
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        debug!(url = %url, ttl_seconds, "minting signed url");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body: SignUrlResponse = response.json().await.map_err(|e| {
                ClientError::Parse(format!("Failed to parse signed url response: {e}"))
            })?;
            // The backend returns a path relative to the storage root.
            let absolute = if body.signed_url.starts_with('/') {
                format!("{}/storage/v1{}", self.config.base_url, body.signed_url)
            } else {
                body.signed_url
            };
            Ok(SignedUrl::new(absolute))
        } else if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::AuthRequired)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Fetch the bytes behind a signed URL.
    pub(crate) async fn download(&self, url: &SignedUrl) -> ClientResult<Vec<u8>> {
        debug!(url = %url, "downloading blob");
        let response = self.http.get(url.as_str()).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
