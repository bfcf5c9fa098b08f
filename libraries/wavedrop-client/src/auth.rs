//! Auth endpoint calls.

use crate::error::{ClientError, ClientResult};
use crate::types::{ClientConfig, UserRow};
use reqwest::{Client, StatusCode};
use tracing::debug;
use wavedrop_core::User;

/// Auth surface of the backend.
pub(crate) struct AuthApi<'a> {
    http: &'a Client,
    config: &'a ClientConfig,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(http: &'a Client, config: &'a ClientConfig) -> Self {
        Self { http, config }
    }

    /// Fetch the user a token belongs to.
    pub(crate) async fn fetch_user(&self, access_token: &str) -> ClientResult<User> {
        let url = format!("{}/auth/v1/user", self.config.base_url);
        debug!(url = %url, "fetching session user");

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            let row: UserRow = response.json().await.map_err(|e| {
                ClientError::Parse(format!("Failed to parse user response: {e}"))
            })?;
            Ok(User::from(row))
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

    /// Revoke a token server-side.
    pub(crate) async fn logout(&self, access_token: &str) -> ClientResult<()> {
        let url = format!("{}/auth/v1/logout", self.config.base_url);
        debug!(url = %url, "signing out");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            // An already-dead token is as signed out as it gets.
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
