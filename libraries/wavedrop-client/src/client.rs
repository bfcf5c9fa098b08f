//! Main Wavedrop backend client.

use crate::auth::AuthApi;
use crate::error::{ClientError, ClientResult};
use crate::rest::RestApi;
use crate::storage::ObjectApi;
use crate::types::ClientConfig;
use reqwest::Client;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;
use wavedrop_core::{SubscriberRegistry, User};

/// One authenticated session.
#[derive(Debug, Clone)]
struct Session {
    access_token: String,
    user: User,
}

/// Client for the Wavedrop backend (Supabase-style REST + object storage
/// + auth).
///
/// The client holds the session token, notifies auth-change subscribers,
/// and provides the typed sub-surfaces used by the service trait
/// implementations in [`crate::service`].
///
/// # Example
///
/// ```ignore
/// use wavedrop_client::{ClientConfig, WavedropClient};
///
/// let client = WavedropClient::new(ClientConfig::new(
///     "https://abc.supabase.example",
///     "anon-key",
/// ))?;
///
/// // After the OAuth redirect lands back with a token:
/// let user = client.set_session("access-token").await?;
/// println!("signed in as {}", user.id);
/// ```
pub struct WavedropClient {
    http: Client,
    config: ClientConfig,
    session: RwLock<Option<Session>>,
    pub(crate) subscribers: Arc<SubscriberRegistry>,
}

impl WavedropClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let normalized = ClientConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Wavedrop/{} (Web)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: normalized,
            session: RwLock::new(None),
            subscribers: SubscriberRegistry::new(),
        })
    }

    /// The normalized backend base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Whether a session is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.session.read().expect("session lock poisoned").is_some()
    }

    /// The signed-in user, if any (no network).
    pub fn session_user(&self) -> Option<User> {
        self.session
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.user.clone())
    }

    /// Install a session from an access token (e.g. after the OAuth
    /// redirect lands back). Fetches the user, stores the session, and
    /// notifies auth-change subscribers.
    pub async fn set_session(&self, access_token: impl Into<String>) -> ClientResult<User> {
        let access_token = access_token.into();
        let user = self.auth_api().fetch_user(&access_token).await?;

        *self.session.write().expect("session lock poisoned") = Some(Session {
            access_token,
            user: user.clone(),
        });

        info!(user = %user.id, "session established");
        self.subscribers.emit(Some(&user));
        Ok(user)
    }

    /// End the session. The server-side revocation is best-effort; the
    /// local session is always cleared and subscribers always notified.
    pub async fn clear_session(&self) -> ClientResult<()> {
        let token = self.bearer();
        if let Some(token) = token {
            if let Err(err) = self.auth_api().logout(&token).await {
                debug!(error = %err, "server-side logout failed");
            }
        }

        *self.session.write().expect("session lock poisoned") = None;
        info!("session cleared");
        self.subscribers.emit(None);
        Ok(())
    }

    /// The authorization URL for a provider sign-in; the host navigates
    /// to it and the session materializes on redirect back.
    pub fn authorize_url(&self, provider: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={provider}",
            self.config.base_url
        )
    }

    pub(crate) fn bearer(&self) -> Option<String> {
        self.session
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub(crate) fn rest_api(&self) -> RestApi<'_> {
        RestApi::new(&self.http, &self.config)
    }

    pub(crate) fn object_api(&self) -> ObjectApi<'_> {
        ObjectApi::new(&self.http, &self.config)
    }

    pub(crate) fn auth_api(&self) -> AuthApi<'_> {
        AuthApi::new(&self.http, &self.config)
    }
}

impl std::fmt::Debug for WavedropClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavedropClient")
            .field("base_url", &self.config.base_url)
            .field("bucket", &self.config.bucket)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_urls_are_accepted() {
        assert!(WavedropClient::new(ClientConfig::new("https://example.com", "k")).is_ok());
        assert!(WavedropClient::new(ClientConfig::new("http://localhost:54321", "k")).is_ok());
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(matches!(
            WavedropClient::new(ClientConfig::new("", "k")),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            WavedropClient::new(ClientConfig::new("not-a-url", "k")),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            WavedropClient::new(ClientConfig::new("ftp://example.com", "k")),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn base_url_is_normalized() {
        let client =
            WavedropClient::new(ClientConfig::new("https://example.com///", "k")).unwrap();
        assert_eq!(client.base_url(), "https://example.com");
    }

    #[test]
    fn authorize_url_names_the_provider() {
        let client = WavedropClient::new(ClientConfig::new("https://example.com", "k")).unwrap();
        assert_eq!(
            client.authorize_url("google"),
            "https://example.com/auth/v1/authorize?provider=google"
        );
    }
}
