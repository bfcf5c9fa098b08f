//! Service trait implementations over the HTTP client.
//!
//! `WavedropClient` is handed to the pager and the tiles as
//! `Arc<dyn StorageService>` / `Arc<dyn AuthService>`; transport errors
//! collapse into the core taxonomy at this boundary.

use crate::client::WavedropClient;
use async_trait::async_trait;
use wavedrop_core::{
    AudioItem, AuthCallback, AuthService, AuthSubscription, FeedFilter, NewAudioRecord, Page,
    Result, SignedUrl, StorageService, User,
};

#[async_trait]
impl StorageService for WavedropClient {
    async fn list_audios(
        &self,
        filter: &FeedFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Page<AudioItem>> {
        let bearer = self.bearer();
        let page = self
            .rest_api()
            .list(filter, offset, limit, bearer.as_deref())
            .await?;
        Ok(page)
    }

    async fn insert_audio(&self, record: NewAudioRecord) -> Result<AudioItem> {
        let bearer = self.bearer();
        let item = self.rest_api().insert(record, bearer.as_deref()).await?;
        Ok(item)
    }

    async fn upload_blob(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let bearer = self.bearer();
        self.object_api()
            .upload(path, bytes, bearer.as_deref())
            .await?;
        Ok(())
    }

    async fn sign_url(&self, path: &str, ttl_seconds: u32) -> Result<SignedUrl> {
        let bearer = self.bearer();
        let url = self
            .object_api()
            .sign(path, ttl_seconds, bearer.as_deref())
            .await?;
        Ok(url)
    }

    async fn fetch_blob(&self, url: &SignedUrl) -> Result<Vec<u8>> {
        let bytes = self.object_api().download(url).await?;
        Ok(bytes)
    }
}

#[async_trait]
impl AuthService for WavedropClient {
    async fn current_user(&self) -> Result<Option<User>> {
        // The session is established via `set_session`; reading it never
        // touches the network.
        Ok(self.session_user())
    }

    fn subscribe(&self, callback: AuthCallback) -> AuthSubscription {
        self.subscribers.subscribe(callback)
    }

    async fn sign_in_with_provider(&self, provider: &str) -> Result<String> {
        Ok(self.authorize_url(provider))
    }

    async fn sign_out(&self) -> Result<()> {
        self.clear_session().await?;
        Ok(())
    }
}
