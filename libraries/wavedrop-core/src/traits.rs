/// Service traits consumed by the Wavedrop core
use crate::error::Result;
use crate::subscription::{AuthCallback, AuthSubscription};
use crate::types::{AudioItem, FeedFilter, NewAudioRecord, Page, SignedUrl, User};
use async_trait::async_trait;

/// Identity and session management.
///
/// Session persistence and the OAuth redirect dance live behind this seam;
/// the core only reads the current viewer and reacts to changes.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// The currently signed-in viewer, if any
    async fn current_user(&self) -> Result<Option<User>>;

    /// Subscribe to session changes.
    ///
    /// The callback fires with the new viewer (or `None` after sign-out)
    /// until the returned guard is dropped.
    fn subscribe(&self, callback: AuthCallback) -> AuthSubscription;

    /// Begin a provider sign-in (e.g. "google").
    ///
    /// Returns the authorization URL the host must navigate to; the
    /// session materializes on redirect back.
    async fn sign_in_with_provider(&self, provider: &str) -> Result<String>;

    /// End the current session
    async fn sign_out(&self) -> Result<()>;
}

/// Persistent storage of audio metadata and blobs.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// List audio items matching `filter`, ordered by `created_at`
    /// descending, starting at `offset`, at most `limit` rows.
    async fn list_audios(
        &self,
        filter: &FeedFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Page<AudioItem>>;

    /// Insert a metadata record, returning the stored item
    async fn insert_audio(&self, record: NewAudioRecord) -> Result<AudioItem>;

    /// Upload a binary blob under the given storage path
    async fn upload_blob(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Mint a time-limited playback URL for a stored blob
    async fn sign_url(&self, path: &str, ttl_seconds: u32) -> Result<SignedUrl>;

    /// Fetch the bytes behind a signed URL (download affordance)
    async fn fetch_blob(&self, url: &SignedUrl) -> Result<Vec<u8>>;
}

/// Opaque platform decode primitive used to probe upload duration.
///
/// Decoding itself is out of scope; implementations delegate to whatever
/// audio machinery the host platform provides.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Probe the playable duration of an audio file, in whole seconds
    async fn probe(&self, bytes: &[u8]) -> Result<u32>;
}
