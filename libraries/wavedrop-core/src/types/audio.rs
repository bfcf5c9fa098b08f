//! Audio item types as delivered by the storage service.

use super::ids::{AudioId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One uploaded audio file, as listed in the feed.
///
/// Owned by the feed pager once fetched. `storage_path` is an opaque
/// locator used to mint playback URLs; it is never displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioItem {
    /// Unique identifier, stable across pages
    pub id: AudioId,

    /// Display title (non-empty, at most 100 characters, enforced at upload)
    pub title: String,

    /// Uploading user, present when the feed is user-scoped
    pub owner_id: Option<UserId>,

    /// Opaque storage locator used to mint playback URLs
    pub storage_path: String,

    /// File size in bytes
    pub size_bytes: u64,

    /// Probed duration in whole seconds; unknown before upload-time probing
    pub duration_seconds: Option<u32>,

    /// Upload timestamp; the feed ordering key (descending)
    pub created_at: DateTime<Utc>,
}

/// Metadata record inserted after a successful blob upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAudioRecord {
    /// Display title, already validated
    pub title: String,

    /// Owner of the uploaded blob
    pub owner_id: UserId,

    /// Storage locator the blob was uploaded under
    pub storage_path: String,

    /// File size in bytes
    pub size_bytes: u64,

    /// Probed duration in whole seconds
    pub duration_seconds: u32,
}

/// A time-limited, authorization-embedded locator for a private blob.
///
/// Expiry is server-defined; the client never proactively refreshes a
/// signed URL. An expired URL surfaces as a playback failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedUrl(String);

impl SignedUrl {
    /// Wrap an already-minted signed URL
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Get the URL string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_item_round_trips_through_serde() {
        let item = AudioItem {
            id: AudioId::new("a1"),
            title: "Morning field recording".to_string(),
            owner_id: Some(UserId::new("u1")),
            storage_path: "u1/7f3a.wav".to_string(),
            size_bytes: 12 * 1024 * 1024,
            duration_seconds: Some(94),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&item).unwrap();
        let back: AudioItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn unknown_duration_is_representable() {
        let json = r#"{
            "id": "a2",
            "title": "Untitled",
            "owner_id": null,
            "storage_path": "u9/x.wav",
            "size_bytes": 11534336,
            "duration_seconds": null,
            "created_at": "2025-11-02T09:30:00Z"
        }"#;

        let item: AudioItem = serde_json::from_str(json).unwrap();
        assert!(item.duration_seconds.is_none());
        assert!(item.owner_id.is_none());
    }
}
