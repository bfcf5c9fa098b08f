//! Wire types for the Wavedrop backend API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wavedrop_core::{AudioId, AudioItem, NewAudioRecord, UserId};

/// Configuration for connecting to a Wavedrop backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g. "https://abc.supabase.example")
    pub base_url: String,
    /// Anonymous API key sent with every request
    pub anon_key: String,
    /// Storage bucket holding the uploaded audio blobs
    pub bucket: String,
}

impl ClientConfig {
    /// Create a config with the default audio bucket.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            bucket: "audio-files".to_string(),
        }
    }

    /// Override the storage bucket.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

/// A row of the `audios` table as the backend returns it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioRow {
    pub id: String,
    pub title: String,
    /// Storage path of the blob within the audio bucket
    pub filename: String,
    pub size: u64,
    pub duration: Option<u32>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AudioRow> for AudioItem {
    fn from(row: AudioRow) -> Self {
        Self {
            id: AudioId::new(row.id),
            title: row.title,
            owner_id: row.user_id.map(UserId::new),
            storage_path: row.filename,
            size_bytes: row.size,
            duration_seconds: row.duration,
            created_at: row.created_at,
        }
    }
}

/// Insert payload for the `audios` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewAudioRow {
    pub title: String,
    pub filename: String,
    pub size: u64,
    pub duration: u32,
    pub user_id: String,
}

impl From<NewAudioRecord> for NewAudioRow {
    fn from(record: NewAudioRecord) -> Self {
        Self {
            title: record.title,
            filename: record.storage_path,
            size: record.size_bytes,
            duration: record.duration_seconds,
            user_id: record.owner_id.to_string(),
        }
    }
}

/// Response body from the URL signing endpoint.
#[derive(Debug, Deserialize)]
pub struct SignUrlResponse {
    #[serde(rename = "signedURL")]
    pub signed_url: String,
}

/// Request body for the URL signing endpoint.
#[derive(Debug, Serialize)]
pub struct SignUrlRequest {
    #[serde(rename = "expiresIn")]
    pub expires_in: u32,
}

/// The signed-in user as the auth endpoint reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Provider-supplied profile fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
}

impl From<UserRow> for wavedrop_core::User {
    fn from(row: UserRow) -> Self {
        let display_name = row.user_metadata.full_name.or(row.user_metadata.name);
        Self {
            id: UserId::new(row.id),
            display_name,
            email: row.email,
        }
    }
}
