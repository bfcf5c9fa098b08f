//! The four-step upload flow.
//!
//! Validate locally, probe the duration, upload the blob, insert the
//! metadata record. Steps run strictly in that order and abort on the
//! first failure, each with its own user-visible message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use wavedrop_core::{
    AudioItem, AuthService, DurationProbe, NewAudioRecord, Notifier, Result, StorageService, User,
    WavedropError,
};

/// Smallest accepted upload, inclusive (10 MiB)
pub const MIN_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Largest accepted upload, inclusive (30 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 30 * 1024 * 1024;

/// Longest accepted title, in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// A file the user picked, plus its form fields.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Title entered by the user (validated here)
    pub title: String,

    /// Original file name, used only for extension validation
    pub file_name: String,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

/// Validate and normalize a title: non-empty after trimming, at most
/// [`MAX_TITLE_CHARS`] characters.
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(WavedropError::validation("Title is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(WavedropError::validation(format!(
            "Title must be {MAX_TITLE_CHARS} characters or fewer"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate the picked file: `.wav` extension (case-insensitive) and a
/// size within the inclusive [`MIN_UPLOAD_BYTES`]..[`MAX_UPLOAD_BYTES`]
/// bounds.
pub fn validate_audio_file(file_name: &str, size_bytes: u64) -> Result<()> {
    if !file_name.to_lowercase().ends_with(".wav") {
        return Err(WavedropError::validation(
            "Only WAV files can be uploaded",
        ));
    }

    let size_mib = size_bytes as f64 / (1024.0 * 1024.0);
    if size_bytes < MIN_UPLOAD_BYTES {
        return Err(WavedropError::validation(format!(
            "File is too small (minimum 10 MB, got {size_mib:.1} MB)"
        )));
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(WavedropError::validation(format!(
            "File is too large (maximum 30 MB, got {size_mib:.1} MB)"
        )));
    }
    Ok(())
}

/// Orchestrates one upload at a time against the storage service.
pub struct Uploader {
    storage: Arc<dyn StorageService>,
    auth: Arc<dyn AuthService>,
    probe: Arc<dyn DurationProbe>,
    notifier: Arc<dyn Notifier>,
    busy: AtomicBool,
}

impl Uploader {
    /// Create an uploader over the given services
    pub fn new(
        storage: Arc<dyn StorageService>,
        auth: Arc<dyn AuthService>,
        probe: Arc<dyn DurationProbe>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            auth,
            probe,
            notifier,
            busy: AtomicBool::new(false),
        }
    }

    /// Run the full upload flow.
    ///
    /// Exactly one notification results: an inline error for a rejected
    /// form, or a progress notification opened at submit and resolved
    /// once with the outcome. A submit while another upload is in flight
    /// is rejected without side effects.
    pub async fn upload(&self, request: UploadRequest) -> Result<AudioItem> {
        if self.busy.swap(true, Ordering::SeqCst) {
            let err = WavedropError::validation("An upload is already in progress");
            self.notifier.error(&err.to_string());
            return Err(err);
        }

        let result = self.perform(request).await;
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    async fn perform(&self, request: UploadRequest) -> Result<AudioItem> {
        // Step 1: local validation, before any network call.
        let title = match validate_title(&request.title) {
            Ok(title) => title,
            Err(err) => {
                self.notifier.error(&err.to_string());
                return Err(err);
            }
        };
        if let Err(err) = validate_audio_file(&request.file_name, request.bytes.len() as u64) {
            self.notifier.error(&err.to_string());
            return Err(err);
        }

        let user = match self.auth.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.notifier.error("Sign in to upload audio.");
                return Err(WavedropError::AuthRequired);
            }
            Err(err) => {
                self.notifier.error("Could not verify your session.");
                return Err(err);
            }
        };

        let progress = self.notifier.begin_progress("Uploading...");
        match self.transfer(&user, title, request).await {
            Ok(item) => {
                progress.succeed(&format!("\"{}\" uploaded successfully", item.title));
                info!(item = %item.id, owner = %user.id, "upload complete");
                Ok(item)
            }
            Err((message, err)) => {
                progress.fail(&message);
                warn!(owner = %user.id, error = %err, "upload failed");
                Err(err)
            }
        }
    }

    /// Steps 2-4; the error carries the failing step's message.
    async fn transfer(
        &self,
        user: &User,
        title: String,
        request: UploadRequest,
    ) -> std::result::Result<AudioItem, (String, WavedropError)> {
        // Step 2: probe the duration via the platform decode primitive.
        let duration_seconds = self.probe.probe(&request.bytes).await.map_err(|err| {
            (
                "Could not read the audio duration from this file.".to_string(),
                err,
            )
        })?;

        // Step 3: blob upload, owner-namespaced under a fresh name.
        let storage_path = format!("{}/{}.wav", user.id, Uuid::new_v4());
        self.storage
            .upload_blob(&storage_path, &request.bytes)
            .await
            .map_err(|err| ("Failed to upload the audio file.".to_string(), err))?;

        // Step 4: metadata record referencing the blob.
        let record = NewAudioRecord {
            title,
            owner_id: user.id.clone(),
            storage_path,
            size_bytes: request.bytes.len() as u64,
            duration_seconds,
        };
        let item = self
            .storage
            .insert_audio(record)
            .await
            .map_err(|err| ("Failed to save the audio details.".to_string(), err))?;

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mib(value: f64) -> u64 {
        (value * 1024.0 * 1024.0) as u64
    }

    #[test]
    fn only_wav_files_pass_validation() {
        assert!(validate_audio_file("take.wav", mib(12.0)).is_ok());
        assert!(validate_audio_file("TAKE.WAV", mib(12.0)).is_ok());
        assert!(validate_audio_file("take.mp3", mib(12.0)).is_err());
        assert!(validate_audio_file("take", mib(12.0)).is_err());
    }

    #[test]
    fn size_bounds_are_inclusive() {
        assert!(validate_audio_file("a.wav", mib(9.9)).is_err());
        assert!(validate_audio_file("a.wav", MIN_UPLOAD_BYTES).is_ok());
        assert!(validate_audio_file("a.wav", MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_audio_file("a.wav", MAX_UPLOAD_BYTES + 1).is_err());
    }

    #[test]
    fn size_rejection_messages_name_the_offending_size() {
        let err = validate_audio_file("a.wav", mib(9.9)).unwrap_err();
        assert!(err.to_string().contains("9.9 MB"), "{err}");
        let err = validate_audio_file("a.wav", mib(31.5)).unwrap_err();
        assert!(err.to_string().contains("31.5 MB"), "{err}");
    }

    #[test]
    fn title_bounds_are_inclusive() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert_eq!(validate_title("  Take 1  ").unwrap(), "Take 1");

        let hundred = "x".repeat(100);
        assert_eq!(validate_title(&hundred).unwrap(), hundred);
        assert!(validate_title(&"x".repeat(101)).is_err());
    }
}
