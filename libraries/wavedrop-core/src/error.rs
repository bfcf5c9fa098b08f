/// Core error types for Wavedrop
use thiserror::Error;

/// Result type alias using `WavedropError`
pub type Result<T> = std::result::Result<T, WavedropError>;

/// Unified error taxonomy for the Wavedrop client core.
///
/// Every user-visible failure in the application maps onto one of these
/// variants; `StaleCompletion` is the one internal, never-surfaced case.
#[derive(Error, Debug)]
pub enum WavedropError {
    /// The viewer must be signed in for this operation
    #[error("Sign in to continue")]
    AuthRequired,

    /// A storage or auth request failed in transit or on the server
    #[error("Network error: {0}")]
    Network(String),

    /// Local input rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// The platform decode primitive could not read the file
    #[error("Could not read audio data: {0}")]
    Decode(String),

    /// The playback element refused to play or failed mid-playback
    #[error("Playback error: {0}")]
    Playback(String),

    /// A late async completion no longer matches current state.
    ///
    /// Expected race outcome under the single-threaded completion model:
    /// discarded where it arises, never shown to the user.
    #[error("stale completion discarded")]
    StaleCompletion,
}

impl WavedropError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Whether this failure is swallowed instead of notified.
    ///
    /// Only `StaleCompletion` qualifies; every other variant produces
    /// exactly one transient notification at its handling site.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::StaleCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_completion_is_the_only_silent_failure() {
        assert!(WavedropError::StaleCompletion.is_silent());
        assert!(!WavedropError::AuthRequired.is_silent());
        assert!(!WavedropError::network("offline").is_silent());
        assert!(!WavedropError::validation("bad title").is_silent());
        assert!(!WavedropError::decode("not a wav").is_silent());
        assert!(!WavedropError::playback("refused").is_silent());
    }

    #[test]
    fn validation_message_passes_through_verbatim() {
        let err = WavedropError::validation("Title is required");
        assert_eq!(err.to_string(), "Title is required");
    }
}
