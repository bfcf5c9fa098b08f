//! Wavedrop Core
//!
//! Shared types, error taxonomy, and service traits for Wavedrop, the
//! audio-sharing client core.
//!
//! This crate defines:
//! - **Domain Types**: `AudioItem`, `User`, `FeedFilter`, `Page`, ids
//! - **Service Traits**: `AuthService`, `StorageService`, `DurationProbe`
//! - **Error Handling**: unified `WavedropError` and `Result` types
//! - **UI Seams**: the `Notifier` toast abstraction and RAII
//!   auth-change subscriptions
//!
//! Everything here is collaborator-facing contract; the coordination logic
//! lives in `wavedrop-playback` and `wavedrop-feed`, and the HTTP
//! implementation of the service traits in `wavedrop-client`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod notify;
pub mod subscription;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, WavedropError};
pub use notify::{Notifier, NoticeLevel, NullNotifier, Progress};
pub use subscription::{AuthCallback, AuthSubscription, SubscriberRegistry};
pub use traits::{AuthService, DurationProbe, StorageService};
pub use types::{AudioId, AudioItem, FeedFilter, NewAudioRecord, Page, SignedUrl, User, UserId};
