//! Domain types shared across Wavedrop crates.

mod audio;
mod feed;
mod ids;
mod user;

pub use audio::{AudioItem, NewAudioRecord, SignedUrl};
pub use feed::{FeedFilter, Page};
pub use ids::{AudioId, UserId};
pub use user::User;
