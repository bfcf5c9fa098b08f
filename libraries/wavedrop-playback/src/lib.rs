//! Wavedrop - Playback Coordination
//!
//! Single-active playback across an arbitrarily large list of audio
//! tiles. This crate provides:
//! - The process-wide `PlaybackCoordinator` (at most one tile plays at a
//!   time; preemption is synchronous)
//! - The per-item `AudioTile` controller: lazy signed-URL resolution with
//!   caching, a transport state machine, and stale-completion discard
//! - Stateless `controls` helpers rendering tile state for the page
//! - The `AudioSink` seam over the platform's media element
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wavedrop_playback::{AudioTile, PlaybackCoordinator};
//!
//! let coordinator = Arc::new(PlaybackCoordinator::new());
//!
//! // One tile per feed item, all sharing the coordinator.
//! let tile = AudioTile::new(item, coordinator.clone(), storage, auth, notifier, sink);
//!
//! tile.resolve_url().await?;   // Idle -> ResolvingUrl -> Ready
//! tile.play()?;                // grants exclusivity, stops any other tile
//! ```

mod coordinator;
pub mod controls;
mod sink;
mod tile;
pub mod types;

// Public exports
pub use coordinator::{PlaybackCoordinator, Stoppable};
pub use controls::{ControlsView, TransportIcon};
pub use sink::AudioSink;
pub use tile::{AudioTile, SIGNED_URL_TTL_SECS};
pub use types::{PlaybackRate, TileSnapshot, TransportState};
