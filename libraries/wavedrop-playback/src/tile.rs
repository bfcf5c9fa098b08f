//! Per-item audio tile controller.
//!
//! One tile wraps one playable audio item: a lazily-resolved, cached
//! playback URL, a local transport state machine, and the handshake with
//! the process-wide coordinator that keeps playback exclusive.

use crate::coordinator::{PlaybackCoordinator, Stoppable};
use crate::sink::AudioSink;
use crate::types::{PlaybackRate, TileSnapshot, TransportState};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, warn};
use wavedrop_core::{
    AudioItem, AuthService, Notifier, Result, SignedUrl, StorageService, WavedropError,
};

/// TTL requested when minting playback URLs, in seconds
pub const SIGNED_URL_TTL_SECS: u32 = 3600;

struct TileInner {
    transport: TransportState,
    url: Option<SignedUrl>,
    sink: Box<dyn AudioSink>,
    position_seconds: f64,
    total_seconds: Option<f64>,
    rate: PlaybackRate,
    volume: f64,
    error: Option<String>,
    /// Bumped on reset; a resolution completion whose epoch no longer
    /// matches is discarded.
    resolve_epoch: u64,
}

/// Controller for one audio tile.
///
/// Constructed as `Arc` so the coordinator can hold a weak stop
/// capability. The host delivers media events (`on_time_update`,
/// `on_duration_change`, `on_ended`, `on_media_error`) from the platform
/// element it wires to the sink.
pub struct AudioTile {
    item: AudioItem,
    coordinator: Arc<PlaybackCoordinator>,
    storage: Arc<dyn StorageService>,
    auth: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<TileInner>,
}

impl AudioTile {
    /// Create a tile for `item`, owning `sink`
    pub fn new(
        item: AudioItem,
        coordinator: Arc<PlaybackCoordinator>,
        storage: Arc<dyn StorageService>,
        auth: Arc<dyn AuthService>,
        notifier: Arc<dyn Notifier>,
        sink: Box<dyn AudioSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            item,
            coordinator,
            storage,
            auth,
            notifier,
            inner: Mutex::new(TileInner {
                transport: TransportState::Idle,
                url: None,
                sink,
                position_seconds: 0.0,
                total_seconds: None,
                rate: PlaybackRate::default(),
                volume: 1.0,
                error: None,
                resolve_epoch: 0,
            }),
        })
    }

    /// The item this tile plays
    pub fn item(&self) -> &AudioItem {
        &self.item
    }

    /// Point-in-time view for the controls layer
    pub fn snapshot(&self) -> TileSnapshot {
        let inner = self.lock();
        TileSnapshot {
            transport: inner.transport,
            position_seconds: inner.position_seconds,
            total_seconds: inner.total_seconds,
            rate: inner.rate,
            volume: inner.volume,
            error: inner.error.clone(),
        }
    }

    /// Resolve and cache the playback URL (Idle → ResolvingUrl → Ready).
    ///
    /// A trigger while resolution is already in flight, or once a URL is
    /// cached, is a no-op. Failure (including an unauthenticated viewer)
    /// lands in `Error` with a user-visible message; retrying is another
    /// explicit call, which restarts from Idle semantics.
    pub async fn resolve_url(&self) -> Result<()> {
        let epoch = {
            let mut inner = self.lock();
            match inner.transport {
                TransportState::Idle | TransportState::Error => {}
                // One outstanding resolution per tile; later states
                // already have their URL.
                _ => return Ok(()),
            }
            inner.transport = TransportState::ResolvingUrl;
            inner.error = None;
            inner.resolve_epoch += 1;
            inner.resolve_epoch
        };

        debug!(item = %self.item.id, "resolving playback url");

        let outcome = match self.auth.current_user().await {
            Ok(Some(_)) => {
                self.storage
                    .sign_url(&self.item.storage_path, SIGNED_URL_TTL_SECS)
                    .await
            }
            Ok(None) => Err(WavedropError::AuthRequired),
            Err(err) => Err(err),
        };

        self.finish_resolution(epoch, outcome)
    }

    /// Apply a resolution outcome, discarding it if the tile was reset
    /// while the request was in flight.
    fn finish_resolution(&self, epoch: u64, outcome: Result<SignedUrl>) -> Result<()> {
        let mut inner = self.lock();
        if inner.resolve_epoch != epoch || inner.transport != TransportState::ResolvingUrl {
            debug!(item = %self.item.id, "discarding stale url resolution");
            return Err(WavedropError::StaleCompletion);
        }

        match outcome {
            Ok(url) => {
                inner.sink.load(url.as_str());
                inner.url = Some(url);
                inner.position_seconds = 0.0;
                inner.transport = TransportState::Ready;
                debug!(item = %self.item.id, "playback url ready");
                Ok(())
            }
            Err(err) => {
                inner.transport = TransportState::Error;
                inner.error = Some(match &err {
                    WavedropError::AuthRequired => "Sign in to play audio.".to_string(),
                    _ => "Could not load the audio URL.".to_string(),
                });
                warn!(item = %self.item.id, error = %err, "url resolution failed");
                Err(err)
            }
        }
    }

    /// Start playback (Ready/Paused/Ended → Playing).
    ///
    /// Asks the coordinator for the exclusive grant before touching the
    /// sink; any other playing tile is stopped synchronously inside that
    /// call. A sink that refuses to start reverts the tile to Paused and
    /// gives the grant back.
    pub fn play(self: &Arc<Self>) -> Result<()> {
        {
            let inner = self.lock();
            match inner.transport {
                TransportState::Ready | TransportState::Paused | TransportState::Ended => {}
                TransportState::Playing => return Ok(()),
                _ => {
                    return Err(WavedropError::playback(
                        "no playable source is bound to this tile",
                    ))
                }
            }
        }

        self.coordinator
            .request_play(&self.item.id, Arc::downgrade(self) as Weak<dyn Stoppable>);

        let started = {
            let mut inner = self.lock();
            if inner.transport == TransportState::Ended {
                inner.sink.seek(0.0);
                inner.position_seconds = 0.0;
            }
            match inner.sink.play() {
                Ok(()) => {
                    inner.transport = TransportState::Playing;
                    Ok(())
                }
                Err(err) => {
                    inner.transport = TransportState::Paused;
                    Err(err)
                }
            }
        };

        match started {
            Ok(()) => {
                self.notifier
                    .info(&format!("Now playing \"{}\"", self.item.title));
                Ok(())
            }
            Err(err) => {
                self.coordinator.release(&self.item.id);
                self.notifier.error("Could not play this audio file.");
                warn!(item = %self.item.id, error = %err, "sink refused to play");
                Err(WavedropError::playback(err.to_string()))
            }
        }
    }

    /// Self-initiated pause (Playing → Paused); releases the grant
    pub fn pause(&self) {
        let was_playing = {
            let mut inner = self.lock();
            if inner.transport == TransportState::Playing {
                inner.sink.pause();
                inner.transport = TransportState::Paused;
                true
            } else {
                false
            }
        };

        if was_playing {
            self.coordinator.release(&self.item.id);
            debug!(item = %self.item.id, "paused");
        }
    }

    /// Play/pause affordance: pause when playing, otherwise play
    pub fn toggle(self: &Arc<Self>) -> Result<()> {
        let playing = self.lock().transport == TransportState::Playing;
        if playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Move the playhead; permitted in Ready/Playing/Paused only.
    ///
    /// The target is clamped to `[0, total_seconds]`. No state change.
    pub fn seek(&self, position_seconds: f64) -> Result<()> {
        let mut inner = self.lock();
        if !inner.transport.is_seekable() {
            return Err(WavedropError::playback("seeking requires a bound source"));
        }
        let clamped = crate::controls::clamp_seek(position_seconds, inner.total_seconds);
        inner.sink.seek(clamped);
        inner.position_seconds = clamped;
        Ok(())
    }

    /// Change the playback rate; permitted in any non-Idle, non-Error
    /// state, effective immediately, no state change.
    pub fn set_rate(&self, rate: PlaybackRate) -> Result<()> {
        let mut inner = self.lock();
        if !inner.transport.accepts_rate_changes() {
            return Err(WavedropError::playback(
                "rate changes require an active session",
            ));
        }
        inner.rate = rate;
        inner.sink.set_rate(rate.factor());
        Ok(())
    }

    /// Set linear volume, clamped to `[0.0, 1.0]`, in any state
    pub fn set_volume(&self, volume: f64) {
        let mut inner = self.lock();
        let clamped = volume.clamp(0.0, 1.0);
        inner.volume = clamped;
        inner.sink.set_volume(clamped);
    }

    /// Host callback: the playhead moved
    pub fn on_time_update(&self, position_seconds: f64) {
        let mut inner = self.lock();
        inner.position_seconds = position_seconds.max(0.0);
    }

    /// Host callback: the media duration became known or changed
    pub fn on_duration_change(&self, total_seconds: f64) {
        let mut inner = self.lock();
        inner.total_seconds = Some(total_seconds.max(0.0));
    }

    /// Host callback: natural end of media (Playing → Ended).
    ///
    /// Equivalent to a self-initiated pause plus release.
    pub fn on_ended(&self) {
        let finished = {
            let mut inner = self.lock();
            if inner.transport == TransportState::Playing {
                if let Some(total) = inner.total_seconds {
                    inner.position_seconds = total;
                }
                inner.transport = TransportState::Ended;
                true
            } else {
                false
            }
        };

        if finished {
            self.coordinator.release(&self.item.id);
            self.notifier
                .info(&format!("Finished playing \"{}\"", self.item.title));
        }
    }

    /// Host callback: the media element failed mid-session (decode error,
    /// expired signed URL). Clears the cached URL so the next attempt
    /// re-resolves; retry is user-initiated.
    pub fn on_media_error(&self, message: &str) {
        let was_playing = {
            let mut inner = self.lock();
            let was_playing = inner.transport == TransportState::Playing;
            if was_playing {
                inner.sink.pause();
            }
            inner.transport = TransportState::Error;
            inner.error = Some(message.to_string());
            inner.url = None;
            was_playing
        };

        if was_playing {
            self.coordinator.release(&self.item.id);
        }
        self.notifier.error(message);
        warn!(item = %self.item.id, message, "media error");
    }

    /// Unmount-equivalent: discard the playback session and return to
    /// Idle. Any in-flight URL resolution is orphaned; its completion
    /// will be discarded.
    pub fn reset(&self) {
        let was_playing = {
            let mut inner = self.lock();
            let was_playing = inner.transport == TransportState::Playing;
            if was_playing {
                inner.sink.pause();
            }
            inner.resolve_epoch += 1;
            inner.transport = TransportState::Idle;
            inner.url = None;
            inner.position_seconds = 0.0;
            inner.total_seconds = None;
            inner.error = None;
            was_playing
        };

        if was_playing {
            self.coordinator.release(&self.item.id);
        }
        debug!(item = %self.item.id, "tile reset");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TileInner> {
        self.inner.lock().expect("tile state poisoned")
    }
}

impl Stoppable for AudioTile {
    /// Coordinator-initiated stop: pause without re-entering the
    /// coordinator, which has already moved the grant to the new owner.
    fn stop(&self) {
        let mut inner = self.lock();
        if inner.transport == TransportState::Playing {
            inner.sink.pause();
            inner.transport = TransportState::Paused;
            debug!(item = %self.item.id, "stopped by coordinator");
        }
    }
}

impl Drop for AudioTile {
    fn drop(&mut self) {
        // Guarded release: only clears the grant if this tile still holds
        // it, so a tile disposed after losing the grant changes nothing.
        self.coordinator.release(&self.item.id);
    }
}

impl std::fmt::Debug for AudioTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioTile").field("item", &self.item.id).finish()
    }
}
