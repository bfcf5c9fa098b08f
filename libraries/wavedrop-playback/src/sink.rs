//! Platform playback element seam.

use wavedrop_core::Result;

/// One underlying audio element, owned by exactly one tile.
///
/// This is the narrow surface of the host platform's media element. The
/// sink reports position and duration on demand; asynchronous media events
/// (time updates, natural end, media errors) are delivered back to the
/// tile by the host through the tile's `on_*` methods.
pub trait AudioSink: Send {
    /// Bind a resolved source URL. Resets the position to zero; does not
    /// start playback.
    fn load(&mut self, url: &str);

    /// Start or resume playback.
    ///
    /// # Errors
    /// Returns an error if the element refuses to play (unsupported
    /// format, expired URL, autoplay restriction).
    fn play(&mut self) -> Result<()>;

    /// Pause playback. Safe to call when already paused.
    fn pause(&mut self);

    /// Move the playhead, in seconds from the start
    fn seek(&mut self, position_seconds: f64);

    /// Set the playback speed multiplier
    fn set_rate(&mut self, rate: f64);

    /// Set linear volume in `[0.0, 1.0]`
    fn set_volume(&mut self, volume: f64);

    /// Current playhead position in seconds
    fn position(&self) -> f64;

    /// Media duration in seconds, once known
    fn duration(&self) -> Option<f64>;
}
