//! Core types for playback coordination

use serde::{Deserialize, Serialize};

/// Playback lifecycle state of one tile's audio resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// No playback URL requested yet
    Idle,

    /// Signed URL resolution in flight (at most one per tile)
    ResolvingUrl,

    /// URL bound to the sink, playback not started
    Ready,

    /// Sink is playing and this tile holds the coordinator grant
    Playing,

    /// Paused mid-track, either by the user or by another tile's grant
    Paused,

    /// Natural end of media
    Ended,

    /// URL resolution or playback failed; retry is user-initiated
    Error,
}

impl TransportState {
    /// Whether a source is bound and seeking is permitted
    pub fn is_seekable(self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused)
    }

    /// Whether rate changes are permitted (any state with a session)
    pub fn accepts_rate_changes(self) -> bool {
        !matches!(self, Self::Idle | Self::Error)
    }
}

/// Playback speed, restricted to the fixed menu set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackRate {
    /// 0.5x
    Half,
    /// 0.75x
    ThreeQuarters,
    /// 1x
    #[default]
    Normal,
    /// 1.25x
    OneAndQuarter,
    /// 1.5x
    OneAndHalf,
    /// 2x
    Double,
}

impl PlaybackRate {
    /// Menu ordering, slowest first
    pub const ALL: [Self; 6] = [
        Self::Half,
        Self::ThreeQuarters,
        Self::Normal,
        Self::OneAndQuarter,
        Self::OneAndHalf,
        Self::Double,
    ];

    /// Multiplier applied to the sink
    pub fn factor(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::ThreeQuarters => 0.75,
            Self::Normal => 1.0,
            Self::OneAndQuarter => 1.25,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
        }
    }

    /// Menu label ("1.25x")
    pub fn label(self) -> &'static str {
        match self {
            Self::Half => "0.5x",
            Self::ThreeQuarters => "0.75x",
            Self::Normal => "1x",
            Self::OneAndQuarter => "1.25x",
            Self::OneAndHalf => "1.5x",
            Self::Double => "2x",
        }
    }

    /// Look up a rate by its exact multiplier
    pub fn from_factor(factor: f64) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.factor() == factor)
    }
}

/// Point-in-time view of one tile, consumed by the controls layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSnapshot {
    /// Current transport state
    pub transport: TransportState,

    /// Playback position in seconds
    pub position_seconds: f64,

    /// Media duration in seconds, once the sink has reported one
    pub total_seconds: Option<f64>,

    /// Current playback rate
    pub rate: PlaybackRate,

    /// Linear volume in `[0.0, 1.0]`
    pub volume: f64,

    /// User-visible error message while in `Error`
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_menu_covers_the_fixed_set_in_order() {
        let factors: Vec<f64> = PlaybackRate::ALL.iter().map(|r| r.factor()).collect();
        assert_eq!(factors, vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0]);
    }

    #[test]
    fn default_rate_is_normal() {
        assert_eq!(PlaybackRate::default(), PlaybackRate::Normal);
        assert_eq!(PlaybackRate::default().factor(), 1.0);
    }

    #[test]
    fn from_factor_accepts_only_the_fixed_set() {
        assert_eq!(PlaybackRate::from_factor(1.25), Some(PlaybackRate::OneAndQuarter));
        assert_eq!(PlaybackRate::from_factor(2.0), Some(PlaybackRate::Double));
        assert_eq!(PlaybackRate::from_factor(1.75), None);
        assert_eq!(PlaybackRate::from_factor(0.0), None);
    }

    #[test]
    fn seekable_and_rate_rules_follow_the_state_machine() {
        assert!(!TransportState::Idle.is_seekable());
        assert!(!TransportState::ResolvingUrl.is_seekable());
        assert!(TransportState::Ready.is_seekable());
        assert!(TransportState::Playing.is_seekable());
        assert!(TransportState::Paused.is_seekable());
        assert!(!TransportState::Ended.is_seekable());
        assert!(!TransportState::Error.is_seekable());

        assert!(!TransportState::Idle.accepts_rate_changes());
        assert!(!TransportState::Error.accepts_rate_changes());
        assert!(TransportState::ResolvingUrl.accepts_rate_changes());
        assert!(TransportState::Ended.accepts_rate_changes());
    }
}
