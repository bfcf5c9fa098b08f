//! Stateless playback controls.
//!
//! Pure rendering of tile state into the play/pause affordance, the
//! bounded seek control, and formatted labels. Nothing here holds state;
//! every interaction goes back through the tile controller.

use crate::types::{TileSnapshot, TransportState};
use chrono::{DateTime, Utc};

/// Which affordance the play/pause button shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportIcon {
    /// Offer to start playback
    Play,
    /// Offer to pause playback
    Pause,
}

/// Render-ready view of one tile's controls.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsView {
    /// Play/pause affordance
    pub icon: TransportIcon,

    /// URL resolution in flight; show a loading hint instead of controls
    pub busy: bool,

    /// Inline error message, when the tile is in `Error`
    pub error: Option<String>,

    /// Seek control position in seconds
    pub seek_value: f64,

    /// Seek control upper bound in seconds (0 until duration is known)
    pub seek_max: f64,

    /// "m:ss / m:ss" elapsed/total label
    pub time_label: String,

    /// Current rate menu label
    pub rate_label: &'static str,
}

impl ControlsView {
    /// Project a tile snapshot into its controls
    pub fn from_snapshot(snapshot: &TileSnapshot) -> Self {
        let icon = if snapshot.transport == TransportState::Playing {
            TransportIcon::Pause
        } else {
            TransportIcon::Play
        };
        let seek_max = snapshot.total_seconds.unwrap_or(0.0);

        Self {
            icon,
            busy: snapshot.transport == TransportState::ResolvingUrl,
            error: snapshot.error.clone(),
            seek_value: clamp_seek(snapshot.position_seconds, snapshot.total_seconds),
            seek_max,
            time_label: format_time_label(snapshot.position_seconds, snapshot.total_seconds),
            rate_label: snapshot.rate.label(),
        }
    }
}

/// Bound a seek target to `[0, total]`; an unknown total pins it to zero
pub fn clamp_seek(position_seconds: f64, total_seconds: Option<f64>) -> f64 {
    let upper = total_seconds.unwrap_or(0.0).max(0.0);
    if position_seconds.is_nan() {
        return 0.0;
    }
    position_seconds.clamp(0.0, upper)
}

/// Format seconds as "m:ss" (minutes unpadded, seconds zero-padded)
pub fn format_clock(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// "m:ss / m:ss" elapsed/total label; unknown total reads as 0:00
pub fn format_time_label(position_seconds: f64, total_seconds: Option<f64>) -> String {
    format!(
        "{} / {}",
        format_clock(position_seconds),
        format_clock(total_seconds.unwrap_or(0.0))
    )
}

/// Format a probed item duration for tile metadata
pub fn format_item_duration(duration_seconds: Option<u32>) -> String {
    match duration_seconds {
        Some(d) => format!("{}:{:02}", d / 60, d % 60),
        None => "unknown length".to_string(),
    }
}

/// Format a byte count with 1024-based units, trimmed to two decimals
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024_f64.powi(exponent as i32);

    // Two decimals with trailing zeros trimmed: 12.00 -> "12", 1.50 -> "1.5"
    let mut value = format!("{:.2}", scaled);
    while value.ends_with('0') {
        value.pop();
    }
    if value.ends_with('.') {
        value.pop();
    }

    format!("{} {}", value, UNITS[exponent])
}

/// Format an upload timestamp for tile metadata
pub fn format_upload_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%b %-d, %Y").to_string()
}
