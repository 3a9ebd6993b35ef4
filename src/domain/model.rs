use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum configurable hold threshold in seconds
pub const HOLD_THRESHOLD_MIN: f64 = 0.5;
/// Maximum configurable hold threshold in seconds
pub const HOLD_THRESHOLD_MAX: f64 = 5.0;
/// Step of the threshold control exposed to the user
pub const HOLD_THRESHOLD_STEP: f64 = 0.5;

/// Per-key settings record owned by the host.
/// All fields are optional - a freshly created key instance has none of them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KeySettings {
    /// Last successfully fetched value, already formatted for display
    pub cached_value: Option<String>,

    /// Wall-clock milliseconds of the press that is currently in flight.
    /// Mirror for the persisted record only; gesture duration is computed
    /// from a monotonic instant, never from this field.
    pub press_started_at: Option<u64>,

    /// Minimum hold duration in seconds before a release counts as a hold
    pub hold_threshold_seconds: Option<f64>,
}

impl KeySettings {
    /// Clamp and step-snap the hold threshold so out-of-range values from a
    /// hand-edited record never reach the classifier.
    pub fn sanitize(&mut self) {
        if let Some(raw) = self.hold_threshold_seconds {
            self.hold_threshold_seconds = Some(snap_threshold(raw));
        }
    }

    /// Hold threshold as a Duration, if one is configured
    pub fn hold_threshold(&self) -> Option<Duration> {
        self.hold_threshold_seconds
            .map(|secs| Duration::from_millis((snap_threshold(secs) * 1000.0) as u64))
    }
}

/// Clamp a threshold into the allowed range and snap it to the control step
pub fn snap_threshold(value: f64) -> f64 {
    let clamped = value.clamp(HOLD_THRESHOLD_MIN, HOLD_THRESHOLD_MAX);
    (clamped / HOLD_THRESHOLD_STEP).round() * HOLD_THRESHOLD_STEP
}

/// Format a dotted value for the key display: a line break after every period
/// so `203.0.113.42` renders as four short lines.
pub fn format_dotted(raw: &str) -> String {
    raw.replace('.', ".\n")
}
