//! Canvas configuration.
//!
//! Mirrors the option object accepted by the JavaScript constructor.
//! Callback entries in that object are not part of this struct; they are
//! registered separately and ignored during deserialization.
//!
//! Each key is read on its own: a `null` or wrongly typed value (what
//! `JSON.stringify` makes of `NaN` and `Infinity`) falls back to that key's
//! default without disturbing the others.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Default upper bound on the delta reported to callbacks, in milliseconds.
pub const DEFAULT_DELTA_CAP_MS: f64 = 1000.0;

/// Scalar options for a [`LayeredCanvas`](crate::canvas::LayeredCanvas).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CanvasOptions")]
pub struct CanvasConfig {
    /// Whether the frame loop starts running on `initialize()`.
    pub active: bool,
    /// Frames per second; `<= 0` means uncapped.
    pub framerate_target: f64,
    /// Maximum delta (ms) handed to update/draw.
    pub delta_cap: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            active: true,
            framerate_target: 0.0,
            delta_cap: DEFAULT_DELTA_CAP_MS,
        }
    }
}

/// Raw option object as it arrives from JavaScript.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanvasOptions {
    #[serde(default, deserialize_with = "lenient")]
    active: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    framerate_target: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    delta_cap: Option<f64>,
}

/// Accept any JSON value; keep it only if it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match T::deserialize(&value) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            if !value.is_null() {
                log::warn!("ignoring canvas option {value}: {e}");
            }
            Ok(None)
        }
    }
}

impl From<CanvasOptions> for CanvasConfig {
    fn from(options: CanvasOptions) -> Self {
        let defaults = CanvasConfig::default();
        CanvasConfig {
            active: options.active.unwrap_or(defaults.active),
            framerate_target: options.framerate_target.unwrap_or(defaults.framerate_target),
            delta_cap: options.delta_cap.unwrap_or(defaults.delta_cap),
        }
        .sanitized()
    }
}

/// How often the frame loop is allowed to run update/draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramePacing {
    /// Every scheduled tick.
    Uncapped,
    /// Only once at least `interval_ms` has elapsed since the last frame.
    Capped { interval_ms: f64 },
}

impl CanvasConfig {
    /// Parse the JSON form of the option object.
    ///
    /// Missing, `null` or wrongly typed keys take their defaults; unknown
    /// keys are ignored. Only malformed JSON or a non-object is an error.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid canvas options: {e}"))
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_framerate_target(mut self, fps: f64) -> Self {
        self.framerate_target = fps;
        self.sanitized()
    }

    pub fn with_delta_cap(mut self, cap_ms: f64) -> Self {
        self.delta_cap = cap_ms;
        self.sanitized()
    }

    /// Replace nonsensical numbers with their defaults.
    pub fn sanitized(mut self) -> Self {
        if !self.framerate_target.is_finite() {
            self.framerate_target = 0.0;
        }
        if !self.delta_cap.is_finite() || self.delta_cap < 0.0 {
            self.delta_cap = DEFAULT_DELTA_CAP_MS;
        }
        self
    }

    /// Frame pacing derived from the frame-rate target.
    pub fn pacing(&self) -> FramePacing {
        if self.framerate_target > 0.0 && self.framerate_target.is_finite() {
            FramePacing::Capped {
                interval_ms: 1000.0 / self.framerate_target,
            }
        } else {
            FramePacing::Uncapped
        }
    }
}
