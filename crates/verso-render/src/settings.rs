//! Sketch settings and frame timing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use verso_common::{Result, VersoError};

/// Sketch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Animation length in seconds; `0` makes a still sketch.
    pub animation_duration: f64,
    pub fps: f64,
    /// Free-form parameter descriptors keyed by name.
    pub parameters: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animation_duration: 0.0,
            fps: 60.0,
            parameters: Map::new(),
        }
    }
}

/// Timing of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameInfo {
    /// 1-based frame number.
    pub frame: u32,
    /// Milliseconds since the start of the animation.
    pub time: f64,
    /// Progress through the animation in `0..=1`.
    pub playhead: f64,
}

impl Settings {
    /// Parse settings from JSON, keeping defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| VersoError::config_with_source("invalid settings", e))?;
        if settings.fps.is_nan() || settings.fps <= 0.0 {
            return Err(VersoError::config(format!(
                "fps must be positive, got {}",
                settings.fps
            )));
        }
        Ok(settings)
    }

    pub fn max_frames(&self) -> u32 {
        let frames = (self.fps * self.animation_duration).ceil();
        if frames.is_finite() && frames > 0.0 {
            frames as u32
        } else {
            0
        }
    }

    pub fn is_animated(&self) -> bool {
        self.max_frames() > 0
    }

    pub fn frame(&self, frame: u32) -> FrameInfo {
        let max = self.max_frames();
        FrameInfo {
            frame,
            time: 1000.0 / self.fps * f64::from(frame),
            playhead: if max == 0 {
                0.0
            } else {
                f64::from(frame) / f64::from(max)
            },
        }
    }

    /// Every frame of the sketch in order. A still sketch has exactly one.
    pub fn frames(&self) -> impl Iterator<Item = FrameInfo> + '_ {
        (1..=self.max_frames().max(1)).map(move |n| self.frame(n))
    }

    /// Initial parameter values: each descriptor's `default` entry, or the
    /// value itself when it is not a descriptor object.
    pub fn parameter_values(&self) -> Map<String, Value> {
        self.parameters
            .iter()
            .map(|(name, input)| {
                let value = match input {
                    Value::Object(descriptor) => {
                        descriptor.get("default").cloned().unwrap_or(Value::Null)
                    }
                    other => other.clone(),
                };
                (name.clone(), value)
            })
            .collect()
    }

    /// File name for an exported frame. Animated sketches get a frame
    /// number prefix zero-padded to the width of the last frame.
    pub fn output_name(&self, frame: u32, name: &str, extension: &str) -> String {
        let max = self.max_frames();
        if max == 0 {
            return format!("{name}.{extension}");
        }
        let width = max.to_string().len();
        format!("{frame:0width$}-{name}.{extension}")
    }
}
