//! Editor configuration.
//!
//! Loaded from JSON; every field is optional and falls back to the defaults
//! below. Call [`EditorConfig::validate`] (or build a [`FrameScale`] through
//! [`EditorConfig::frame_scale`]) before handing a config to the editor.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Result, TacklineError};
use crate::frame::{Frame, FrameScale, MIN_DURATION};

/// Layout and interaction constants supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixels per frame.
    pub frame_width: f32,
    /// Fraction of a frame past which a drag snaps to the next frame.
    pub snap_ratio: f32,
    /// Width of the start/end grab zones. Defaults to one frame.
    pub handle_width: Option<f32>,
    /// Height of the tack band inside a track.
    pub tack_height: f32,
    /// Height of a whole track row.
    pub track_height: f32,
    /// Vertical gap between track rows.
    pub track_spacing: f32,
    /// Width of the scrollable frame region.
    pub viewport_width: f32,
    pub default_tack_title: String,
    pub default_tack_span: Frame,
    pub default_track_title: String,
    pub default_timeline_title: String,
}

impl EditorConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        info!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    /// Effective width of the grab handles.
    pub fn handle_width(&self) -> f32 {
        self.handle_width.unwrap_or(self.frame_width)
    }

    /// Build the pixel ↔ frame mapping for this config.
    pub fn frame_scale(&self) -> Result<FrameScale> {
        FrameScale::new(self.frame_width, self.snap_ratio)
    }

    /// Reject configs the editor cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.frame_scale()?;

        let positive = [
            ("handle_width", self.handle_width()),
            ("tack_height", self.tack_height),
            ("track_height", self.track_height),
            ("viewport_width", self.viewport_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TacklineError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.track_spacing.is_finite() && self.track_spacing >= 0.0) {
            return Err(TacklineError::InvalidConfig(format!(
                "track_spacing must not be negative, got {}",
                self.track_spacing
            )));
        }
        if self.default_tack_span < MIN_DURATION {
            return Err(TacklineError::InvalidConfig(format!(
                "default_tack_span must be at least {MIN_DURATION}, got {}",
                self.default_tack_span
            )));
        }
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            frame_width: 20.0,
            snap_ratio: 0.5,
            handle_width: None,
            tack_height: 40.0,
            track_height: 64.0,
            track_spacing: 4.0,
            viewport_width: 800.0,
            default_tack_title: "tack".to_string(),
            default_tack_span: 10,
            default_track_title: "New Track".to_string(),
            default_timeline_title: "New Timeline".to_string(),
        }
    }
}
