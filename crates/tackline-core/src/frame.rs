//! Frame axis types and the pixel ↔ frame mapping.
//!
//! The timeline axis is a discrete integer frame count. Pointer input arrives
//! in pixels and is converted with a [`FrameScale`], which rounds toward zero
//! and then snaps to the neighbouring frame once the remainder passes a
//! configurable fraction of a frame.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TacklineError};

/// A position or length on the frame axis.
pub type Frame = i64;

/// Shortest span a tack may have.
pub const MIN_DURATION: Frame = 1;

/// Last addressable frame. Start and duration are both capped here so span
/// arithmetic never overflows.
pub const MAX_FRAME: Frame = i32::MAX as Frame;

/// A closed frame range `[start, start + duration - 1]`.
///
/// Construction clamps `start` into `0..=MAX_FRAME` and `duration` into
/// `MIN_DURATION..=MAX_FRAME`, so a `Span` always satisfies the tack
/// invariant. Deserialization goes through the same clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSpan")]
pub struct Span {
    pub start: Frame,
    pub duration: Frame,
}

impl Span {
    /// Create a span, clamping it into the valid domain.
    #[inline]
    pub fn new(start: Frame, duration: Frame) -> Self {
        Self {
            start: start.clamp(0, MAX_FRAME),
            duration: duration.clamp(MIN_DURATION, MAX_FRAME),
        }
    }

    /// Last frame covered by the span (inclusive).
    #[inline]
    pub fn end(self) -> Frame {
        self.start + self.duration - 1
    }

    /// Check if `frame` falls inside the span.
    #[inline]
    pub fn contains(self, frame: Frame) -> bool {
        self.start <= frame && frame <= self.end()
    }

    /// Check if `other` lies entirely inside this span.
    #[inline]
    pub fn encloses(self, other: Span) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    /// Check if the two closed ranges share at least one frame.
    #[inline]
    pub fn intersects(self, other: Span) -> bool {
        self.start <= other.end() && other.start <= self.end()
    }
}

/// Wire form of a [`Span`], accepted as-is and then clamped.
#[derive(Deserialize)]
struct RawSpan {
    start: Frame,
    duration: Frame,
}

impl From<RawSpan> for Span {
    fn from(raw: RawSpan) -> Self {
        Self::new(raw.start, raw.duration)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end())
    }
}

/// Pixel ↔ frame conversion with a snap threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameScale {
    frame_width: f32,
    snap_ratio: f32,
}

impl FrameScale {
    /// Create a scale. `frame_width` must be positive and `snap_ratio` in `[0, 1)`.
    pub fn new(frame_width: f32, snap_ratio: f32) -> Result<Self> {
        if !(frame_width.is_finite() && frame_width > 0.0) {
            return Err(TacklineError::InvalidConfig(format!(
                "frame width must be positive, got {frame_width}"
            )));
        }
        if !(0.0..1.0).contains(&snap_ratio) {
            return Err(TacklineError::InvalidConfig(format!(
                "snap ratio must be in [0, 1), got {snap_ratio}"
            )));
        }
        Ok(Self {
            frame_width,
            snap_ratio,
        })
    }

    /// Pixels per frame.
    #[inline]
    pub fn frame_width(self) -> f32 {
        self.frame_width
    }

    /// Fraction of a frame past which a partial move snaps to the next frame.
    #[inline]
    pub fn snap_ratio(self) -> f32 {
        self.snap_ratio
    }

    /// Convert a pointer displacement into a frame delta.
    pub fn frames_for_distance(self, distance: f32) -> Frame {
        let width = f64::from(self.frame_width);
        let distance = f64::from(distance);
        let whole = (distance / width).trunc() as Frame;
        let remainder = distance % width;
        let threshold = f64::from(self.snap_ratio) * width;

        if remainder > threshold {
            whole + 1
        } else if remainder < -threshold {
            whole - 1
        } else {
            whole
        }
    }

    /// Convert a frame count into a pixel displacement.
    #[inline]
    pub fn distance_for_frames(self, frames: Frame) -> f32 {
        (frames as f64 * f64::from(self.frame_width)) as f32
    }

    /// Frame under an absolute pixel position (no snapping).
    #[inline]
    pub fn frame_at(self, position: f32) -> Frame {
        (f64::from(position) / f64::from(self.frame_width)).trunc() as Frame
    }
}

impl Default for FrameScale {
    fn default() -> Self {
        Self {
            frame_width: 20.0,
            snap_ratio: 0.5,
        }
    }
}
