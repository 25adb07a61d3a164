//! Rectangles in track-local pixels, used for pointer hit-testing.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Axis-aligned rectangle, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the left and top edges are inside, the right
    /// and bottom edges are not.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        (self.x..self.right()).contains(&point.x) && (self.y..self.bottom()).contains(&point.y)
    }

    /// Leftmost `width` pixels of this rectangle, full height.
    pub fn left_strip(self, width: f32) -> Self {
        Self::new(self.x, self.y, width.min(self.width), self.height)
    }

    /// Rightmost `width` pixels of this rectangle, full height.
    pub fn right_strip(self, width: f32) -> Self {
        let width = width.min(self.width);
        Self::new(self.right() - width, self.y, width, self.height)
    }
}
