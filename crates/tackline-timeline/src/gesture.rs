//! Pointer gesture state machine for a single tack.
//!
//! A gesture starts with a pointer-down on the tack (`Grab*`), is promoted to
//! a drag by the first pointer-move (`Drag*`), and is committed by a
//! pointer-up or by the pointer leaving the track bounds. The gesture itself
//! only tracks pixels; the owning tack turns a commit into a new span.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tackline_core::{EditorConfig, Frame, FrameScale, Rect, Result, Span, Vec2};

// ── Pointer input ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in track-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Vec2::new(x, y),
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }
}

// ── Layout ─────────────────────────────────────────────────────

/// Pixel layout of one track row, shared by every tack on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackLayout {
    pub scale: FrameScale,
    pub handle_width: f32,
    pub tack_height: f32,
    pub viewport_width: f32,
    /// Horizontal scroll offset in pixels, `>= 0`.
    pub scroll_x: f32,
}

impl TrackLayout {
    pub fn from_config(config: &EditorConfig, scroll_x: f32) -> Result<Self> {
        Ok(Self {
            scale: config.frame_scale()?,
            handle_width: config.handle_width(),
            tack_height: config.tack_height,
            viewport_width: config.viewport_width,
            scroll_x,
        })
    }

    /// Rectangle a tack with `span` occupies in track-local pixels.
    pub fn tack_rect(&self, span: Span) -> Rect {
        Rect::new(
            self.scale.distance_for_frames(span.start) - self.scroll_x,
            0.0,
            self.scale.distance_for_frames(span.duration),
            self.tack_height,
        )
    }

    /// Region outside of which an in-flight drag is committed.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.tack_height)
    }

    /// Absolute frame under a track-local x coordinate.
    pub fn frame_at(&self, x: f32) -> Frame {
        self.scale.frame_at(x + self.scroll_x).max(0)
    }
}

// ── Hit testing ────────────────────────────────────────────────

/// Part of a tack hit by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Start,
    Body,
    End,
}

/// Classify `pos` against a tack rectangle. The start handle wins when the
/// two handle zones overlap.
pub fn hit_test_handle(rect: Rect, pos: Vec2, handle_width: f32) -> Option<Handle> {
    if !rect.contains(pos) {
        return None;
    }
    if rect.left_strip(handle_width).contains(pos) {
        return Some(Handle::Start);
    }
    if rect.right_strip(handle_width).contains(pos) {
        return Some(Handle::End);
    }
    Some(Handle::Body)
}

// ── State machine ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    GrabStart,
    GrabBody,
    GrabEnd,
    /// Pressed on a one-frame tack; direction decides start or end.
    GrabWhole,
    DragStart,
    DragBody,
    DragEnd,
}

impl DragMode {
    pub fn is_grab(self) -> bool {
        matches!(
            self,
            Self::GrabStart | Self::GrabBody | Self::GrabEnd | Self::GrabWhole
        )
    }

    pub fn is_drag(self) -> bool {
        matches!(self, Self::DragStart | Self::DragBody | Self::DragEnd)
    }

    fn promoted(self, moved_left: bool) -> Self {
        match self {
            Self::GrabStart => Self::DragStart,
            Self::GrabBody => Self::DragBody,
            Self::GrabEnd => Self::DragEnd,
            Self::GrabWhole if moved_left => Self::DragStart,
            Self::GrabWhole => Self::DragEnd,
            other => other,
        }
    }

    /// Largest frame delta allowed for a drag in this mode.
    fn clamp_delta(self, span: Span, delta: Frame) -> Frame {
        match self {
            Self::DragStart => delta.max(-span.start).min(span.duration - 1),
            Self::DragBody => delta.max(-span.start),
            Self::DragEnd => delta.max(1 - span.duration),
            _ => delta,
        }
    }
}

/// Apply a committed frame delta to `span` according to the drag mode.
pub fn apply_delta(mode: DragMode, span: Span, delta: Frame) -> Span {
    match mode {
        DragMode::DragStart => Span::new(
            span.start.saturating_add(delta),
            span.duration.saturating_sub(delta),
        ),
        DragMode::DragBody => Span::new(span.start.saturating_add(delta), span.duration),
        DragMode::DragEnd => Span::new(span.start, span.duration.saturating_add(delta)),
        _ => span,
    }
}

/// What the owning tack must do after a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The event was not for this tack.
    Ignored,
    /// A grab started; nothing to report yet.
    Grabbed,
    /// The tack should become the selection.
    Selected,
    /// The drag moved.
    Moving,
    /// The drag finished with this frame delta.
    Commit { mode: DragMode, delta: Frame },
}

impl GestureOutcome {
    pub fn consumed(self) -> bool {
        self != Self::Ignored
    }
}

/// Transient drag state of one tack. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gesture {
    mode: DragMode,
    anchor: Vec2,
    offset: f32,
}

impl Gesture {
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Current pointer displacement in pixels, already clamped.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_idle(&self) -> bool {
        self.mode == DragMode::Idle
    }

    /// Feed one pointer event for a tack currently spanning `span`.
    pub fn handle(&mut self, span: Span, event: PointerEvent, layout: &TrackLayout) -> GestureOutcome {
        match self.mode {
            DragMode::Idle => self.begin(span, event, layout),
            mode if mode.is_grab() => self.recognize(event),
            _ => self.update(span, event, layout),
        }
    }

    fn begin(&mut self, span: Span, event: PointerEvent, layout: &TrackLayout) -> GestureOutcome {
        let rect = layout.tack_rect(span);
        match event.kind {
            PointerKind::Down => {
                let Some(handle) = hit_test_handle(rect, event.position, layout.handle_width) else {
                    return GestureOutcome::Ignored;
                };
                self.mode = if span.duration == 1 {
                    DragMode::GrabWhole
                } else {
                    match handle {
                        Handle::Start => DragMode::GrabStart,
                        Handle::Body => DragMode::GrabBody,
                        Handle::End => DragMode::GrabEnd,
                    }
                };
                self.anchor = event.position;
                self.offset = 0.0;
                debug!(mode = ?self.mode, x = event.position.x, "Gesture grabbed");
                GestureOutcome::Grabbed
            }
            // A release over the tack without a preceding grab is a plain click.
            PointerKind::Up if rect.contains(event.position) => GestureOutcome::Selected,
            _ => GestureOutcome::Ignored,
        }
    }

    fn recognize(&mut self, event: PointerEvent) -> GestureOutcome {
        match event.kind {
            PointerKind::Move => {
                self.mode = self.mode.promoted(event.position.x < self.anchor.x);
                debug!(mode = ?self.mode, "Gesture promoted to drag");
                GestureOutcome::Selected
            }
            PointerKind::Up => {
                self.reset();
                GestureOutcome::Selected
            }
            PointerKind::Down => GestureOutcome::Ignored,
        }
    }

    fn update(&mut self, span: Span, event: PointerEvent, layout: &TrackLayout) -> GestureOutcome {
        if !layout.bounds().contains(event.position) {
            debug!(mode = ?self.mode, "Pointer left bounds, committing drag");
            return self.finish(layout.scale);
        }

        match event.kind {
            PointerKind::Move => {
                self.offset = event.position.x - self.anchor.x;
                let delta = layout.scale.frames_for_distance(self.offset);
                let clamped = self.mode.clamp_delta(span, delta);
                if clamped != delta {
                    self.offset = layout.scale.distance_for_frames(clamped);
                }
                GestureOutcome::Moving
            }
            PointerKind::Up => self.finish(layout.scale),
            PointerKind::Down => GestureOutcome::Ignored,
        }
    }

    /// End a drag, returning the frame delta to apply. Grabs that never
    /// moved are dropped without a commit.
    pub fn finish(&mut self, scale: FrameScale) -> GestureOutcome {
        let mode = self.mode;
        let delta = scale.frames_for_distance(self.offset);
        self.reset();
        if mode.is_drag() {
            GestureOutcome::Commit { mode, delta }
        } else {
            GestureOutcome::Ignored
        }
    }

    /// Span a renderer should draw while the drag is in flight.
    pub fn preview(&self, span: Span, scale: FrameScale) -> Span {
        if !self.mode.is_drag() {
            return span;
        }
        apply_delta(self.mode, span, scale.frames_for_distance(self.offset))
    }

    fn reset(&mut self) {
        self.mode = DragMode::Idle;
        self.offset = 0.0;
    }
}
