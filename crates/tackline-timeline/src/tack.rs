//! Tacks: the intervals placed on a track.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tackline_core::{Frame, FrameScale, Span};

use crate::events::{EventSink, TrackEvent};
use crate::gesture::{apply_delta, DragMode, Gesture, GestureOutcome, PointerEvent, TrackLayout};
use crate::ids::{ObjectId, TackId, TrackId};

/// An interval occupying `[start, start + duration - 1]` on its track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tack {
    /// Unique tack ID
    pub id: TackId,
    /// Owning track
    pub track: TrackId,
    /// Label shown on the tack
    pub title: String,
    #[serde(flatten)]
    span: Span,
    /// Part of the current selection
    #[serde(default)]
    pub active: bool,
    /// Cleared on soft delete
    #[serde(default = "default_exists")]
    pub exists: bool,
    #[serde(skip)]
    gesture: Gesture,
}

fn default_exists() -> bool {
    true
}

impl Tack {
    /// Create a tack. Out-of-range values are clamped.
    pub fn new(track: TrackId, title: impl Into<String>, start: Frame, duration: Frame) -> Self {
        Self {
            id: TackId::new(),
            track,
            title: title.into(),
            span: Span::new(start, duration),
            active: false,
            exists: true,
            gesture: Gesture::default(),
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    #[inline]
    pub fn start(&self) -> Frame {
        self.span.start
    }

    #[inline]
    pub fn duration(&self) -> Frame {
        self.span.duration
    }

    /// Last frame covered (inclusive).
    #[inline]
    pub fn end(&self) -> Frame {
        self.span.end()
    }

    pub fn contains_frame(&self, frame: Frame) -> bool {
        self.span.contains(frame)
    }

    pub fn set_span(&mut self, start: Frame, duration: Frame) {
        self.span = Span::new(start, duration);
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::Tack(self.id)
    }

    pub fn drag_mode(&self) -> DragMode {
        self.gesture.mode()
    }

    /// Span to draw while a drag is in flight; the committed span otherwise.
    pub fn preview_span(&self, scale: FrameScale) -> Span {
        self.gesture.preview(self.span, scale)
    }

    /// Feed a pointer event. Returns whether the tack consumed it.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        layout: &TrackLayout,
        sink: &mut impl EventSink,
    ) -> bool {
        let outcome = self.gesture.handle(self.span, event, layout);
        self.react(outcome, sink);
        outcome.consumed()
    }

    /// Drop an in-flight gesture without committing it.
    pub(crate) fn cancel_gesture(&mut self) {
        self.gesture = Gesture::default();
    }

    /// Force-commit an in-flight drag. Returns whether a commit happened.
    pub fn commit_pending(&mut self, scale: FrameScale, sink: &mut impl EventSink) -> bool {
        if self.gesture.is_idle() {
            return false;
        }
        let outcome = self.gesture.finish(scale);
        self.react(outcome, sink);
        matches!(outcome, GestureOutcome::Commit { .. })
    }

    fn react(&mut self, outcome: GestureOutcome, sink: &mut impl EventSink) {
        match outcome {
            GestureOutcome::Ignored | GestureOutcome::Grabbed => {}
            GestureOutcome::Selected => sink.emit(TrackEvent::Selected(self.object_id())),
            GestureOutcome::Moving => sink.emit(TrackEvent::Moving(self.id)),
            GestureOutcome::Commit { mode, delta } => self.commit(mode, delta, sink),
        }
    }

    fn commit(&mut self, mode: DragMode, delta: Frame, sink: &mut impl EventSink) {
        let before = self.span;
        sink.emit(TrackEvent::Moved {
            tack: self.id,
            before,
        });
        self.span = apply_delta(mode, before, delta);
        debug!(tack = %self.id, ?mode, delta, from = %before, to = %self.span, "Tack committed");
        sink.emit(TrackEvent::MovedAfterCommit(self.id));
    }
}
