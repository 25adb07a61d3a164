//! Tracks: one row of tacks.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Reverse;
use tracing::{debug, warn};

use tackline_core::{Frame, FrameScale, Span};

use crate::events::{EventSink, TrackEvent};
use crate::gesture::{DragMode, PointerEvent, PointerKind, TrackLayout};
use crate::ids::{ObjectId, TackId, TrackId};
use crate::tack::Tack;

/// A row of tacks. Tacks keep arrival order; queries that care about
/// position sort by start frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track title
    pub title: String,
    /// Tacks in arrival order, including soft-deleted ones
    pub tacks: Vec<Tack>,
    #[serde(default)]
    pub active: bool,
    #[serde(default = "default_exists")]
    pub exists: bool,
    /// Tacks currently being dragged. While non-empty, only these receive
    /// pointer events.
    #[serde(skip)]
    moving: SmallVec<[TackId; 2]>,
}

fn default_exists() -> bool {
    true
}

impl Track {
    /// Create an empty track.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(),
            title: title.into(),
            tacks: Vec::new(),
            active: false,
            exists: true,
            moving: SmallVec::new(),
        }
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::Track(self.id)
    }

    // ── Lookup ─────────────────────────────────────────────────

    /// Tacks that have not been deleted, in arrival order.
    pub fn live_tacks(&self) -> impl Iterator<Item = &Tack> {
        self.tacks.iter().filter(|t| t.exists)
    }

    pub fn live_count(&self) -> usize {
        self.live_tacks().count()
    }

    /// Live tacks ordered by start frame, ties in arrival order.
    pub fn tacks_by_start(&self) -> Vec<&Tack> {
        let mut sorted: Vec<&Tack> = self.live_tacks().collect();
        sorted.sort_by_key(|t| t.start());
        sorted
    }

    /// Find a live tack by ID.
    pub fn tack(&self, id: TackId) -> Option<&Tack> {
        self.live_tacks().find(|t| t.id == id)
    }

    /// Find a live tack mutably by ID.
    pub fn tack_mut(&mut self, id: TackId) -> Option<&mut Tack> {
        self.tacks.iter_mut().find(|t| t.exists && t.id == id)
    }

    /// Whether the tack was ever placed on this track, deleted or not.
    pub fn owns(&self, id: TackId) -> bool {
        self.tacks.iter().any(|t| t.id == id)
    }

    /// Live tack covering `frame`, first in arrival order.
    pub fn tack_covering(&self, frame: Frame) -> Option<&Tack> {
        self.live_tacks().find(|t| t.contains_frame(frame))
    }

    /// A new tack may start at `frame` when no live tack covers it.
    pub fn can_add_tack_at(&self, frame: Frame) -> bool {
        frame >= 0 && self.tack_covering(frame).is_none()
    }

    /// Tack whose start is nearest at or after `frame`, preferring the
    /// preceding tack when it still covers `frame`. Falls back to the last
    /// tack when every tack starts before `frame`.
    pub fn tack_near_frame(&self, frame: Frame) -> Option<TackId> {
        let sorted = self.tacks_by_start();
        match sorted.iter().position(|t| t.start() >= frame) {
            Some(0) => Some(sorted[0].id),
            Some(i) if sorted[i - 1].contains_frame(frame) => Some(sorted[i - 1].id),
            Some(i) => Some(sorted[i].id),
            None => sorted.last().map(|t| t.id),
        }
    }

    // ── Navigation ─────────────────────────────────────────────

    /// Tack after `id` by start frame.
    pub fn next_of(&self, id: TackId) -> Option<TackId> {
        let sorted = self.tacks_by_start();
        let index = sorted.iter().position(|t| t.id == id)?;
        sorted.get(index + 1).map(|t| t.id)
    }

    /// Tack before `id` by start frame, or this track when `id` is the
    /// earliest.
    pub fn previous_of(&self, id: TackId) -> Option<ObjectId> {
        let mut sorted: Vec<&Tack> = self.live_tacks().collect();
        sorted.sort_by_key(|t| Reverse(t.start()));
        let index = sorted.iter().position(|t| t.id == id)?;
        match sorted.get(index + 1) {
            Some(tack) => Some(tack.object_id()),
            None => Some(self.object_id()),
        }
    }

    /// First live tack by arrival order, or the track itself when empty.
    pub fn first_or_self(&self) -> ObjectId {
        self.live_tacks()
            .next()
            .map(Tack::object_id)
            .unwrap_or_else(|| self.object_id())
    }

    // ── Editing ────────────────────────────────────────────────

    /// Append a new tack. Returns its ID.
    pub fn add_tack(&mut self, title: impl Into<String>, start: Frame, duration: Frame) -> TackId {
        let tack = Tack::new(self.id, title, start, duration);
        let id = tack.id;
        debug!(track = %self.id, tack = %id, span = %tack.span(), "Tack added");
        self.tacks.push(tack);
        id
    }

    /// Soft-delete a live tack. Returns false if no such tack.
    ///
    /// A drag in flight on the tack is dropped, and the tack leaves the
    /// moving set so the rest of the track receives pointer input again.
    pub fn delete_tack(&mut self, id: TackId) -> bool {
        let Some(tack) = self.tack_mut(id) else {
            warn!(track = %self.id, tack = %id, "Delete of unknown tack ignored");
            return false;
        };
        tack.exists = false;
        tack.active = false;
        tack.cancel_gesture();
        self.moving.retain(|moving| *moving != id);
        true
    }

    /// Make `id` the only active object on this track. Returns whether `id`
    /// names this track or one of its live tacks.
    pub fn activate_only(&mut self, id: ObjectId) -> bool {
        self.active = id == self.object_id();
        let mut found = self.active;
        for tack in &mut self.tacks {
            tack.active = tack.exists && id == tack.object_id();
            found |= tack.active;
        }
        found
    }

    pub fn deactivate_all(&mut self) {
        self.active = false;
        for tack in &mut self.tacks {
            tack.active = false;
        }
    }

    /// Whether the track or one of its tacks is active.
    pub fn is_active_or_contains_active(&self) -> bool {
        self.active || self.live_tacks().any(|t| t.active)
    }

    // ── Pointer input ──────────────────────────────────────────

    /// Restrict pointer delivery to the given tack until overlaps are resolved.
    pub fn set_moving(&mut self, id: TackId) {
        self.moving.clear();
        self.moving.push(id);
    }

    pub fn moving(&self) -> &[TackId] {
        &self.moving
    }

    /// Deliver a pointer event to the tacks of this track. The first tack
    /// that consumes it wins; a release nobody consumed selects the track.
    ///
    /// While a tack is grabbed or dragged only it receives events, starting
    /// with the moving set and falling back to any tack whose gesture is in
    /// flight.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        layout: &TrackLayout,
        sink: &mut impl EventSink,
    ) -> bool {
        let grabbed = self
            .live_tacks()
            .any(|t| t.drag_mode() != DragMode::Idle);
        let moving = &self.moving;
        for tack in self.tacks.iter_mut().filter(|t| t.exists) {
            let eligible = if !moving.is_empty() {
                moving.contains(&tack.id)
            } else if grabbed {
                tack.drag_mode() != DragMode::Idle
            } else {
                true
            };
            if !eligible {
                continue;
            }
            if tack.handle_pointer(event, layout, sink) {
                return true;
            }
        }

        if event.kind == PointerKind::Up {
            sink.emit(TrackEvent::Selected(self.object_id()));
            return true;
        }
        false
    }

    /// Commit every in-flight drag. Returns the number of commits.
    pub fn commit_pending(&mut self, scale: FrameScale, sink: &mut impl EventSink) -> usize {
        self.tacks
            .iter_mut()
            .filter(|t| t.exists)
            .map(|t| t.commit_pending(scale, sink))
            .filter(|committed| *committed)
            .count()
    }

    // ── Overlap resolution ─────────────────────────────────────

    /// Reconcile the other tacks of this track with the just-committed tack
    /// `moved`. Returns the number of tacks deleted or reshaped.
    ///
    /// Tacks fully covered by `moved` are deleted. Tacks overlapping one of
    /// its edges are trimmed back to that edge. A tack that strictly contains
    /// `moved` keeps only the part before it.
    pub fn resolve_overlaps(&mut self, moved: TackId, sink: &mut impl EventSink) -> usize {
        self.moving.clear();

        let Some(moved_span) = self.tack(moved).map(Tack::span) else {
            warn!(track = %self.id, tack = %moved, "Overlap resolution for unknown tack ignored");
            return 0;
        };

        let mut touched = 0;
        for other in self.tacks.iter_mut().filter(|t| t.exists && t.id != moved) {
            let span = other.span();
            match resolve_one(moved_span, span) {
                Resolution::Keep => continue,
                Resolution::Delete => {
                    other.exists = false;
                    other.active = false;
                    debug!(tack = %other.id, span = %span, by = %moved, "Tack swallowed");
                    sink.emit(TrackEvent::Deleted(other.object_id()));
                }
                Resolution::Reshape(new_span) => {
                    other.set_span(new_span.start, new_span.duration);
                    debug!(tack = %other.id, from = %span, to = %new_span, by = %moved, "Tack trimmed");
                    sink.emit(TrackEvent::Updated(other.object_id()));
                }
            }
            touched += 1;
        }
        touched
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Keep,
    Delete,
    Reshape(Span),
}

fn resolve_one(moved: Span, other: Span) -> Resolution {
    if !moved.intersects(other) {
        return Resolution::Keep;
    }
    if moved.encloses(other) {
        return Resolution::Delete;
    }
    if other.start < moved.start {
        // Tail overlaps, or `other` strictly contains `moved`: keep the head.
        return Resolution::Reshape(Span::new(other.start, moved.start - other.start));
    }
    // Head overlaps: keep the tail past `moved`.
    let start = moved.end() + 1;
    Resolution::Reshape(Span::new(start, other.end() - start + 1))
}
