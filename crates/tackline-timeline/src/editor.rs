//! Editor facade: owns the project, routes input, and drains notifications.
//!
//! Input handlers push [`TrackEvent`]s onto an internal queue. After each
//! input the queue is drained in order: the editor applies its own reaction
//! (selection, drag bookkeeping, overlap resolution) and then forwards the
//! event to the [`EditorListener`]. Events produced while draining are
//! appended to the same queue, so a commit is fully resolved before the next
//! input is accepted.

use std::collections::VecDeque;
use tracing::{debug, info, warn};

use tackline_core::{EditorConfig, Frame, FrameScale, Result, TacklineError};

use crate::events::{EditorListener, EventSink, NullListener, TrackEvent};
use crate::gesture::{PointerEvent, PointerKind, TrackLayout};
use crate::ids::{ObjectId, TackId, TimelineId, TrackId};
use crate::navigation::{self, Direction, Navigation};
use crate::project::Project;
use crate::timeline::Timeline;

pub struct Editor<L: EditorListener = NullListener> {
    project: Project,
    config: EditorConfig,
    scale: FrameScale,
    listener: L,
    queue: VecDeque<TrackEvent>,
    selection: Option<ObjectId>,
    /// Playhead frame.
    cursor: Frame,
    scroll_x: f32,
    viewport_width: f32,
    ruler_pressed: bool,
}

impl<L: EditorListener> Editor<L> {
    /// Create an editor over `project`. Fails if `config` is invalid.
    pub fn new(project: Project, config: EditorConfig, listener: L) -> Result<Self> {
        config.validate()?;
        let scale = config.frame_scale()?;
        info!(
            project = %project.name,
            timelines = project.live_timelines().count(),
            "Editor ready"
        );
        Ok(Self {
            project,
            scale,
            viewport_width: config.viewport_width,
            config,
            listener,
            queue: VecDeque::new(),
            selection: None,
            cursor: 0,
            scroll_x: 0.0,
            ruler_pressed: false,
        })
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scale(&self) -> FrameScale {
        self.scale
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// The active timeline, if any.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.project.active_timeline()
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    pub fn cursor(&self) -> Frame {
        self.cursor
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Pixel layout shared by every track row at the current scroll.
    pub fn layout(&self) -> TrackLayout {
        TrackLayout {
            scale: self.scale,
            handle_width: self.config.handle_width(),
            tack_height: self.config.tack_height,
            viewport_width: self.viewport_width,
            scroll_x: self.scroll_x,
        }
    }

    // ── Viewport ───────────────────────────────────────────────

    pub fn set_viewport_width(&mut self, width: f32) -> Result<()> {
        if !(width.is_finite() && width > 0.0) {
            return Err(TacklineError::InvalidConfig(format!(
                "viewport width must be positive, got {width}"
            )));
        }
        self.viewport_width = width;
        Ok(())
    }

    /// Scroll horizontally by `dx` pixels. Never scrolls before frame zero.
    pub fn scroll_by(&mut self, dx: f32) {
        self.scroll_x = (self.scroll_x + dx).max(0.0);
    }

    /// Scroll the minimum amount that brings `frame` into view.
    pub fn focus_to_frame(&mut self, frame: Frame) {
        let width = self.scale.frame_width();
        let left = (self.scroll_x / width).round() as Frame;
        let right = ((self.scroll_x + self.viewport_width) / width).trunc() as Frame - 1;

        if frame < left {
            self.scroll_x -= self.scale.distance_for_frames(left - frame);
        } else if frame > right {
            self.scroll_x += self.scale.distance_for_frames(frame - right);
        }
        self.scroll_x = self.scroll_x.max(0.0);
    }

    // ── Pointer input ──────────────────────────────────────────

    /// Deliver a pointer event in track-local pixels to `track` of the active
    /// timeline. Returns whether anything consumed it.
    pub fn pointer(&mut self, track: TrackId, event: PointerEvent) -> bool {
        let layout = self.layout();
        let Some(timeline) = self.project.active_timeline_mut() else {
            return false;
        };
        let Some(row) = timeline.track_mut(track) else {
            warn!(track = %track, "Pointer event for unknown track ignored");
            return false;
        };
        let consumed = row.handle_pointer(event, &layout, &mut self.queue);
        self.drain();
        consumed
    }

    /// Pointer event on the frame ruler. Pressing moves the playhead and
    /// clears the selection; dragging scrubs.
    pub fn ruler_pointer(&mut self, event: PointerEvent) {
        let frame = self.layout().frame_at(event.position.x);
        match event.kind {
            PointerKind::Down => {
                self.ruler_pressed = true;
                self.cursor = frame;
                self.queue.emit(TrackEvent::Unselected);
                self.drain();
            }
            PointerKind::Move if self.ruler_pressed => {
                self.cursor = frame;
                self.focus_to_frame(frame);
            }
            PointerKind::Move => {}
            PointerKind::Up => self.ruler_pressed = false,
        }
    }

    /// Force-commit every in-flight drag on the active timeline.
    pub fn commit_pending(&mut self) -> usize {
        let scale = self.scale;
        let Some(timeline) = self.project.active_timeline_mut() else {
            return 0;
        };
        let committed = timeline
            .live_tracks_mut()
            .map(|track| track.commit_pending(scale, &mut self.queue))
            .sum();
        self.drain();
        committed
    }

    /// Run overlap resolution for `tack` on its track.
    pub fn resolve_overlaps(&mut self, tack: TackId) -> bool {
        let Some(track) = self
            .project
            .active_timeline_mut()
            .and_then(|t| t.track_of_tack_mut(tack))
        else {
            warn!(tack = %tack, "Overlap resolution for unknown tack ignored");
            return false;
        };
        track.resolve_overlaps(tack, &mut self.queue);
        self.drain();
        true
    }

    // ── Keyboard ───────────────────────────────────────────────

    /// Arrow-key navigation.
    ///
    /// With nothing selected, Left/Right step the playhead and Down selects
    /// near the playhead on the first track. Otherwise the selection moves
    /// and the view follows the newly selected tack.
    pub fn key(&mut self, direction: Direction) {
        if self.selection.is_none() {
            match direction {
                Direction::Left => self.step_cursor(-1),
                Direction::Right => self.step_cursor(1),
                _ => {}
            }
        }

        let Some(timeline) = self.project.active_timeline() else {
            return;
        };
        let had_selection = self.selection.is_some();
        match navigation::navigate(timeline, self.selection, direction, self.cursor) {
            Navigation::Select(id) => self.queue.emit(TrackEvent::Selected(id)),
            Navigation::Unselect => self.queue.emit(TrackEvent::Unselected),
            Navigation::Stay => {}
        }
        self.drain();

        if had_selection {
            if let Some(frame) = self.selection.and_then(|id| self.start_frame_of(id)) {
                self.focus_to_frame(frame);
            }
        }
    }

    fn step_cursor(&mut self, delta: Frame) {
        self.cursor = (self.cursor + delta).max(0);
        self.focus_to_frame(self.cursor);
    }

    // ── Selection ──────────────────────────────────────────────

    /// Select a live track or tack. Returns false if it does not exist.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.timeline().is_some_and(|t| t.contains(id)) {
            warn!(object = %id, "Selection of unknown object ignored");
            return false;
        }
        self.queue.emit(TrackEvent::Selected(id));
        self.drain();
        true
    }

    pub fn deselect(&mut self) {
        self.queue.emit(TrackEvent::Unselected);
        self.drain();
    }

    // ── Structure ──────────────────────────────────────────────

    /// Add a timeline. The first one becomes active.
    pub fn add_timeline(&mut self, title: Option<&str>) -> TimelineId {
        let title = title.unwrap_or(&self.config.default_timeline_title);
        let id = self.project.add_timeline(Timeline::new(title));
        self.queue.emit(TrackEvent::TimelineAdded(id));
        self.drain();
        id
    }

    /// Switch the active timeline. Clears the selection.
    pub fn set_active_timeline(&mut self, id: TimelineId) -> bool {
        if !self.project.set_active_timeline(id) {
            return false;
        }
        self.queue.emit(TrackEvent::Unselected);
        self.drain();
        true
    }

    pub fn delete_timeline(&mut self, id: TimelineId) -> bool {
        let was_active = self.timeline().is_some_and(|t| t.id == id);
        if !self.project.delete_timeline(id) {
            return false;
        }
        if was_active {
            self.selection = None;
        }
        true
    }

    /// Append a track to the active timeline.
    pub fn add_track(&mut self, title: Option<&str>) -> Option<TrackId> {
        let title = title.unwrap_or(&self.config.default_track_title).to_string();
        let timeline = self.project.active_timeline_mut()?;
        let id = timeline.add_track(title);
        self.queue.emit(TrackEvent::TrackAdded(id));
        self.drain();
        Some(id)
    }

    /// Add a default tack starting at `frame`, if no tack covers it.
    pub fn add_tack(&mut self, track: TrackId, frame: Frame) -> Option<TackId> {
        let title = self.config.default_tack_title.clone();
        let span = self.config.default_tack_span;
        let row = self.project.active_timeline_mut()?.track_mut(track)?;
        if !row.can_add_tack_at(frame) {
            debug!(track = %track, frame, "Frame occupied, tack not added");
            return None;
        }
        let id = row.add_tack(title, frame, span);
        self.queue.emit(TrackEvent::TackAdded(id));
        self.drain();
        Some(id)
    }

    /// Soft-delete a track or tack of the active timeline.
    pub fn delete(&mut self, id: ObjectId) -> bool {
        let Some(timeline) = self.project.active_timeline_mut() else {
            return false;
        };
        if !timeline.delete(id) {
            return false;
        }
        self.queue.emit(TrackEvent::Deleted(id));
        self.drain();
        true
    }

    pub fn set_title(&mut self, id: ObjectId, title: &str) -> bool {
        let Some(timeline) = self.project.active_timeline_mut() else {
            return false;
        };
        let renamed = timeline.set_title(id, title, &mut self.queue);
        self.drain();
        renamed
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn start_frame_of(&self, id: ObjectId) -> Option<Frame> {
        self.timeline()?.start_frame_of(id)
    }

    pub fn can_add_tack_at(&self, track: TrackId, frame: Frame) -> bool {
        self.timeline()
            .and_then(|t| t.track(track))
            .is_some_and(|t| t.can_add_tack_at(frame))
    }

    /// Live track under a y coordinate in timeline pixels.
    pub fn track_at_y(&self, y: f32) -> Option<TrackId> {
        self.timeline()?
            .track_at_y(y, self.config.track_height, self.config.track_spacing)
    }

    pub fn total_height(&self) -> f32 {
        self.timeline().map_or(0.0, |t| {
            t.total_height(self.config.track_height, self.config.track_spacing)
        })
    }

    // ── Event loop ─────────────────────────────────────────────

    fn drain(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            self.react(event);
            self.listener.on_event(&event, &self.project);
        }
    }

    fn react(&mut self, event: TrackEvent) {
        match event {
            TrackEvent::Selected(id) => {
                let Some(timeline) = self.project.active_timeline_mut() else {
                    return;
                };
                if timeline.activate_only(id) {
                    debug!(object = %id, "Selected");
                    self.selection = Some(id);
                } else {
                    warn!(object = %id, "Selection of unknown object ignored");
                    self.selection = None;
                }
            }
            TrackEvent::Unselected => {
                if let Some(timeline) = self.project.active_timeline_mut() {
                    timeline.deactivate_all();
                }
                self.selection = None;
            }
            TrackEvent::Moving(tack) => {
                if let Some(timeline) = self.project.active_timeline_mut() {
                    timeline.set_moving(tack);
                }
            }
            TrackEvent::MovedAfterCommit(tack) => {
                if let Some(track) = self
                    .project
                    .active_timeline_mut()
                    .and_then(|t| t.track_of_tack_mut(tack))
                {
                    track.resolve_overlaps(tack, &mut self.queue);
                }
            }
            TrackEvent::Deleted(_) => {
                // Covers tacks that disappeared along with a deleted track.
                let stale = self
                    .selection
                    .is_some_and(|id| !self.timeline().is_some_and(|t| t.contains(id)));
                if stale {
                    self.selection = None;
                }
            }
            _ => {}
        }
    }
}
