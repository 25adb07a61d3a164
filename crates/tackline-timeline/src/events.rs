//! Editor notifications.
//!
//! Model components never call the host directly. They write [`TrackEvent`]s
//! into an [`EventSink`] supplied by the caller; the [`Editor`](crate::Editor)
//! owns the queue, reacts to each event, and forwards it to its
//! [`EditorListener`].

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use tackline_core::Span;

use crate::ids::{ObjectId, TackId, TimelineId, TrackId};
use crate::project::Project;

/// A notification emitted while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum TrackEvent {
    /// An object became the single active object.
    Selected(ObjectId),
    /// The selection was cleared.
    Unselected,
    /// A tack is being dragged.
    Moving(TackId),
    /// A drag is about to be applied. `before` is the span prior to the commit.
    Moved { tack: TackId, before: Span },
    /// A drag has been applied; overlap resolution follows.
    MovedAfterCommit(TackId),
    /// An object was soft-deleted.
    Deleted(ObjectId),
    BeforeTitleSave(ObjectId),
    TitleSaved(ObjectId),
    TimelineAdded(TimelineId),
    TrackAdded(TrackId),
    TackAdded(TackId),
    /// An object was reshaped as a side effect of another edit.
    Updated(ObjectId),
}

/// Destination for events produced by model operations.
pub trait EventSink {
    fn emit(&mut self, event: TrackEvent);
}

impl EventSink for Vec<TrackEvent> {
    fn emit(&mut self, event: TrackEvent) {
        self.push(event);
    }
}

impl EventSink for VecDeque<TrackEvent> {
    fn emit(&mut self, event: TrackEvent) {
        self.push_back(event);
    }
}

/// Host-side observer of editor notifications.
///
/// Called once per event, after the editor has applied its own reaction, with
/// a read-only view of the project.
pub trait EditorListener {
    fn on_event(&mut self, event: &TrackEvent, project: &Project);
}

impl<F> EditorListener for F
where
    F: FnMut(&TrackEvent, &Project),
{
    fn on_event(&mut self, event: &TrackEvent, project: &Project) {
        self(event, project)
    }
}

/// Listener that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullListener;

impl EditorListener for NullListener {
    fn on_event(&mut self, _event: &TrackEvent, _project: &Project) {}
}

/// Listener that records every event it sees.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<TrackEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<TrackEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn contains(&self, event: &TrackEvent) -> bool {
        self.events.contains(event)
    }
}

impl EditorListener for EventLog {
    fn on_event(&mut self, event: &TrackEvent, _project: &Project) {
        self.events.push(*event);
    }
}
