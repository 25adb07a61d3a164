//! Project: the set of timelines open in the editor.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ids::TimelineId;
use crate::timeline::Timeline;

/// Timelines loaded in the editor. At most one is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Timelines, including soft-deleted ones
    pub timelines: Vec<Timeline>,
}

impl Project {
    /// Create a new empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            timelines: Vec::new(),
        }
    }

    pub fn live_timelines(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines.iter().filter(|t| t.exists)
    }

    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.live_timelines().find(|t| t.id == id)
    }

    pub fn timeline_mut(&mut self, id: TimelineId) -> Option<&mut Timeline> {
        self.timelines.iter_mut().find(|t| t.exists && t.id == id)
    }

    /// Add a timeline. It becomes active when no other timeline is.
    pub fn add_timeline(&mut self, mut timeline: Timeline) -> TimelineId {
        let id = timeline.id;
        timeline.active = self.active_timeline().is_none();
        debug!(timeline = %id, active = timeline.active, "Timeline added");
        self.timelines.push(timeline);
        id
    }

    /// Get the active timeline.
    pub fn active_timeline(&self) -> Option<&Timeline> {
        self.live_timelines().find(|t| t.active)
    }

    /// Get the active timeline mutably.
    pub fn active_timeline_mut(&mut self) -> Option<&mut Timeline> {
        self.timelines.iter_mut().find(|t| t.exists && t.active)
    }

    /// Make `id` the active timeline. Returns false if it is not live.
    pub fn set_active_timeline(&mut self, id: TimelineId) -> bool {
        if self.timeline(id).is_none() {
            warn!(timeline = %id, "Activation of unknown timeline ignored");
            return false;
        }
        for timeline in &mut self.timelines {
            timeline.active = timeline.id == id;
        }
        true
    }

    /// Soft-delete a timeline. If it was active, the first remaining live
    /// timeline takes over.
    pub fn delete_timeline(&mut self, id: TimelineId) -> bool {
        let Some(timeline) = self.timeline_mut(id) else {
            warn!(timeline = %id, "Delete of unknown timeline ignored");
            return false;
        };
        let was_active = timeline.active;
        timeline.exists = false;
        timeline.active = false;

        if was_active {
            if let Some(next) = self.timelines.iter_mut().find(|t| t.exists) {
                next.active = true;
            }
        }
        true
    }

    /// Restore the parent references of every tack after loading.
    pub fn relink(&mut self) {
        for timeline in &mut self.timelines {
            for track in &mut timeline.tracks {
                let track_id = track.id;
                for tack in &mut track.tacks {
                    tack.track = track_id;
                }
            }
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}
