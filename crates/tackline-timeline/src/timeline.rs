//! Timelines: an ordered stack of tracks.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tackline_core::Frame;

use crate::events::{EventSink, TrackEvent};
use crate::ids::{ObjectId, TackId, TimelineId, TrackId};
use crate::tack::Tack;
use crate::track::Track;

/// An editable document: tracks stacked top to bottom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    /// Unique timeline ID
    pub id: TimelineId,
    /// Timeline title
    pub title: String,
    /// Tracks, top first, including soft-deleted ones
    pub tracks: Vec<Track>,
    /// The timeline currently being edited
    #[serde(default)]
    pub active: bool,
    #[serde(default = "default_exists")]
    pub exists: bool,
}

fn default_exists() -> bool {
    true
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TimelineId::new(),
            title: title.into(),
            tracks: Vec::new(),
            active: false,
            exists: true,
        }
    }

    // ── Tracks ─────────────────────────────────────────────────

    /// Tracks that have not been deleted, top first.
    pub fn live_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.exists)
    }

    pub fn live_tracks_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.iter_mut().filter(|t| t.exists)
    }

    /// IDs of the live tracks, top first.
    pub fn track_order(&self) -> Vec<TrackId> {
        self.live_tracks().map(|t| t.id).collect()
    }

    pub fn first_track(&self) -> Option<&Track> {
        self.live_tracks().next()
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.live_tracks().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.live_tracks_mut().find(|t| t.id == id)
    }

    /// Live track directly above `id`.
    pub fn track_above(&self, id: TrackId) -> Option<&Track> {
        let live: Vec<&Track> = self.live_tracks().collect();
        let index = live.iter().position(|t| t.id == id)?;
        index.checked_sub(1).map(|i| live[i])
    }

    /// Live track directly below `id`.
    pub fn track_below(&self, id: TrackId) -> Option<&Track> {
        let live: Vec<&Track> = self.live_tracks().collect();
        let index = live.iter().position(|t| t.id == id)?;
        live.get(index + 1).copied()
    }

    /// Append a track at the bottom. Returns its ID.
    pub fn add_track(&mut self, title: impl Into<String>) -> TrackId {
        let track = Track::new(title);
        let id = track.id;
        debug!(timeline = %self.id, track = %id, "Track added");
        self.tracks.push(track);
        id
    }

    // ── Tacks ──────────────────────────────────────────────────

    /// Live track holding the live tack `id`.
    pub fn track_of_tack(&self, id: TackId) -> Option<&Track> {
        self.live_tracks().find(|t| t.tack(id).is_some())
    }

    pub fn track_of_tack_mut(&mut self, id: TackId) -> Option<&mut Track> {
        self.live_tracks_mut().find(|t| t.tack(id).is_some())
    }

    pub fn tack(&self, id: TackId) -> Option<&Tack> {
        self.live_tracks().find_map(|t| t.tack(id))
    }

    pub fn tack_mut(&mut self, id: TackId) -> Option<&mut Tack> {
        self.live_tracks_mut().find_map(|t| t.tack_mut(id))
    }

    // ── Objects ────────────────────────────────────────────────

    /// Whether `id` names a live track or a live tack on a live track.
    pub fn contains(&self, id: ObjectId) -> bool {
        match id {
            ObjectId::Track(track) => self.track(track).is_some(),
            ObjectId::Tack(tack) => self.tack(tack).is_some(),
        }
    }

    /// Start frame of a tack. Tracks have none.
    pub fn start_frame_of(&self, id: ObjectId) -> Option<Frame> {
        id.as_tack().and_then(|tack| self.tack(tack)).map(Tack::start)
    }

    /// Track that `id` is or lives on.
    pub fn row_of(&self, id: ObjectId) -> Option<TrackId> {
        match id {
            ObjectId::Track(track) => self.track(track).map(|t| t.id),
            ObjectId::Tack(tack) => self.track_of_tack(tack).map(|t| t.id),
        }
    }

    /// Soft-delete a track or tack. Returns false if it is not live.
    pub fn delete(&mut self, id: ObjectId) -> bool {
        match id {
            ObjectId::Track(track_id) => match self.track_mut(track_id) {
                Some(track) => {
                    track.exists = false;
                    track.deactivate_all();
                    debug!(track = %track_id, "Track deleted");
                    true
                }
                None => {
                    warn!(track = %track_id, "Delete of unknown track ignored");
                    false
                }
            },
            ObjectId::Tack(tack_id) => match self.track_of_tack_mut(tack_id) {
                Some(track) => track.delete_tack(tack_id),
                None => {
                    warn!(tack = %tack_id, "Delete of unknown tack ignored");
                    false
                }
            },
        }
    }

    /// Rename a track or tack, bracketing the change with title events.
    pub fn set_title(&mut self, id: ObjectId, title: impl Into<String>, sink: &mut impl EventSink) -> bool {
        let slot = match id {
            ObjectId::Track(track) => self.track_mut(track).map(|t| &mut t.title),
            ObjectId::Tack(tack) => self.tack_mut(tack).map(|t| &mut t.title),
        };
        let Some(slot) = slot else {
            warn!(object = %id, "Rename of unknown object ignored");
            return false;
        };
        sink.emit(TrackEvent::BeforeTitleSave(id));
        *slot = title.into();
        sink.emit(TrackEvent::TitleSaved(id));
        true
    }

    // ── Activation ─────────────────────────────────────────────

    /// Activate `id` and deactivate everything else. Returns false (leaving
    /// everything inactive) if `id` is not live.
    pub fn activate_only(&mut self, id: ObjectId) -> bool {
        let mut found = false;
        for track in self.live_tracks_mut() {
            found |= track.activate_only(id);
        }
        found
    }

    pub fn deactivate_all(&mut self) {
        for track in &mut self.tracks {
            track.deactivate_all();
        }
    }

    /// Mark `tack` as the one receiving pointer events on its track.
    pub fn set_moving(&mut self, tack: TackId) -> bool {
        match self.track_of_tack_mut(tack) {
            Some(track) => {
                track.set_moving(tack);
                true
            }
            None => false,
        }
    }

    // ── Layout ─────────────────────────────────────────────────

    /// Height of all live track rows, with `spacing` between rows.
    pub fn total_height(&self, track_height: f32, spacing: f32) -> f32 {
        let rows = self.live_tracks().count();
        if rows == 0 {
            return 0.0;
        }
        rows as f32 * track_height + (rows - 1) as f32 * spacing
    }

    /// Live track whose row contains `y`. Gaps between rows hit nothing.
    pub fn track_at_y(&self, y: f32, track_height: f32, spacing: f32) -> Option<TrackId> {
        if y < 0.0 {
            return None;
        }
        let pitch = track_height + spacing;
        let row = (y / pitch).floor() as usize;
        if y - row as f32 * pitch >= track_height {
            return None;
        }
        self.live_tracks().nth(row).map(|t| t.id)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new("New Timeline")
    }
}
