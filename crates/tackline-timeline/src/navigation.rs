//! Keyboard navigation between tracks and tacks.
//!
//! Every function here is a pure query over a [`Timeline`]: it decides what
//! should become selected and leaves emitting the selection to the caller.

use serde::{Deserialize, Serialize};

use tackline_core::Frame;

use crate::ids::{ObjectId, TrackId};
use crate::timeline::Timeline;
use crate::track::Track;

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Result of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Select(ObjectId),
    Unselect,
    /// Nothing to do.
    Stay,
}

impl From<Option<ObjectId>> for Navigation {
    fn from(target: Option<ObjectId>) -> Self {
        target.map_or(Self::Stay, Self::Select)
    }
}

/// Decide the next selection from the `active` object, moving in
/// `direction`. `cursor` is the playhead frame, used when nothing is active.
pub fn navigate(
    timeline: &Timeline,
    active: Option<ObjectId>,
    direction: Direction,
    cursor: Frame,
) -> Navigation {
    match (direction, active) {
        (Direction::Up, Some(id)) if is_top_row(timeline, id) => Navigation::Unselect,
        (Direction::Up, Some(id)) => above(timeline, id).into(),
        (Direction::Down, Some(id)) => below(timeline, id).into(),
        (Direction::Down, None) => at_frame(timeline, cursor).into(),
        (Direction::Right, Some(id)) => next(timeline, id).into(),
        (Direction::Left, Some(id)) => previous(timeline, id).into(),
        (_, None) => Navigation::Stay,
    }
}

/// Right: enter a track, or step to the next tack on the same track.
pub fn next(timeline: &Timeline, active: ObjectId) -> Option<ObjectId> {
    match active {
        ObjectId::Track(id) => timeline.track(id).map(Track::first_or_self),
        ObjectId::Tack(id) => timeline
            .track_of_tack(id)
            .and_then(|track| track.next_of(id))
            .map(ObjectId::Tack),
    }
}

/// Left: step to the previous tack, or up to the owning track from the
/// earliest tack. No-op on a track.
pub fn previous(timeline: &Timeline, active: ObjectId) -> Option<ObjectId> {
    match active {
        ObjectId::Track(_) => None,
        ObjectId::Tack(id) => timeline.track_of_tack(id).and_then(|track| track.previous_of(id)),
    }
}

/// Up: the adjacent track above.
pub fn above(timeline: &Timeline, active: ObjectId) -> Option<ObjectId> {
    vertical(timeline, active, Timeline::track_above)
}

/// Down: the adjacent track below.
pub fn below(timeline: &Timeline, active: ObjectId) -> Option<ObjectId> {
    vertical(timeline, active, Timeline::track_below)
}

/// The tack near `frame` on the first track, or that track when it is empty.
pub fn at_frame(timeline: &Timeline, frame: Frame) -> Option<ObjectId> {
    timeline.first_track().map(|track| near_frame_or_track(track, frame))
}

/// Whether `active` is the first live track or sits on it.
pub fn is_top_row(timeline: &Timeline, active: ObjectId) -> bool {
    match (timeline.first_track(), timeline.row_of(active)) {
        (Some(first), Some(row)) => first.id == row,
        _ => false,
    }
}

fn vertical<'a>(
    timeline: &'a Timeline,
    active: ObjectId,
    neighbour: fn(&'a Timeline, TrackId) -> Option<&'a Track>,
) -> Option<ObjectId> {
    match active {
        ObjectId::Track(id) => neighbour(timeline, id).map(Track::object_id),
        ObjectId::Tack(id) => {
            let start = timeline.tack(id)?.start();
            let row = timeline.track_of_tack(id)?;
            neighbour(timeline, row.id).map(|track| near_frame_or_track(track, start))
        }
    }
}

fn near_frame_or_track(track: &Track, frame: Frame) -> ObjectId {
    track
        .tack_near_frame(frame)
        .map(ObjectId::Tack)
        .unwrap_or_else(|| track.object_id())
}
