//! Editing scripts: a JSON list of input steps replayed through an [`Editor`].
//!
//! Tracks are addressed by their index among the live tracks of the active
//! timeline, tacks by their index among the live tacks of that track.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use tackline_core::Frame;
use tackline_timeline::{
    Direction, Editor, EditorListener, ObjectId, PointerEvent, PointerKind, TrackId,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).context("Failed to parse script")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddTimeline {
        #[serde(default)]
        title: Option<String>,
    },
    AddTrack {
        #[serde(default)]
        title: Option<String>,
    },
    AddTack {
        track: usize,
        frame: Frame,
    },
    /// Pointer event in track-local pixels.
    Pointer {
        track: usize,
        kind: PointerKind,
        x: f32,
        #[serde(default)]
        y: f32,
    },
    Ruler {
        kind: PointerKind,
        x: f32,
    },
    Key {
        direction: Direction,
    },
    Scroll {
        dx: f32,
    },
    Viewport {
        width: f32,
    },
    Select {
        track: usize,
        #[serde(default)]
        tack: Option<usize>,
    },
    Deselect,
    Delete {
        track: usize,
        #[serde(default)]
        tack: Option<usize>,
    },
    Rename {
        track: usize,
        #[serde(default)]
        tack: Option<usize>,
        title: String,
    },
    /// Force-commit in-flight drags.
    Commit,
}

/// Replay every step in order. Returns the number of steps applied.
pub fn run<L: EditorListener>(editor: &mut Editor<L>, script: &Script) -> Result<usize> {
    for (index, step) in script.steps.iter().enumerate() {
        debug!(index, ?step, "Applying step");
        apply(editor, step).with_context(|| format!("Step {index} failed"))?;
    }
    Ok(script.steps.len())
}

fn apply<L: EditorListener>(editor: &mut Editor<L>, step: &Step) -> Result<()> {
    match step {
        Step::AddTimeline { title } => {
            editor.add_timeline(title.as_deref());
        }
        Step::AddTrack { title } => {
            editor
                .add_track(title.as_deref())
                .context("No active timeline")?;
        }
        Step::AddTack { track, frame } => {
            let track = track_at(editor, *track)?;
            if editor.add_tack(track, *frame).is_none() {
                warn!(track = %track, frame, "Frame occupied, tack skipped");
            }
        }
        Step::Pointer { track, kind, x, y } => {
            let track = track_at(editor, *track)?;
            editor.pointer(track, PointerEvent::new(*kind, *x, *y));
        }
        Step::Ruler { kind, x } => editor.ruler_pointer(PointerEvent::new(*kind, *x, 0.0)),
        Step::Key { direction } => editor.key(*direction),
        Step::Scroll { dx } => editor.scroll_by(*dx),
        Step::Viewport { width } => editor.set_viewport_width(*width)?,
        Step::Select { track, tack } => {
            let id = object_at(editor, *track, *tack)?;
            editor.select(id);
        }
        Step::Deselect => editor.deselect(),
        Step::Delete { track, tack } => {
            let id = object_at(editor, *track, *tack)?;
            editor.delete(id);
        }
        Step::Rename { track, tack, title } => {
            let id = object_at(editor, *track, *tack)?;
            editor.set_title(id, title);
        }
        Step::Commit => {
            editor.commit_pending();
        }
    }
    Ok(())
}

fn track_at<L: EditorListener>(editor: &Editor<L>, index: usize) -> Result<TrackId> {
    let Some(timeline) = editor.timeline() else {
        bail!("No active timeline");
    };
    timeline
        .live_tracks()
        .nth(index)
        .map(|t| t.id)
        .with_context(|| format!("No track at index {index}"))
}

fn object_at<L: EditorListener>(
    editor: &Editor<L>,
    track: usize,
    tack: Option<usize>,
) -> Result<ObjectId> {
    let track_id = track_at(editor, track)?;
    let Some(index) = tack else {
        return Ok(ObjectId::Track(track_id));
    };
    editor
        .timeline()
        .and_then(|t| t.track(track_id))
        .and_then(|t| t.live_tacks().nth(index))
        .map(|t| ObjectId::Tack(t.id))
        .with_context(|| format!("No tack at index {index} on track {track}"))
}
