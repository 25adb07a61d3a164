//! Property tests for the editing invariants.

use proptest::prelude::*;

use tackline_core::{EditorConfig, Frame, Span};
use tackline_timeline::{
    Editor, NullListener, PointerEvent, Project, TackId, Timeline, Track, TrackEvent, TrackId,
};

// ── Helpers ────────────────────────────────────────────────────

const FRAME_WIDTH: f32 = 10.0;

fn config() -> EditorConfig {
    EditorConfig {
        frame_width: FRAME_WIDTH,
        viewport_width: 10_000.0,
        ..Default::default()
    }
}

fn editor_with(spans: &[(Frame, Frame)]) -> (Editor, TrackId, Vec<TackId>) {
    let mut timeline = Timeline::new("prop");
    let track = timeline.add_track("row");
    let row = timeline.track_mut(track).unwrap();
    let ids = spans
        .iter()
        .map(|&(start, duration)| row.add_tack("t", start, duration))
        .collect();
    let mut project = Project::new("prop");
    project.add_timeline(timeline);
    (Editor::new(project, config(), NullListener).unwrap(), track, ids)
}

fn live_spans(track: &Track) -> Vec<Span> {
    track.live_tacks().map(|t| t.span()).collect()
}

fn drag(editor: &mut Editor, track: TrackId, from: f32, to: f32) {
    editor.pointer(track, PointerEvent::down(from, 5.0));
    editor.pointer(track, PointerEvent::moved(from + 1.0, 5.0));
    editor.pointer(track, PointerEvent::moved(to, 5.0));
    editor.pointer(track, PointerEvent::up(to, 5.0));
}

fn span_strategy() -> impl Strategy<Value = (Frame, Frame)> {
    (0..200i64, 1..30i64)
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn commits_keep_spans_valid(
        spans in prop::collection::vec(span_strategy(), 1..6),
        pick in any::<prop::sample::Index>(),
        grab in 0.0f32..1.0,
        target in -300.0f32..3000.0,
    ) {
        let (mut editor, track, ids) = editor_with(&spans);
        let tack = ids[pick.index(ids.len())];
        let span = editor.timeline().unwrap().tack(tack).unwrap().span();
        let from = (span.start as f32 + grab * span.duration as f32) * FRAME_WIDTH;

        drag(&mut editor, track, from, target);

        let row = editor.timeline().unwrap().track(track).unwrap();
        for tack in row.live_tacks() {
            prop_assert!(tack.start() >= 0);
            prop_assert!(tack.duration() >= 1);
        }
        prop_assert!(row.moving().is_empty());
    }

    #[test]
    fn body_drag_there_and_back(start in 0..100i64, duration in 3..20i64, k in 0..50i64) {
        let (mut editor, track, ids) = editor_with(&[(start, duration)]);
        let centre = (start as f32 + duration as f32 / 2.0) * FRAME_WIDTH;
        let shift = k as f32 * FRAME_WIDTH;

        drag(&mut editor, track, centre, centre + shift);
        drag(&mut editor, track, centre + shift, centre);

        let span = editor.timeline().unwrap().tack(ids[0]).unwrap().span();
        prop_assert_eq!(span, Span::new(start, duration));
    }

    #[test]
    fn resolution_is_idempotent(
        spans in prop::collection::vec(span_strategy(), 1..8),
        pick in any::<prop::sample::Index>(),
        moved in span_strategy(),
    ) {
        let mut track = Track::new("row");
        let ids: Vec<TackId> = spans
            .iter()
            .map(|&(start, duration)| track.add_tack("t", start, duration))
            .collect();
        let target = ids[pick.index(ids.len())];
        track.tack_mut(target).unwrap().set_span(moved.0, moved.1);

        let mut events: Vec<TrackEvent> = Vec::new();
        track.resolve_overlaps(target, &mut events);
        let once = live_spans(&track);

        let mut again: Vec<TrackEvent> = Vec::new();
        prop_assert_eq!(track.resolve_overlaps(target, &mut again), 0);
        prop_assert!(again.is_empty());
        prop_assert_eq!(live_spans(&track), once);

        let moved_span = track.tack(target).unwrap().span();
        for other in track.live_tacks().filter(|t| t.id != target) {
            prop_assert!(!moved_span.intersects(other.span()));
        }
    }
}
