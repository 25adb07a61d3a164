//! Integration tests for pointer editing, overlap resolution and navigation.
//!
//! Every scenario goes through `Editor`, so gestures, the event queue, the
//! editor's own reactions and the host listener are exercised together.

use tackline_core::{EditorConfig, Frame, FrameScale, Span};
use tackline_timeline::{
    Direction, DragMode, Editor, EventLog, ObjectId, PointerEvent, Project, TackId, Timeline, TrackEvent,
    TrackId,
};

// ── Helpers ────────────────────────────────────────────────────

fn config() -> EditorConfig {
    EditorConfig {
        frame_width: 10.0,
        viewport_width: 400.0,
        ..Default::default()
    }
}

/// One timeline whose tracks hold tacks with the given `(start, duration)`.
fn project_with(rows: &[&[(Frame, Frame)]]) -> (Project, Vec<TrackId>, Vec<Vec<TackId>>) {
    let mut timeline = Timeline::new("Scenario");
    let mut tracks = Vec::new();
    let mut tacks = Vec::new();
    for (i, spans) in rows.iter().enumerate() {
        let id = timeline.add_track(format!("Row {i}"));
        let row = timeline.track_mut(id).unwrap();
        tacks.push(
            spans
                .iter()
                .enumerate()
                .map(|(k, &(start, duration))| row.add_tack(format!("t{k}"), start, duration))
                .collect(),
        );
        tracks.push(id);
    }
    let mut project = Project::new("Scenario");
    project.add_timeline(timeline);
    (project, tracks, tacks)
}

fn editor_with(rows: &[&[(Frame, Frame)]]) -> (Editor<EventLog>, Vec<TrackId>, Vec<Vec<TackId>>) {
    let (project, tracks, tacks) = project_with(rows);
    let editor = Editor::new(project, config(), EventLog::new()).unwrap();
    (editor, tracks, tacks)
}

/// Press at `from`, nudge to promote the grab, move to `to` and release.
fn drag<L: tackline_timeline::EditorListener>(
    editor: &mut Editor<L>,
    track: TrackId,
    from: f32,
    to: f32,
) {
    editor.pointer(track, PointerEvent::down(from, 5.0));
    editor.pointer(track, PointerEvent::moved(from + 1.0, 5.0));
    editor.pointer(track, PointerEvent::moved(to, 5.0));
    editor.pointer(track, PointerEvent::up(to, 5.0));
}

fn span_of<L: tackline_timeline::EditorListener>(editor: &Editor<L>, tack: TackId) -> Option<Span> {
    editor.timeline()?.tack(tack).map(|t| t.span())
}

// ── Overlap resolution ─────────────────────────────────────────

#[test]
fn moving_over_a_tack_swallows_it() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 10), (5, 5)]]);
    let (a, b) = (tacks[0][0], tacks[0][1]);

    drag(&mut editor, tracks[0], 50.0, 80.0);

    assert_eq!(span_of(&editor, a), Some(Span::new(3, 10)));
    assert_eq!(span_of(&editor, b), None);

    // The deleted tack is retained in storage.
    let track = editor.timeline().unwrap().track(tracks[0]).unwrap();
    assert_eq!(track.tacks.len(), 2);
    assert_eq!(track.live_count(), 1);

    let events = editor.listener_mut().drain();
    let moved = events
        .iter()
        .position(|e| {
            *e == TrackEvent::Moved {
                tack: a,
                before: Span::new(0, 10),
            }
        })
        .unwrap();
    assert_eq!(events[moved + 1], TrackEvent::MovedAfterCommit(a));
    assert_eq!(events[moved + 2], TrackEvent::Deleted(ObjectId::Tack(b)));
}

#[test]
fn head_overlap_keeps_the_tail() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 5), (3, 5)]]);
    let (a, b) = (tacks[0][0], tacks[0][1]);

    drag(&mut editor, tracks[0], 25.0, 45.0);

    assert_eq!(span_of(&editor, a), Some(Span::new(2, 5)));
    assert_eq!(span_of(&editor, b), Some(Span::new(7, 1)));
    assert!(editor
        .listener()
        .contains(&TrackEvent::Updated(ObjectId::Tack(b))));
}

#[test]
fn moving_set_keeps_neighbours_out_of_the_drag() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 5), (6, 5)]]);
    let (a, b) = (tacks[0][0], tacks[0][1]);

    // Release lands over B; only A may see it.
    drag(&mut editor, tracks[0], 25.0, 70.0);

    assert_eq!(span_of(&editor, a), Some(Span::new(4, 5)));
    assert_eq!(span_of(&editor, b), Some(Span::new(9, 2)));
    assert_eq!(editor.selection(), Some(ObjectId::Tack(a)));
    assert!(editor.timeline().unwrap().track(tracks[0]).unwrap().moving().is_empty());
}

#[test]
fn second_resolution_changes_nothing() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 10), (8, 10), (30, 4)]]);
    let a = tacks[0][0];
    drag(&mut editor, tracks[0], 50.0, 80.0);

    let before: Vec<Span> = editor
        .timeline()
        .unwrap()
        .track(tracks[0])
        .unwrap()
        .live_tacks()
        .map(|t| t.span())
        .collect();
    editor.listener_mut().drain();

    assert!(editor.resolve_overlaps(a));
    let after: Vec<Span> = editor
        .timeline()
        .unwrap()
        .track(tracks[0])
        .unwrap()
        .live_tacks()
        .map(|t| t.span())
        .collect();
    assert_eq!(before, after);
    assert!(editor.listener().events.is_empty());
}

// ── Gestures ───────────────────────────────────────────────────

#[test]
fn snap_threshold_rounds_drag_up() {
    let (project, tracks, tacks) = project_with(&[&[(0, 10)]]);
    let mut editor = Editor::new(project, EditorConfig::default(), EventLog::new()).unwrap();
    let width = editor.config().frame_width;
    assert_eq!(
        FrameScale::new(width, 0.5).unwrap().frames_for_distance(width * 2.6),
        3
    );

    drag(&mut editor, tracks[0], 100.0, 100.0 + width * 2.6);
    assert_eq!(span_of(&editor, tacks[0][0]), Some(Span::new(3, 10)));
}

#[test]
fn click_without_move_selects_without_commit() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 5)]]);
    editor.pointer(tracks[0], PointerEvent::down(25.0, 5.0));
    editor.pointer(tracks[0], PointerEvent::up(25.0, 5.0));

    assert_eq!(editor.selection(), Some(ObjectId::Tack(tacks[0][0])));
    assert!(!editor
        .listener()
        .events
        .iter()
        .any(|e| matches!(e, TrackEvent::Moved { .. })));
    assert_eq!(span_of(&editor, tacks[0][0]), Some(Span::new(0, 5)));
}

#[test]
fn leaving_bounds_commits_last_offset() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(10, 5)]]);
    let track = tracks[0];
    editor.pointer(track, PointerEvent::down(125.0, 5.0));
    editor.pointer(track, PointerEvent::moved(126.0, 5.0));
    editor.pointer(track, PointerEvent::moved(105.0, 5.0));
    editor.pointer(track, PointerEvent::moved(-5.0, 5.0));

    assert_eq!(span_of(&editor, tacks[0][0]), Some(Span::new(8, 5)));
    assert!(editor
        .listener()
        .contains(&TrackEvent::MovedAfterCommit(tacks[0][0])));

    // The release is no longer part of the drag.
    editor.pointer(track, PointerEvent::up(-5.0, 5.0));
    assert_eq!(editor.selection(), Some(ObjectId::Track(track)));
}

#[test]
fn start_handle_cannot_cross_the_end() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(2, 4)]]);
    // Start handle spans x 20..30.
    drag(&mut editor, tracks[0], 22.0, 200.0);
    assert_eq!(span_of(&editor, tacks[0][0]), Some(Span::new(5, 1)));
}

#[test]
fn end_handle_never_shrinks_below_one_frame() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(5, 4)]]);
    // End handle spans x 80..90.
    drag(&mut editor, tracks[0], 85.0, 5.0);
    assert_eq!(span_of(&editor, tacks[0][0]), Some(Span::new(5, 1)));
}

#[test]
fn release_over_neighbour_finishes_the_grab() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 5), (5, 5)]]);
    let (a, b) = (tacks[0][0], tacks[0][1]);
    let track = tracks[0];

    // Grab B, promote while over A, release over A.
    editor.pointer(track, PointerEvent::down(75.0, 5.0));
    editor.pointer(track, PointerEvent::moved(45.0, 5.0));
    editor.pointer(track, PointerEvent::up(45.0, 5.0));

    let timeline = editor.timeline().unwrap();
    assert_eq!(timeline.tack(a).unwrap().drag_mode(), DragMode::Idle);
    assert_eq!(timeline.tack(b).unwrap().drag_mode(), DragMode::Idle);
    assert_eq!(editor.selection(), Some(ObjectId::Tack(b)));
    assert!(editor.listener().contains(&TrackEvent::MovedAfterCommit(b)));

    // Hovering afterwards drags nothing.
    let scale = editor.config().frame_scale().unwrap();
    editor.pointer(track, PointerEvent::moved(300.0, 5.0));
    let tack = editor.timeline().unwrap().tack(b).unwrap();
    assert_eq!(tack.drag_mode(), DragMode::Idle);
    assert_eq!(tack.preview_span(scale), Span::new(5, 5));
    assert_eq!(span_of(&editor, a), Some(Span::new(0, 5)));
}

#[test]
fn deleting_a_dragged_tack_releases_the_track() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 5), (10, 5)]]);
    let (a, b) = (tacks[0][0], tacks[0][1]);
    let track = tracks[0];

    editor.pointer(track, PointerEvent::down(125.0, 5.0));
    editor.pointer(track, PointerEvent::moved(126.0, 5.0));
    editor.pointer(track, PointerEvent::moved(135.0, 5.0));
    assert_eq!(
        editor.timeline().unwrap().track(track).unwrap().moving(),
        &[b]
    );

    assert!(editor.delete(ObjectId::Tack(b)));
    assert!(editor
        .timeline()
        .unwrap()
        .track(track)
        .unwrap()
        .moving()
        .is_empty());

    drag(&mut editor, track, 25.0, 55.0);
    assert_eq!(span_of(&editor, a), Some(Span::new(3, 5)));
}

#[test]
fn listener_sees_resolved_state() {
    let (project, tracks, _) = project_with(&[&[(0, 10), (5, 5)]]);
    let mut live_at_commit = Vec::new();
    {
        let listener = |event: &TrackEvent, project: &Project| {
            if let TrackEvent::MovedAfterCommit(_) = event {
                let track = project.active_timeline().unwrap().first_track().unwrap();
                live_at_commit.push(track.live_count());
            }
        };
        let mut editor = Editor::new(project, config(), listener).unwrap();
        drag(&mut editor, tracks[0], 50.0, 80.0);
    }
    assert_eq!(live_at_commit, vec![1]);
}

// ── Structure ──────────────────────────────────────────────────

#[test]
fn deleted_tack_frees_its_frames() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 10)]]);
    assert!(!editor.can_add_tack_at(tracks[0], 4));
    assert!(editor.add_tack(tracks[0], 4).is_none());

    assert!(editor.delete(ObjectId::Tack(tacks[0][0])));
    assert!(editor.can_add_tack_at(tracks[0], 4));
    let added = editor.add_tack(tracks[0], 4).unwrap();
    assert_eq!(span_of(&editor, added), Some(Span::new(4, 10)));
    assert!(!editor.can_add_tack_at(tracks[0], -1));
}

#[test]
fn deleting_active_timeline_hands_over() {
    let mut editor = Editor::new(Project::new("p"), config(), EventLog::new()).unwrap();
    let first = editor.add_timeline(Some("One"));
    let second = editor.add_timeline(None);
    assert_eq!(editor.timeline().unwrap().id, first);

    assert!(editor.delete_timeline(first));
    let active = editor.timeline().unwrap();
    assert_eq!(active.id, second);
    assert_eq!(active.title, "New Timeline");
}

#[test]
fn track_geometry_queries() {
    let (editor, tracks, _) = editor_with(&[&[], &[], &[]]);
    // Rows of 64 px separated by 4 px.
    assert_eq!(editor.total_height(), 3.0 * 64.0 + 2.0 * 4.0);
    assert_eq!(editor.track_at_y(10.0), Some(tracks[0]));
    assert_eq!(editor.track_at_y(70.0), Some(tracks[1]));
    assert_eq!(editor.track_at_y(1000.0), None);
}

// ── Navigation ─────────────────────────────────────────────────

#[test]
fn next_on_empty_track_reselects_it() {
    let (mut editor, tracks, _) = editor_with(&[&[]]);
    let track = ObjectId::Track(tracks[0]);
    editor.select(track);
    editor.listener_mut().drain();

    editor.key(Direction::Right);
    assert_eq!(editor.selection(), Some(track));
    assert_eq!(editor.listener().events, vec![TrackEvent::Selected(track)]);
}

#[test]
fn keyboard_tour_of_two_rows() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 4), (10, 4)], &[(9, 3)]]);

    editor.key(Direction::Down);
    assert_eq!(editor.selection(), Some(ObjectId::Tack(tacks[0][0])));
    editor.key(Direction::Right);
    assert_eq!(editor.selection(), Some(ObjectId::Tack(tacks[0][1])));
    editor.key(Direction::Down);
    assert_eq!(editor.selection(), Some(ObjectId::Tack(tacks[1][0])));
    editor.key(Direction::Left);
    assert_eq!(editor.selection(), Some(ObjectId::Track(tracks[1])));
    editor.key(Direction::Left);
    assert_eq!(editor.selection(), Some(ObjectId::Track(tracks[1])));
    editor.key(Direction::Up);
    assert_eq!(editor.selection(), Some(ObjectId::Track(tracks[0])));
    editor.key(Direction::Up);
    assert_eq!(editor.selection(), None);

    let timeline = editor.timeline().unwrap();
    assert!(timeline
        .live_tracks()
        .all(|t| !t.is_active_or_contains_active()));
}

#[test]
fn down_without_selection_uses_playhead() {
    let (mut editor, _, tacks) = editor_with(&[&[(0, 4), (10, 4)]]);
    for _ in 0..6 {
        editor.key(Direction::Right);
    }
    assert_eq!(editor.cursor(), 6);
    assert_eq!(editor.selection(), None);

    editor.key(Direction::Down);
    assert_eq!(editor.selection(), Some(ObjectId::Tack(tacks[0][1])));
}

#[test]
fn selection_keeps_a_single_active_flag() {
    let (mut editor, tracks, tacks) = editor_with(&[&[(0, 4)], &[(0, 4)]]);
    editor.select(ObjectId::Tack(tacks[0][0]));
    editor.select(ObjectId::Tack(tacks[1][0]));

    let timeline = editor.timeline().unwrap();
    let active: usize = timeline
        .live_tracks()
        .map(|t| usize::from(t.active) + t.live_tacks().filter(|k| k.active).count())
        .sum();
    assert_eq!(active, 1);
    assert!(timeline.track(tracks[1]).unwrap().is_active_or_contains_active());
}
