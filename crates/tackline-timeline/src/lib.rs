//! Tackline Timeline - Timeline data model and editor
//!
//! Implements the editing core for multi-track interval timelines:
//! - Projects containing timelines
//! - Tracks containing tacks (intervals on an integer frame axis)
//! - Drag gestures with grab-resize and grab-move
//! - Overlap resolution after each committed drag
//! - Keyboard navigation across tracks and tacks

pub mod editor;
pub mod events;
pub mod gesture;
pub mod ids;
pub mod navigation;
pub mod project;
pub mod serialization;
pub mod tack;
pub mod timeline;
pub mod track;

pub use editor::Editor;
pub use events::{EditorListener, EventLog, EventSink, NullListener, TrackEvent};
pub use gesture::{DragMode, PointerEvent, PointerKind, TrackLayout};
pub use ids::{ObjectId, TackId, TimelineId, TrackId};
pub use navigation::{Direction, Navigation};
pub use project::Project;
pub use serialization::{ProjectFile, CURRENT_VERSION};
pub use tack::Tack;
pub use timeline::Timeline;
pub use track::Track;
