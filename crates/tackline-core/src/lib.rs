//! Tackline Core - Foundation types for the timeline editor
//!
//! This crate provides the fundamental types used throughout Tackline:
//! - Frame axis types (Frame, Span) and the pixel ↔ frame mapping
//! - Editor configuration
//! - Geometric primitives for hit-testing
//! - Error types

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;

pub use config::EditorConfig;
pub use error::{Result, TacklineError};
pub use frame::{Frame, FrameScale, Span, MAX_FRAME, MIN_DURATION};
pub use geometry::{Rect, Vec2};
