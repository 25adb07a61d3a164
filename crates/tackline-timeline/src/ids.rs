//! Stable identifiers for timeline objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Identifier of a tack.
    TackId
);
define_id!(
    /// Identifier of a track.
    TrackId
);
define_id!(
    /// Identifier of a timeline.
    TimelineId
);

/// Any object that can be selected or deleted inside a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ObjectId {
    Track(TrackId),
    Tack(TackId),
}

impl ObjectId {
    pub fn as_track(self) -> Option<TrackId> {
        match self {
            Self::Track(id) => Some(id),
            Self::Tack(_) => None,
        }
    }

    pub fn as_tack(self) -> Option<TackId> {
        match self {
            Self::Tack(id) => Some(id),
            Self::Track(_) => None,
        }
    }
}

impl From<TrackId> for ObjectId {
    fn from(id: TrackId) -> Self {
        Self::Track(id)
    }
}

impl From<TackId> for ObjectId {
    fn from(id: TackId) -> Self {
        Self::Tack(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Track(id) => write!(f, "track:{id}"),
            Self::Tack(id) => write!(f, "tack:{id}"),
        }
    }
}
