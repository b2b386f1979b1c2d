//! Core types and events for syllabus-dl

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Get the inner i64 value
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a course
    CourseId
);
entity_id!(
    /// Identifier of a course section
    SectionId
);
entity_id!(
    /// Identifier of a unit inside a section
    UnitId
);
entity_id!(
    /// Identifier of the lesson a unit points at
    LessonId
);
entity_id!(
    /// Identifier of a lesson step
    StepId
);
entity_id!(
    /// Identifier of a video attached to a step
    VideoId
);

/// Offline availability of a unit, section or course
///
/// Always derived on demand; never stored. `Waiting` and `Cached` are part of
/// the public vocabulary for UI layers that track queued work or byte totals
/// themselves; [`DownloadStateComputer`](crate::state::DownloadStateComputer)
/// only produces the other three.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DownloadState {
    /// Content cannot be downloaded (exam, unreachable, no videos, not loaded)
    NotAvailable,
    /// Content can be downloaded; `is_cached` is true when every video is on disk
    Available {
        /// Whether all videos are already stored locally
        is_cached: bool,
    },
    /// Submitted but not yet transferring
    Waiting,
    /// Transfers in flight
    Downloading {
        /// Progress in 0.0..=1.0
        progress: f32,
    },
    /// Fully stored locally with a known size
    Cached {
        /// Total size of stored media in bytes
        bytes_total: u64,
        /// Whether any media file is present
        has_cached_media: bool,
    },
}

impl DownloadState {
    /// Whether this state reports in-flight transfers
    pub fn is_downloading(&self) -> bool {
        matches!(self, DownloadState::Downloading { .. })
    }

    /// Progress value for `Downloading`, `None` otherwise
    pub fn progress(&self) -> Option<f32> {
        match self {
            DownloadState::Downloading { progress } => Some(*progress),
            _ => None,
        }
    }
}

/// Public identity of a syllabus node in emitted events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SyllabusEntity {
    /// A single video
    Video(VideoId),
    /// A unit (all videos of its lesson)
    Unit(UnitId),
    /// A section (all of its units)
    Section(SectionId),
}

impl std::fmt::Display for SyllabusEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyllabusEntity::Video(id) => write!(f, "video {}", id),
            SyllabusEntity::Unit(id) => write!(f, "unit {}", id),
            SyllabusEntity::Section(id) => write!(f, "section {}", id),
        }
    }
}

/// Event emitted to subscribers of a [`SyllabusDownloader`](crate::SyllabusDownloader)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Transfer progress for a video, unit or section
    Progress {
        /// Entity the progress belongs to
        entity: SyllabusEntity,
        /// Progress in 0.0..=1.0
        progress: f32,
    },

    /// Transfer finished for a video, unit or section
    Completed {
        /// Entity that finished
        entity: SyllabusEntity,
        /// Whether the transfer succeeded
        success: bool,
    },

    /// The transfer engine reported an error not tied to a single node
    Failed {
        /// Error message
        error: String,
    },

    /// Downloader is shutting down
    Shutdown,
}
