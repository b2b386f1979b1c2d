//! Error types for syllabus-dl
//!
//! Precondition failures (missing lessons, unresolved steps) are surfaced as
//! [`DownloadError`] values from the originating operation. Failures that happen
//! after a transfer was accepted never come back through an operation result;
//! they arrive as [`Event::Failed`](crate::Event::Failed) or as an unsuccessful
//! [`Event::Completed`](crate::Event::Completed).

use crate::types::{SectionId, UnitId};
use thiserror::Error;

/// Result type alias for syllabus-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for syllabus-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "video_quality")
        key: Option<String>,
    },

    /// Download, remove or cancel precondition failed
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Transfer engine rejected a start, cancel or restore request
    #[error("transfer engine error: {0}")]
    Transfer(String),

    /// Step metadata could not be fetched
    #[error("metadata fetch error: {0}")]
    Metadata(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation not supported by the configured collaborator
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Shutdown in progress - not accepting new operations
    #[error("shutdown in progress: not accepting new operations")]
    ShuttingDown,
}

/// Domain failures of download, remove and cancel requests
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The unit has no resolved lesson; metadata must be loaded first
    #[error("lesson for unit {unit} not found")]
    LessonNotFound {
        /// Unit whose lesson is missing
        unit: UnitId,
    },

    /// A unit of the section has unresolved lesson steps
    #[error("cannot download section {section}: unit {unit} is not fully loaded")]
    DownloadSectionFailed {
        /// Section being downloaded
        section: SectionId,
        /// First unit found without resolved steps
        unit: UnitId,
    },

    /// At least one video file of the unit could not be deleted
    #[error("failed to remove {failed} of {total} videos of unit {unit}")]
    RemoveUnitFailed {
        /// Unit being removed
        unit: UnitId,
        /// Number of deletions that failed
        failed: usize,
        /// Number of deletions attempted
        total: usize,
    },

    /// The section cancellation could not be issued or was rejected
    #[error("cannot cancel section {section}: {reason}")]
    CancelSectionFailed {
        /// Section being cancelled
        section: SectionId,
        /// First unit found without resolved steps, `None` when the transfer
        /// engine rejected the request
        unit: Option<UnitId>,
        /// What went wrong
        reason: String,
    },
}

impl Error {
    /// Create a configuration error for a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Whether this error is a precondition failure the caller can fix by
    /// loading more metadata and retrying
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::Download(
                DownloadError::LessonNotFound { .. }
                    | DownloadError::DownloadSectionFailed { .. }
                    | DownloadError::CancelSectionFailed { unit: Some(_), .. }
            )
        )
    }
}
