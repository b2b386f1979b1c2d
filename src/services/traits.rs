//! Traits for the collaborators of the download core

use async_trait::async_trait;

use crate::syllabus::Step;
use crate::tree::{Source, SyllabusTreeNode};
use crate::types::{StepId, VideoId};

/// Local storage of downloaded video files
///
/// `exists` is called from synchronous state queries and must not block on
/// anything slower than a metadata lookup.
#[async_trait]
pub trait VideoFileStore: Send + Sync {
    /// Whether a file for this video is stored locally
    fn exists(&self, video: VideoId) -> bool;

    /// Delete the stored file for this video
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be deleted. A missing
    /// file is not an error.
    async fn remove(&self, video: VideoId) -> crate::Result<()>;
}

/// Remote source of lesson step metadata
#[async_trait]
pub trait MetadataFetchService: Send + Sync {
    /// Fetch steps by id
    ///
    /// The returned order is not significant; callers reorder by the lesson's
    /// step id list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Metadata`](crate::Error::Metadata) (or
    /// [`Error::NotSupported`](crate::Error::NotSupported)) when the steps
    /// cannot be fetched.
    async fn fetch_steps(&self, ids: &[StepId]) -> crate::Result<Vec<Step>>;
}

/// Notification from the transfer engine about one node of a submitted tree
#[derive(Clone, Debug, PartialEq)]
pub enum TransferEvent {
    /// Progress in 0.0..=1.0 for a node
    Progress {
        /// Node the progress belongs to
        source: Source,
        /// Progress value
        progress: f32,
    },
    /// A node finished
    Completed {
        /// Node that finished
        source: Source,
        /// Whether the transfer succeeded
        success: bool,
    },
    /// Engine level failure
    Failed {
        /// Error message
        error: String,
    },
}

/// Channel the transfer engine reports [`TransferEvent`]s through
pub type TransferEventSink = tokio::sync::mpsc::UnboundedSender<TransferEvent>;

/// Byte-level transfer engine
///
/// Work is submitted as trees of [`Source`] nodes. Progress and completion are
/// reported per node through the sink given to [`attach`](Self::attach), in
/// emission order per node and in no particular order across nodes. Timeouts
/// and retries are the engine's business.
#[async_trait]
pub trait TransferEngine: Send + Sync {
    /// Register the sink events are reported through
    ///
    /// Called once when the downloader is created.
    fn attach(&self, sink: TransferEventSink);

    /// Start transferring every video of the tree
    ///
    /// Resolves once the engine has accepted the work, not when it finishes.
    async fn start(&self, tree: &SyllabusTreeNode) -> crate::Result<()>;

    /// Stop whatever transfers of the tree are still tracked
    async fn cancel(&self, tree: &SyllabusTreeNode) -> crate::Result<()>;

    /// Resume transfers of the tree interrupted in a previous session
    async fn restore(&self, tree: &SyllabusTreeNode) -> crate::Result<()>;

    /// Progress of an in-flight video transfer, `None` when not in flight
    fn progress_for(&self, video: VideoId) -> Option<f32>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str {
        "transfer-engine"
    }
}

/// Persistence hook for the cache bookkeeping stored on videos
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Record the locally stored quality of a video, `None` once removed
    async fn set_cached_quality(&self, video: VideoId, quality: Option<String>)
    -> crate::Result<()>;
}
