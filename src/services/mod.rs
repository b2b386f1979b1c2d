//! Collaborator seams
//!
//! The download core never talks to the network, the disk or the transfer
//! machinery directly. Everything it needs is expressed as a trait here and
//! injected through [`Services`]:
//!
//! - [`VideoFileStore`]: whether a video is on disk, and deleting it
//! - [`MetadataFetchService`]: loading lesson steps by id
//! - [`TransferEngine`]: the byte-level download engine
//! - [`ContentStore`]: persisting cache bookkeeping on videos
//!
//! [`LocalVideoFileStore`] and [`NoOpMetadataService`] are shipped
//! implementations; the transfer engine and content store always come from the
//! embedding application.

mod local;
mod noop;
mod traits;

pub use local::LocalVideoFileStore;
pub use noop::NoOpMetadataService;
pub use traits::{
    ContentStore, MetadataFetchService, TransferEngine, TransferEvent, TransferEventSink,
    VideoFileStore,
};

use std::sync::Arc;

/// Collaborators handed to [`SyllabusDownloader::new`](crate::SyllabusDownloader::new)
#[derive(Clone)]
pub struct Services {
    /// Local media files
    pub file_store: Arc<dyn VideoFileStore>,
    /// Step metadata source
    pub metadata: Arc<dyn MetadataFetchService>,
    /// Byte-level transfer engine
    pub engine: Arc<dyn TransferEngine>,
    /// Cache bookkeeping persistence
    pub content: Arc<dyn ContentStore>,
}
