//! # syllabus-dl
//!
//! Offline video download core for course syllabi.
//!
//! ## Design Philosophy
//!
//! syllabus-dl is designed to be:
//! - **Engine-agnostic** - Byte transfers, metadata fetching and persistence
//!   are injected through traits
//! - **Derived state** - Download state is recomputed on every query, never stored
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use syllabus_dl::{
//!     Config, LocalVideoFileStore, NoOpMetadataService, Services, SyllabusDownloader,
//!     ContentStore, TransferEngine,
//! };
//!
//! # async fn example(
//! #     engine: Arc<dyn TransferEngine>,
//! #     content: Arc<dyn ContentStore>,
//! #     unit: syllabus_dl::Unit,
//! #     section: syllabus_dl::Section,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let services = Services {
//!     file_store: Arc::new(LocalVideoFileStore::from_config(&config)),
//!     metadata: Arc::new(NoOpMetadataService),
//!     engine,
//!     content,
//! };
//!
//! let downloader = SyllabusDownloader::new(config, services).await?;
//!
//! // Subscribe to events
//! let mut events = downloader.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         println!("Event: {:?}", event);
//!     }
//! });
//!
//! downloader.download_unit(&unit).await?;
//! println!("{:?}", downloader.get_downloading_state_for_unit(&unit, &section));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Download orchestration façade (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Collaborator traits and shipped implementations
pub mod services;
/// Download state aggregation
pub mod state;
/// Syllabus entity model
pub mod syllabus;
/// Work trees handed to the transfer engine
pub mod tree;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use downloader::SyllabusDownloader;
pub use error::{DownloadError, Error, Result};
pub use services::{
    ContentStore, LocalVideoFileStore, MetadataFetchService, NoOpMetadataService, Services,
    TransferEngine, TransferEvent, TransferEventSink, VideoFileStore,
};
pub use state::DownloadStateComputer;
pub use syllabus::{Course, Lesson, Section, Step, StepBlock, Unit, Video, VideoUrl};
pub use tree::{Source, SyllabusTreeBuilder, SyllabusTreeNode};
pub use types::{
    CourseId, DownloadState, Event, LessonId, SectionId, StepId, SyllabusEntity, UnitId, VideoId,
};
