//! Download orchestration façade split into focused submodules.
//!
//! The `SyllabusDownloader` struct and its methods are organized by domain:
//! - [`download`] - Submitting unit and section downloads
//! - [`control`] - Cancelling transfers and removing stored videos
//! - [`queries`] - Download state queries
//! - [`relay`] - Translating transfer engine events for subscribers
//! - [`registry`] - Exclusive table of in-flight video transfers
//! - [`lifecycle`] - Session start resume and shutdown

mod control;
mod download;
mod lifecycle;
mod queries;
mod registry;
mod relay;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::Services;
use crate::state::DownloadStateComputer;
use crate::tree::SyllabusTreeBuilder;
use crate::types::Event;

use registry::TransferRegistry;

/// Shutdown coordination for the relay task
#[derive(Clone)]
pub(crate) struct Lifecycle {
    /// Flag to indicate whether new downloads are accepted (set to false during shutdown)
    pub(crate) accepting_new: Arc<AtomicBool>,
    /// Stops the event relay task
    pub(crate) relay_cancel: tokio_util::sync::CancellationToken,
    /// Relay task handle, taken on shutdown
    pub(crate) relay_handle: Arc<tokio::sync::Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
///
/// Owns the transfer engine handle explicitly: every download, cancel, remove
/// and completion goes through the same transfer registry, so bookkeeping
/// for one video never runs concurrently with its removal.
#[derive(Clone)]
pub struct SyllabusDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Injected collaborators
    pub(crate) services: Services,
    /// Work tree construction
    pub(crate) tree_builder: SyllabusTreeBuilder,
    /// Derived state queries
    pub(crate) state_computer: DownloadStateComputer,
    /// In-flight transfers
    pub(crate) registry: TransferRegistry,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Relay and shutdown coordination
    pub(crate) lifecycle: Lifecycle,
}

impl SyllabusDownloader {
    /// Create a new SyllabusDownloader instance
    ///
    /// This validates the configuration, attaches the event sink to the
    /// transfer engine and starts the relay task that re-dispatches engine
    /// events to subscribers. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the configuration is invalid.
    pub async fn new(config: Config, services: Services) -> Result<Self> {
        config.validate()?;

        // Create broadcast channel; each subscriber gets its own buffer
        let (event_tx, _rx) =
            tokio::sync::broadcast::channel(config.events.event_channel_capacity);

        let (sink, engine_events) = tokio::sync::mpsc::unbounded_channel();
        services.engine.attach(sink);

        let tree_builder =
            SyllabusTreeBuilder::new(services.file_store.clone(), config.video_quality());
        let state_computer =
            DownloadStateComputer::new(services.file_store.clone(), services.engine.clone());
        let registry = TransferRegistry::default();

        let relay_cancel = tokio_util::sync::CancellationToken::new();
        let relay_handle = relay::spawn_event_relay(relay::RelayParams {
            events: engine_events,
            event_tx: event_tx.clone(),
            registry: registry.clone(),
            content: services.content.clone(),
            cancel_token: relay_cancel.clone(),
        });

        tracing::info!(
            engine = services.engine.name(),
            video_quality = config.video_quality(),
            "Syllabus downloader initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            services,
            tree_builder,
            state_computer,
            registry,
            event_tx,
            lifecycle: Lifecycle {
                accepting_new: Arc::new(AtomicBool::new(true)),
                relay_cancel,
                relay_handle: Arc::new(tokio::sync::Mutex::new(Some(relay_handle))),
            },
        })
    }

    /// Subscribe to download events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events
    /// independently, always from the single relay task regardless of which
    /// task the transfer engine reported from. A subscriber that falls behind
    /// by more than the configured capacity receives `RecvError::Lagged`.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Videos submitted to the engine that have not completed, been cancelled
    /// or been removed yet
    pub async fn in_flight_videos(&self) -> Vec<crate::types::VideoId> {
        self.registry.snapshot().await
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    pub(crate) fn ensure_accepting(&self) -> Result<()> {
        if self.lifecycle.accepting_new.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::ShuttingDown)
        }
    }
}
