//! Relay task translating transfer engine events for subscribers.

use std::sync::Arc;

use crate::services::{ContentStore, TransferEvent};
use crate::tree::Source;
use crate::types::{Event, VideoId};

use super::registry::TransferRegistry;

/// Parameters for spawning the event relay task
pub(crate) struct RelayParams {
    /// Events reported by the transfer engine
    pub events: tokio::sync::mpsc::UnboundedReceiver<TransferEvent>,
    /// Event broadcast sender
    pub event_tx: tokio::sync::broadcast::Sender<Event>,
    /// In-flight transfers
    pub registry: TransferRegistry,
    /// Cache bookkeeping persistence
    pub content: Arc<dyn ContentStore>,
    /// Cancellation token
    pub cancel_token: tokio_util::sync::CancellationToken,
}

/// Spawn the task that re-dispatches engine events.
///
/// Every subscriber-visible event is sent from this one task, in the order the
/// engine reported them. On cancellation, events already queued are still
/// relayed before the task exits.
pub(crate) fn spawn_event_relay(params: RelayParams) -> tokio::task::JoinHandle<()> {
    let RelayParams {
        mut events,
        event_tx,
        registry,
        content,
        cancel_token,
    } = params;
    let relay = EventRelay {
        event_tx,
        registry,
        content,
    };

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                event = events.recv() => {
                    let Some(event) = event else {
                        tracing::debug!("Transfer engine closed its event channel");
                        break;
                    };
                    relay.handle(event).await;
                }
                _ = cancel_token.cancelled() => {
                    while let Ok(event) = events.try_recv() {
                        relay.handle(event).await;
                    }
                    break;
                }
            }
        }
        tracing::debug!("Event relay stopped");
    })
}

pub(crate) struct EventRelay {
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    pub(crate) registry: TransferRegistry,
    pub(crate) content: Arc<dyn ContentStore>,
}

impl EventRelay {
    pub(crate) async fn handle(&self, event: TransferEvent) {
        match event {
            TransferEvent::Progress { source, progress } => match source.entity() {
                Some(entity) => self.emit(Event::Progress {
                    entity,
                    progress: progress.clamp(0.0, 1.0),
                }),
                None => {
                    tracing::trace!(source = %source, progress, "Progress without public id");
                }
            },
            TransferEvent::Completed { source, success } => {
                if let Source::Video { video, quality } = &source {
                    self.record_completion(video.id, quality.clone(), success)
                        .await;
                }
                match source.entity() {
                    Some(entity) => self.emit(Event::Completed { entity, success }),
                    None => {
                        tracing::trace!(source = %source, success, "Completion without public id");
                    }
                }
            }
            TransferEvent::Failed { error } => {
                tracing::warn!(error = %error, "Transfer engine reported a failure");
                self.emit(Event::Failed { error });
            }
        }
    }

    /// Drop the video from the in-flight table and store its cached quality
    async fn record_completion(&self, video: VideoId, quality: Option<String>, success: bool) {
        let mut in_flight = self.registry.lock().await;
        let unit = in_flight.remove(&video);

        if !success {
            tracing::debug!(video_id = video.0, unit_id = ?unit.map(|u| u.0), "Video transfer failed");
            return;
        }

        let Some(quality) = quality else {
            tracing::warn!(
                video_id = video.0,
                "Completed video has no rendition, cache bookkeeping skipped"
            );
            return;
        };

        if let Err(e) = self.content.set_cached_quality(video, Some(quality)).await {
            tracing::error!(video_id = video.0, error = %e, "Failed to record cached video quality");
        }
    }

    fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
