//! Session start resume and shutdown coordination.

use crate::error::Result;
use crate::syllabus::Section;
use crate::tree::{Source, SyllabusTreeNode};
use crate::types::Event;

use super::SyllabusDownloader;

impl SyllabusDownloader {
    /// Ask the transfer engine to resume transfers interrupted in a previous
    /// session
    ///
    /// Call once at session start with the sections known so far. Only units
    /// that could be downloaded and still have videos missing are considered:
    /// gated sections, units without fully loaded lessons and units the engine
    /// already reports progress for are skipped. A unit the engine fails to
    /// restore is logged and does not stop the others.
    ///
    /// State queries never restore on their own; this is the only place that
    /// does.
    ///
    /// # Returns
    ///
    /// The number of units restore was requested for successfully.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShuttingDown` after [`shutdown`](Self::shutdown).
    pub async fn resume_interrupted_transfers(&self, sections: &[Section]) -> Result<usize> {
        self.ensure_accepting()?;

        let mut restored = 0;
        for section in sections.iter().filter(|section| !section.is_gated()) {
            for unit in section.ordered_units() {
                let Some(lesson) = unit
                    .lesson
                    .as_ref()
                    .filter(|lesson| lesson.steps_resolved())
                else {
                    continue;
                };

                let in_flight = lesson
                    .video_steps()
                    .any(|(_, video)| self.services.engine.progress_for(video.id).is_some());
                if in_flight {
                    continue;
                }

                let missing = self.tree_builder.unit_for_download(unit.id, &lesson.steps);
                if missing.is_empty() {
                    continue;
                }

                // The engine matches its interrupted work against the full unit
                let unit_tree = self
                    .tree_builder
                    .unit_for_cancel_or_remove(unit.id, &lesson.steps);
                let tree =
                    SyllabusTreeNode::with_children(Source::Section(section.id), vec![unit_tree]);
                match self.services.engine.restore(&tree).await {
                    Ok(()) => {
                        // Stored videos never complete again; only wait for missing ones
                        self.registry.track(&missing).await;
                        restored += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            section_id = section.id.0,
                            unit_id = unit.id.0,
                            error = %e,
                            "Failed to restore interrupted transfers"
                        );
                    }
                }
            }
        }

        tracing::info!(units = restored, "Requested restore of interrupted transfers");
        Ok(restored)
    }

    /// Gracefully shut down the downloader
    ///
    /// Stops accepting downloads, relays every engine event already queued,
    /// stops the relay task and emits [`Event::Shutdown`]. In-flight transfers
    /// are left to the engine; cancel them first if they should stop.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        self.lifecycle
            .accepting_new
            .store(false, std::sync::atomic::Ordering::SeqCst);

        self.lifecycle.relay_cancel.cancel();
        let handle = self.lifecycle.relay_handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Event relay task ended abnormally");
            }
        }

        self.emit_event(Event::Shutdown);

        tracing::info!("Shutdown complete");
        Ok(())
    }
}
