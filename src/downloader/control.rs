//! Cancelling transfers and removing stored videos.

use crate::error::{DownloadError, Error, Result};
use crate::syllabus::{Section, Unit};
use crate::tree::SyllabusTreeNode;
use crate::types::VideoId;

use super::SyllabusDownloader;

impl SyllabusDownloader {
    /// Cancel in-flight transfers of a unit
    ///
    /// Every video of the unit is included, stored or not, so a cancel still
    /// reaches a transfer whose file appeared in the meantime. Already stored
    /// files are never deleted. Cancelling a unit with nothing in flight is a
    /// no-op on the cache.
    ///
    /// A transfer finishing at the same moment may still complete; the engine
    /// only stops what it tracks when the request arrives.
    ///
    /// # Errors
    ///
    /// - `DownloadError::LessonNotFound` when the unit has no lesson loaded
    /// - `Error::Transfer` when the engine rejects the request
    pub async fn cancel_unit(&self, unit: &Unit) -> Result<()> {
        let steps = self.resolve_steps(unit).await?;
        let tree = self.tree_builder.unit_for_cancel_or_remove(unit.id, &steps);
        self.cancel_tree(tree).await
    }

    /// Cancel in-flight transfers of every unit of a section
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::CancelSectionFailed` when a unit is not loaded
    /// or its lesson steps are not resolved (`unit` is set), or when the
    /// engine rejects the request (`unit` is `None`).
    pub async fn cancel_section(&self, section: &Section) -> Result<()> {
        let tree = self.tree_builder.section_for_cancel(section)?;
        self.cancel_tree(tree).await.map_err(|e| {
            Error::Download(DownloadError::CancelSectionFailed {
                section: section.id,
                unit: None,
                reason: e.to_string(),
            })
        })
    }

    /// Delete every stored video of a unit and clear its cache bookkeeping
    ///
    /// Deletions run concurrently and are awaited together. When any of them
    /// fails the whole call fails; files already deleted stay deleted.
    ///
    /// # Errors
    ///
    /// - `DownloadError::LessonNotFound` when the unit has no lesson loaded
    /// - `DownloadError::RemoveUnitFailed` when a deletion or its bookkeeping
    ///   update failed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use syllabus_dl::*;
    /// # async fn example(downloader: SyllabusDownloader, unit: Unit, section: Section) -> Result<()> {
    /// downloader.remove_unit(&unit).await?;
    /// assert_eq!(
    ///     downloader.get_downloading_state_for_unit(&unit, &section),
    ///     DownloadState::Available { is_cached: false }
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub async fn remove_unit(&self, unit: &Unit) -> Result<()> {
        let steps = self.resolve_steps(unit).await?;
        let tree = self.tree_builder.unit_for_cancel_or_remove(unit.id, &steps);
        let videos = tree.video_ids();
        let total = videos.len();

        // Completion bookkeeping for these videos waits until we are done
        let mut in_flight = self.registry.lock().await;

        let results =
            futures::future::join_all(videos.iter().map(|video| self.remove_video(*video))).await;

        let mut failed = 0;
        for (video, result) in videos.iter().zip(results) {
            match result {
                Ok(()) => {
                    in_flight.remove(video);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        unit_id = unit.id.0,
                        video_id = video.0,
                        error = %e,
                        "Failed to remove video"
                    );
                }
            }
        }
        drop(in_flight);

        if failed > 0 {
            return Err(Error::Download(DownloadError::RemoveUnitFailed {
                unit: unit.id,
                failed,
                total,
            }));
        }

        tracing::info!(unit_id = unit.id.0, videos = total, "Removed unit videos");
        Ok(())
    }

    /// Delete every stored video of a section
    ///
    /// Units without a loaded lesson have nothing to remove and are skipped.
    /// Units are removed one after another, each holding the transfer registry
    /// for its deletions, so completion bookkeeping waits between units rather
    /// than for the whole section. Every unit is attempted; the first failure
    /// in unit order is returned.
    ///
    /// # Errors
    ///
    /// Returns the first unit failure, usually `DownloadError::RemoveUnitFailed`.
    pub async fn remove_section(&self, section: &Section) -> Result<()> {
        let mut removed = 0;
        let mut first_error = None;
        for unit in section.ordered_units().filter(|unit| unit.lesson.is_some()) {
            match self.remove_unit(unit).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(
                        section_id = section.id.0,
                        unit_id = unit.id.0,
                        error = %e,
                        "Failed to remove unit"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                tracing::info!(section_id = section.id.0, units = removed, "Removed section videos");
                Ok(())
            }
        }
    }

    async fn remove_video(&self, video: VideoId) -> Result<()> {
        self.services.file_store.remove(video).await?;
        self.services.content.set_cached_quality(video, None).await
    }

    async fn cancel_tree(&self, tree: SyllabusTreeNode) -> Result<()> {
        if tree.video_ids().is_empty() {
            tracing::debug!(source = %tree.source, "Nothing to cancel");
            return Ok(());
        }

        self.services.engine.cancel(&tree).await?;
        self.registry.untrack(&tree).await;

        tracing::info!(source = %tree.source, "Cancelled transfers");
        Ok(())
    }
}
