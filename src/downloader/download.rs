//! Submitting unit and section downloads to the transfer engine.

use std::collections::HashMap;

use crate::error::{DownloadError, Result};
use crate::syllabus::{Section, Step, Unit};
use crate::tree::SyllabusTreeNode;
use crate::types::StepId;

use super::SyllabusDownloader;

impl SyllabusDownloader {
    /// Download every video of a unit that is not stored yet
    ///
    /// Missing lesson steps are fetched from the metadata service first. The
    /// returned future resolves once the transfer engine accepted the work;
    /// transfer progress and failures arrive as events. A unit whose videos are
    /// all stored submits nothing.
    ///
    /// # Errors
    ///
    /// - `DownloadError::LessonNotFound` when the unit has no lesson loaded
    /// - metadata errors when missing steps cannot be fetched
    /// - `Error::Transfer` when the engine rejects the submission
    /// - `Error::ShuttingDown` after [`shutdown`](Self::shutdown)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use syllabus_dl::*;
    /// # async fn example(downloader: SyllabusDownloader, unit: Unit) -> Result<()> {
    /// downloader.download_unit(&unit).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_unit(&self, unit: &Unit) -> Result<()> {
        self.ensure_accepting()?;

        let steps = self.resolve_steps(unit).await?;
        let tree = self.tree_builder.unit_for_download(unit.id, &steps);
        self.submit(tree).await
    }

    /// Download every unit of a section
    ///
    /// Every unit must already have its lesson steps loaded; otherwise nothing
    /// is submitted. Units are submitted concurrently and independently: a unit
    /// the engine rejects is logged and skipped without affecting its siblings,
    /// and the call resolves after every submission attempt finished.
    ///
    /// # Errors
    ///
    /// - `DownloadError::DownloadSectionFailed` when a unit is not loaded or
    ///   its lesson steps are not resolved
    /// - `Error::ShuttingDown` after [`shutdown`](Self::shutdown)
    pub async fn download_section(&self, section: &Section) -> Result<()> {
        self.ensure_accepting()?;

        let SyllabusTreeNode { source, children } =
            self.tree_builder.section_for_download(section)?;

        let submissions = children
            .into_iter()
            .filter(|unit_tree| !unit_tree.is_empty())
            .map(|unit_tree| {
                let unit_source = unit_tree.source.clone();
                let tree = SyllabusTreeNode::with_children(source.clone(), vec![unit_tree]);
                async move {
                    if let Err(e) = self.submit(tree).await {
                        tracing::warn!(
                            section_id = section.id.0,
                            unit = %unit_source,
                            error = %e,
                            "Unit download submission failed, continuing with remaining units"
                        );
                    }
                }
            });

        futures::future::join_all(submissions).await;

        tracing::info!(section_id = section.id.0, "Section download submitted");
        Ok(())
    }

    /// Loaded steps of the unit's lesson, fetching them when not all are loaded
    ///
    /// Fetched steps are returned in the lesson's step order; ids the service
    /// did not return are left out.
    pub(crate) async fn resolve_steps(&self, unit: &Unit) -> Result<Vec<Step>> {
        let lesson = unit
            .lesson
            .as_ref()
            .ok_or(DownloadError::LessonNotFound { unit: unit.id })?;

        if lesson.steps_resolved() {
            return Ok(lesson.steps.clone());
        }

        tracing::debug!(
            unit_id = unit.id.0,
            lesson_id = lesson.id.0,
            loaded = lesson.steps.len(),
            total = lesson.step_ids.len(),
            "Fetching unresolved lesson steps"
        );

        let fetched = self.services.metadata.fetch_steps(&lesson.step_ids).await?;
        let mut by_id: HashMap<StepId, Step> =
            fetched.into_iter().map(|step| (step.id, step)).collect();
        let steps: Vec<Step> = lesson
            .step_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        if steps.len() < lesson.step_ids.len() {
            tracing::warn!(
                unit_id = unit.id.0,
                missing = lesson.step_ids.len() - steps.len(),
                "Metadata service did not return every step"
            );
        }

        Ok(steps)
    }

    /// Hand a tree to the engine, tracking its videos while in flight
    async fn submit(&self, tree: SyllabusTreeNode) -> Result<()> {
        let videos = tree.video_ids();
        if videos.is_empty() {
            tracing::debug!(source = %tree.source, "Nothing to download");
            return Ok(());
        }

        self.registry.track(&tree).await;

        if let Err(e) = self.services.engine.start(&tree).await {
            self.registry.untrack(&tree).await;
            return Err(e);
        }

        tracing::info!(
            source = %tree.source,
            videos = videos.len(),
            "Download submitted to transfer engine"
        );
        Ok(())
    }
}
