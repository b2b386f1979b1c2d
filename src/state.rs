//! Derived download state of units, sections and courses
//!
//! Nothing here is cached or mutated: every query looks at the entity snapshot,
//! the file store and the transfer engine's live progress at call time.

use std::sync::Arc;

use crate::services::{TransferEngine, VideoFileStore};
use crate::syllabus::{Course, Section, Unit};
use crate::types::DownloadState;

/// Aggregates download state bottom-up from videos to courses
#[derive(Clone)]
pub struct DownloadStateComputer {
    file_store: Arc<dyn VideoFileStore>,
    engine: Arc<dyn TransferEngine>,
}

impl DownloadStateComputer {
    /// Create a computer reading from `file_store` and `engine`
    pub fn new(file_store: Arc<dyn VideoFileStore>, engine: Arc<dyn TransferEngine>) -> Self {
        Self { file_store, engine }
    }

    /// State of a unit inside its owning section.
    ///
    /// In-flight progress is the unweighted mean over the unit's videos that
    /// the engine reports progress for.
    pub fn unit_state(&self, unit: &Unit, section: &Section) -> DownloadState {
        if section.is_gated() {
            return DownloadState::NotAvailable;
        }

        let Some(lesson) = unit.lesson.as_ref() else {
            return DownloadState::NotAvailable;
        };

        // Unknowable until the remaining steps are fetched
        if !lesson.steps_resolved() {
            return DownloadState::Available { is_cached: false };
        }

        let videos: Vec<_> = lesson.video_steps().map(|(_, video)| video).collect();
        if videos.is_empty() {
            return DownloadState::NotAvailable;
        }

        let progresses: Vec<f32> = videos
            .iter()
            .filter_map(|video| self.engine.progress_for(video.id))
            .collect();
        if !progresses.is_empty() {
            return DownloadState::Downloading {
                progress: mean(&progresses),
            };
        }

        let cached = videos
            .iter()
            .filter(|video| self.file_store.exists(video.id))
            .count();

        DownloadState::Available {
            is_cached: cached == videos.len(),
        }
    }

    /// State of a section from the states of its units.
    ///
    /// Rules apply in order: all units downloading, all units unavailable, any
    /// unit not cached, otherwise cached. A section with any unit not loaded is
    /// unavailable.
    pub fn section_state(&self, section: &Section) -> DownloadState {
        if section.is_gated() {
            return DownloadState::NotAvailable;
        }

        if let Some(unit) = section.first_unloaded_unit() {
            tracing::trace!(
                section_id = section.id.0,
                unit_id = unit.0,
                "Section has unloaded units"
            );
            return DownloadState::NotAvailable;
        }

        let states: Vec<DownloadState> = section
            .ordered_units()
            .map(|unit| self.unit_state(unit, section))
            .collect();
        if states.is_empty() {
            return DownloadState::NotAvailable;
        }

        if states.iter().all(DownloadState::is_downloading) {
            let progresses: Vec<f32> = states.iter().filter_map(DownloadState::progress).collect();
            return DownloadState::Downloading {
                progress: mean(&progresses),
            };
        }

        if states
            .iter()
            .all(|state| *state == DownloadState::NotAvailable)
        {
            return DownloadState::NotAvailable;
        }

        if states
            .iter()
            .any(|state| *state == DownloadState::Available { is_cached: false })
        {
            return DownloadState::Available { is_cached: false };
        }

        DownloadState::Available { is_cached: true }
    }

    /// State of a course.
    ///
    /// Only distinguishes "something left to download" from everything else;
    /// courses never report downloading or fully cached.
    pub fn course_state(&self, course: &Course) -> DownloadState {
        let downloadable = course.ordered_sections().any(|section| {
            self.section_state(section) == DownloadState::Available { is_cached: false }
        });

        if downloadable {
            DownloadState::Available { is_cached: false }
        } else {
            DownloadState::NotAvailable
        }
    }
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}
