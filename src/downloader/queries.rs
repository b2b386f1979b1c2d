//! Download state queries.

use crate::syllabus::{Course, Section, Unit};
use crate::types::DownloadState;

use super::SyllabusDownloader;

impl SyllabusDownloader {
    /// Current download state of a unit within its owning section
    ///
    /// Synchronous and side-effect free: reads the file store and the transfer
    /// engine's live progress, never restores or submits anything.
    pub fn get_downloading_state_for_unit(&self, unit: &Unit, section: &Section) -> DownloadState {
        self.state_computer.unit_state(unit, section)
    }

    /// Current download state of a section
    pub fn get_downloading_state_for_section(&self, section: &Section) -> DownloadState {
        self.state_computer.section_state(section)
    }

    /// Current download state of a course
    ///
    /// Either `Available { is_cached: false }` when some section still has
    /// videos to fetch, or `NotAvailable`.
    pub fn get_downloading_state_for_course(&self, course: &Course) -> DownloadState {
        self.state_computer.course_state(course)
    }
}
