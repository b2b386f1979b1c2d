//! Syllabus entity model: Course → Section → Unit → Lesson → Step → Video
//!
//! These are read-only snapshots handed in by the content layer. Collections
//! may be partially resolved: every parent keeps the full ordered id list next
//! to whatever children are currently loaded.

use crate::types::{CourseId, LessonId, SectionId, StepId, UnitId, VideoId};
use serde::{Deserialize, Serialize};
use url::Url;

/// One downloadable rendition of a video
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoUrl {
    /// Quality label, usually the vertical resolution ("360", "720", ...)
    pub quality: String,
    /// Location of the media file
    pub url: Url,
}

/// Video attached to a step
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Video {
    /// Video id
    pub id: VideoId,
    /// Quality of the locally stored file, set once a download completes
    #[serde(default)]
    pub cached_quality: Option<String>,
    /// Available renditions
    #[serde(default)]
    pub urls: Vec<VideoUrl>,
}

impl Video {
    /// Pick the rendition to download for a preferred quality.
    ///
    /// An exact label match wins. Otherwise the highest numeric quality not
    /// above the preference is used, then the lowest numeric quality, then the
    /// first rendition.
    pub fn select_url(&self, preferred: &str) -> Option<&VideoUrl> {
        if let Some(exact) = self.urls.iter().find(|u| u.quality == preferred) {
            return Some(exact);
        }

        let numeric = || {
            self.urls
                .iter()
                .filter_map(|u| u.quality.parse::<u32>().ok().map(|q| (q, u)))
        };

        let below = preferred.parse::<u32>().ok().and_then(|limit| {
            numeric()
                .filter(|(q, _)| *q <= limit)
                .max_by_key(|(q, _)| *q)
        });
        if let Some((_, url)) = below {
            return Some(url);
        }

        numeric()
            .min_by_key(|(q, _)| *q)
            .map(|(_, u)| u)
            .or_else(|| self.urls.first())
    }
}

/// Content block of a step, classified once when the step is built
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StepBlock {
    /// Video lecture
    Video(Video),
    /// Any other block kind (text, quiz, code, ...)
    Other {
        /// Block name as reported by the content layer
        name: String,
    },
}

/// One step of a lesson
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StepRecord", into = "StepRecord")]
pub struct Step {
    /// Step id
    pub id: StepId,
    /// Classified content block
    pub block: StepBlock,
}

impl Step {
    /// Build a video step
    pub fn video(id: StepId, video: Video) -> Self {
        Self {
            id,
            block: StepBlock::Video(video),
        }
    }

    /// Build a non-video step
    pub fn other(id: StepId, name: impl Into<String>) -> Self {
        Self {
            id,
            block: StepBlock::Other { name: name.into() },
        }
    }

    /// Video of this step, if it is a video step
    pub fn video_block(&self) -> Option<&Video> {
        match &self.block {
            StepBlock::Video(video) => Some(video),
            StepBlock::Other { .. } => None,
        }
    }
}

const VIDEO_BLOCK_NAME: &str = "video";

/// Wire shape of a step as delivered by metadata services
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StepRecord {
    id: StepId,
    block: BlockRecord,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BlockRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video: Option<Video>,
}

impl From<StepRecord> for Step {
    fn from(record: StepRecord) -> Self {
        match record.block {
            BlockRecord {
                name,
                video: Some(video),
            } if name == VIDEO_BLOCK_NAME => Step::video(record.id, video),
            BlockRecord { name, .. } => Step::other(record.id, name),
        }
    }
}

impl From<Step> for StepRecord {
    fn from(step: Step) -> Self {
        let block = match step.block {
            StepBlock::Video(video) => BlockRecord {
                name: VIDEO_BLOCK_NAME.to_string(),
                video: Some(video),
            },
            StepBlock::Other { name } => BlockRecord { name, video: None },
        };
        StepRecord { id: step.id, block }
    }
}

/// Lesson behind a unit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Lesson id
    pub id: LessonId,
    /// Ordered ids of every step of the lesson
    pub step_ids: Vec<StepId>,
    /// Steps loaded so far
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Lesson {
    /// Whether every step listed in `step_ids` is loaded
    pub fn steps_resolved(&self) -> bool {
        self.steps.len() >= self.step_ids.len()
    }

    /// Loaded steps that carry a video, with their video
    pub fn video_steps(&self) -> impl Iterator<Item = (&Step, &Video)> {
        self.steps
            .iter()
            .filter_map(|step| step.video_block().map(|video| (step, video)))
    }
}

/// Unit of a section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unit id
    pub id: UnitId,
    /// Lesson, when loaded
    #[serde(default)]
    pub lesson: Option<Lesson>,
}

/// Section of a course
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section id
    pub id: SectionId,
    /// Ordered ids of every unit of the section
    pub unit_ids: Vec<UnitId>,
    /// Units loaded so far
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Exam sections never offer downloads
    #[serde(default)]
    pub is_exam: bool,
    /// Whether the learner can open this section
    #[serde(default = "default_true")]
    pub is_reachable: bool,
}

impl Section {
    /// Exam or unreachable sections are excluded from downloads
    pub fn is_gated(&self) -> bool {
        self.is_exam || !self.is_reachable
    }

    /// Look up a loaded unit
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// First unit id in `unit_ids` that has no loaded unit
    pub fn first_unloaded_unit(&self) -> Option<UnitId> {
        self.unit_ids
            .iter()
            .copied()
            .find(|id| self.unit(*id).is_none())
    }

    /// Loaded units in `unit_ids` order
    pub fn ordered_units(&self) -> impl Iterator<Item = &Unit> {
        self.unit_ids.iter().filter_map(|id| self.unit(*id))
    }
}

/// Course
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course id
    pub id: CourseId,
    /// Ordered ids of every section of the course
    pub section_ids: Vec<SectionId>,
    /// Sections loaded so far
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    /// Loaded sections in `section_ids` order
    pub fn ordered_sections(&self) -> impl Iterator<Item = &Section> {
        self.section_ids
            .iter()
            .filter_map(|id| self.sections.iter().find(|section| section.id == *id))
    }
}

fn default_true() -> bool {
    true
}
