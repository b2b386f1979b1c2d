//! Work trees submitted to the transfer engine
//!
//! A [`SyllabusTreeNode`] is built fresh for every download, cancel, remove or
//! restore request and is never persisted. Download trees skip videos already
//! on disk; cancel/remove trees keep every video so a cancel still reaches a
//! transfer whose file appeared in the meantime.

use std::sync::Arc;

use crate::error::DownloadError;
use crate::services::VideoFileStore;
use crate::syllabus::{Section, Step, Video};
use crate::types::{CourseId, SectionId, StepId, SyllabusEntity, UnitId, VideoId};

/// Tag identifying what a tree node stands for
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// Whole course
    Course(CourseId),
    /// Section
    Section(SectionId),
    /// Unit
    Unit(UnitId),
    /// Step
    Step(StepId),
    /// Single video transfer
    Video {
        /// Video to transfer
        video: Video,
        /// Rendition picked for the transfer, `None` when the video has no URLs
        quality: Option<String>,
    },
}

impl Source {
    /// Public identity used in emitted events; course and step nodes have none
    pub fn entity(&self) -> Option<SyllabusEntity> {
        match self {
            Source::Video { video, .. } => Some(SyllabusEntity::Video(video.id)),
            Source::Unit(id) => Some(SyllabusEntity::Unit(*id)),
            Source::Section(id) => Some(SyllabusEntity::Section(*id)),
            Source::Course(_) | Source::Step(_) => None,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Course(id) => write!(f, "course {}", id),
            Source::Section(id) => write!(f, "section {}", id),
            Source::Unit(id) => write!(f, "unit {}", id),
            Source::Step(id) => write!(f, "step {}", id),
            Source::Video { video, .. } => write!(f, "video {}", video.id),
        }
    }
}

/// Node of a work tree
#[derive(Clone, Debug, PartialEq)]
pub struct SyllabusTreeNode {
    /// What this node stands for
    pub source: Source,
    /// Ordered children
    pub children: Vec<SyllabusTreeNode>,
}

impl SyllabusTreeNode {
    /// Node without children
    pub fn leaf(source: Source) -> Self {
        Self {
            source,
            children: Vec::new(),
        }
    }

    /// Node with children
    pub fn with_children(source: Source, children: Vec<SyllabusTreeNode>) -> Self {
        Self { source, children }
    }

    /// A node without children carries no work
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every video node in the tree, depth first
    pub fn videos(&self) -> Vec<(&Video, Option<&str>)> {
        let mut out = Vec::new();
        self.collect_videos(&mut out);
        out
    }

    /// Ids of every video in the tree
    pub fn video_ids(&self) -> Vec<VideoId> {
        self.videos().into_iter().map(|(video, _)| video.id).collect()
    }

    fn collect_videos<'a>(&'a self, out: &mut Vec<(&'a Video, Option<&'a str>)>) {
        if let Source::Video { video, quality } = &self.source {
            out.push((video, quality.as_deref()));
        }
        for child in &self.children {
            child.collect_videos(out);
        }
    }
}

/// Which rule a tree is built with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Purpose {
    Download,
    CancelOrRemove,
}

/// Builds minimal work trees for units and sections
#[derive(Clone)]
pub struct SyllabusTreeBuilder {
    file_store: Arc<dyn VideoFileStore>,
    video_quality: String,
}

impl SyllabusTreeBuilder {
    /// Create a builder probing `file_store` and picking renditions for `video_quality`
    pub fn new(file_store: Arc<dyn VideoFileStore>, video_quality: impl Into<String>) -> Self {
        Self {
            file_store,
            video_quality: video_quality.into(),
        }
    }

    /// Unit tree with one step child per video step whose file is not stored yet.
    ///
    /// A fully stored unit yields a node without children, which callers treat
    /// as nothing to do. Videos without any URL are left out as they cannot be
    /// fetched.
    pub fn unit_for_download(&self, unit: UnitId, steps: &[Step]) -> SyllabusTreeNode {
        self.unit_tree(unit, steps, Purpose::Download)
    }

    /// Unit tree with every video step, stored or not
    pub fn unit_for_cancel_or_remove(&self, unit: UnitId, steps: &[Step]) -> SyllabusTreeNode {
        self.unit_tree(unit, steps, Purpose::CancelOrRemove)
    }

    /// Section tree wrapping one download tree per unit.
    ///
    /// Fails without building anything when a unit is not loaded or its lesson
    /// steps are not all resolved.
    pub fn section_for_download(
        &self,
        section: &Section,
    ) -> Result<SyllabusTreeNode, DownloadError> {
        self.section_tree(section, Purpose::Download)
            .map_err(|unit| DownloadError::DownloadSectionFailed {
                section: section.id,
                unit,
            })
    }

    /// Section tree wrapping one cancel/remove tree per unit
    pub fn section_for_cancel(&self, section: &Section) -> Result<SyllabusTreeNode, DownloadError> {
        self.section_tree(section, Purpose::CancelOrRemove)
            .map_err(|unit| DownloadError::CancelSectionFailed {
                section: section.id,
                unit: Some(unit),
                reason: format!("unit {unit} is not fully loaded"),
            })
    }

    fn section_tree(
        &self,
        section: &Section,
        purpose: Purpose,
    ) -> Result<SyllabusTreeNode, UnitId> {
        let mut children = Vec::with_capacity(section.unit_ids.len());
        for unit_id in &section.unit_ids {
            let lesson = section
                .unit(*unit_id)
                .and_then(|unit| unit.lesson.as_ref())
                .filter(|lesson| lesson.steps_resolved())
                .ok_or(*unit_id)?;
            children.push(self.unit_tree(*unit_id, &lesson.steps, purpose));
        }
        Ok(SyllabusTreeNode::with_children(
            Source::Section(section.id),
            children,
        ))
    }

    fn unit_tree(&self, unit: UnitId, steps: &[Step], purpose: Purpose) -> SyllabusTreeNode {
        let children = steps
            .iter()
            .filter_map(|step| {
                let video = step.video_block()?;
                let quality = video
                    .select_url(&self.video_quality)
                    .map(|rendition| rendition.quality.clone());

                if purpose == Purpose::Download {
                    if self.file_store.exists(video.id) {
                        return None;
                    }
                    if quality.is_none() {
                        tracing::debug!(
                            unit_id = unit.0,
                            video_id = video.id.0,
                            "Skipping video without downloadable renditions"
                        );
                        return None;
                    }
                }

                let video_node = SyllabusTreeNode::leaf(Source::Video {
                    video: video.clone(),
                    quality,
                });
                Some(SyllabusTreeNode::with_children(
                    Source::Step(step.id),
                    vec![video_node],
                ))
            })
            .collect();

        SyllabusTreeNode::with_children(Source::Unit(unit), children)
    }
}
