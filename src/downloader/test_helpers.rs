//! Shared test helpers: in-memory collaborators and syllabus fixtures.

use crate::config::Config;
use crate::downloader::SyllabusDownloader;
use crate::error::{Error, Result};
use crate::services::{
    ContentStore, MetadataFetchService, Services, TransferEngine, TransferEvent,
    TransferEventSink, VideoFileStore,
};
use crate::syllabus::{Course, Lesson, Section, Step, Unit, Video, VideoUrl};
use crate::tree::{Source, SyllabusTreeNode};
use crate::types::{CourseId, LessonId, SectionId, StepId, UnitId, VideoId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// File store backed by a set of stored video ids
#[derive(Default)]
pub(crate) struct MemoryFileStore {
    files: Mutex<HashSet<VideoId>>,
    failing: Mutex<HashSet<VideoId>>,
}

impl MemoryFileStore {
    pub(crate) fn insert(&self, video: VideoId) {
        self.files.lock().unwrap().insert(video);
    }

    pub(crate) fn contains(&self, video: VideoId) -> bool {
        self.files.lock().unwrap().contains(&video)
    }

    /// Make removal of this video fail with an I/O error
    pub(crate) fn fail_removal_of(&self, video: VideoId) {
        self.failing.lock().unwrap().insert(video);
    }
}

#[async_trait]
impl VideoFileStore for MemoryFileStore {
    fn exists(&self, video: VideoId) -> bool {
        self.contains(video)
    }

    async fn remove(&self, video: VideoId) -> Result<()> {
        if self.failing.lock().unwrap().contains(&video) {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("cannot remove video {video}"),
            )));
        }
        self.files.lock().unwrap().remove(&video);
        Ok(())
    }
}

/// Transfer engine recording every request
#[derive(Default)]
pub(crate) struct FakeTransferEngine {
    sink: Mutex<Option<TransferEventSink>>,
    started: Mutex<Vec<SyllabusTreeNode>>,
    cancelled: Mutex<Vec<SyllabusTreeNode>>,
    restored: Mutex<Vec<SyllabusTreeNode>>,
    progress: Mutex<HashMap<VideoId, f32>>,
    rejected_units: Mutex<HashSet<UnitId>>,
    fail_cancel: Mutex<bool>,
}

impl FakeTransferEngine {
    pub(crate) fn set_progress(&self, video: VideoId, progress: f32) {
        self.progress.lock().unwrap().insert(video, progress);
    }

    /// Reject start/restore requests whose tree contains this unit
    pub(crate) fn reject_unit(&self, unit: UnitId) {
        self.rejected_units.lock().unwrap().insert(unit);
    }

    pub(crate) fn fail_cancel(&self) {
        *self.fail_cancel.lock().unwrap() = true;
    }

    pub(crate) fn started(&self) -> Vec<SyllabusTreeNode> {
        self.started.lock().unwrap().clone()
    }

    pub(crate) fn cancelled(&self) -> Vec<SyllabusTreeNode> {
        self.cancelled.lock().unwrap().clone()
    }

    pub(crate) fn restored(&self) -> Vec<SyllabusTreeNode> {
        self.restored.lock().unwrap().clone()
    }

    /// Report an event the way a real engine would, from any task
    pub(crate) fn emit(&self, event: TransferEvent) {
        let sink = self.sink.lock().unwrap().clone();
        sink.expect("engine not attached").send(event).unwrap();
    }

    fn check_rejected(&self, tree: &SyllabusTreeNode) -> Result<()> {
        let rejected = self.rejected_units.lock().unwrap();
        if contains_unit(tree, &rejected) {
            return Err(Error::Transfer("engine rejected the request".into()));
        }
        Ok(())
    }
}

fn contains_unit(tree: &SyllabusTreeNode, units: &HashSet<UnitId>) -> bool {
    matches!(&tree.source, Source::Unit(id) if units.contains(id))
        || tree.children.iter().any(|child| contains_unit(child, units))
}

#[async_trait]
impl TransferEngine for FakeTransferEngine {
    fn attach(&self, sink: TransferEventSink) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    async fn start(&self, tree: &SyllabusTreeNode) -> Result<()> {
        self.check_rejected(tree)?;
        self.started.lock().unwrap().push(tree.clone());
        Ok(())
    }

    async fn cancel(&self, tree: &SyllabusTreeNode) -> Result<()> {
        if *self.fail_cancel.lock().unwrap() {
            return Err(Error::Transfer("cancel failed".into()));
        }
        self.cancelled.lock().unwrap().push(tree.clone());
        Ok(())
    }

    async fn restore(&self, tree: &SyllabusTreeNode) -> Result<()> {
        self.check_rejected(tree)?;
        self.restored.lock().unwrap().push(tree.clone());
        Ok(())
    }

    fn progress_for(&self, video: VideoId) -> Option<f32> {
        self.progress.lock().unwrap().get(&video).copied()
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Metadata service serving a fixed set of steps
#[derive(Default)]
pub(crate) struct StaticMetadataService {
    steps: Mutex<HashMap<StepId, Step>>,
    calls: Mutex<Vec<Vec<StepId>>>,
}

impl StaticMetadataService {
    pub(crate) fn add(&self, step: Step) {
        self.steps.lock().unwrap().insert(step.id, step);
    }

    pub(crate) fn calls(&self) -> Vec<Vec<StepId>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataFetchService for StaticMetadataService {
    async fn fetch_steps(&self, ids: &[StepId]) -> Result<Vec<Step>> {
        self.calls.lock().unwrap().push(ids.to_vec());
        let steps = self.steps.lock().unwrap();
        // Reverse to make sure callers do not rely on service order
        Ok(ids
            .iter()
            .rev()
            .filter_map(|id| steps.get(id).cloned())
            .collect())
    }
}

/// Content store keeping cached qualities in memory
#[derive(Default)]
pub(crate) struct MemoryContentStore {
    qualities: Mutex<HashMap<VideoId, Option<String>>>,
}

impl MemoryContentStore {
    /// Last recorded quality; outer `None` when never written
    pub(crate) fn cached_quality(&self, video: VideoId) -> Option<Option<String>> {
        self.qualities.lock().unwrap().get(&video).cloned()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn set_cached_quality(&self, video: VideoId, quality: Option<String>) -> Result<()> {
        self.qualities.lock().unwrap().insert(video, quality);
        Ok(())
    }
}

/// Downloader wired to in-memory collaborators
pub(crate) struct TestHarness {
    pub(crate) downloader: SyllabusDownloader,
    pub(crate) store: Arc<MemoryFileStore>,
    pub(crate) engine: Arc<FakeTransferEngine>,
    pub(crate) metadata: Arc<StaticMetadataService>,
    pub(crate) content: Arc<MemoryContentStore>,
}

/// Helper to create a test SyllabusDownloader with in-memory collaborators
pub(crate) async fn create_test_downloader() -> TestHarness {
    let store = Arc::new(MemoryFileStore::default());
    let engine = Arc::new(FakeTransferEngine::default());
    let metadata = Arc::new(StaticMetadataService::default());
    let content = Arc::new(MemoryContentStore::default());

    let services = Services {
        file_store: store.clone(),
        metadata: metadata.clone(),
        engine: engine.clone(),
        content: content.clone(),
    };

    let downloader = SyllabusDownloader::new(Config::default(), services)
        .await
        .unwrap();

    TestHarness {
        downloader,
        store,
        engine,
        metadata,
        content,
    }
}

pub(crate) fn video(id: i64) -> Video {
    Video {
        id: VideoId(id),
        cached_quality: None,
        urls: ["360", "720"]
            .iter()
            .map(|quality| VideoUrl {
                quality: quality.to_string(),
                url: url::Url::parse(&format!("https://cdn.example.com/{id}/{quality}.mp4"))
                    .unwrap(),
            })
            .collect(),
    }
}

pub(crate) fn video_step(step: i64, video_id: i64) -> Step {
    Step::video(StepId(step), video(video_id))
}

pub(crate) fn text_step(step: i64) -> Step {
    Step::other(StepId(step), "text")
}

/// Unit whose lesson (same id as the unit) has every step loaded
pub(crate) fn loaded_unit(id: i64, steps: Vec<Step>) -> Unit {
    Unit {
        id: UnitId(id),
        lesson: Some(Lesson {
            id: LessonId(id),
            step_ids: steps.iter().map(|step| step.id).collect(),
            steps,
        }),
    }
}

/// Reachable, non-exam section listing exactly the given units
pub(crate) fn section_with(id: i64, units: Vec<Unit>) -> Section {
    Section {
        id: SectionId(id),
        unit_ids: units.iter().map(|unit| unit.id).collect(),
        units,
        is_exam: false,
        is_reachable: true,
    }
}

pub(crate) fn course_with(id: i64, sections: Vec<Section>) -> Course {
    Course {
        id: CourseId(id),
        section_ids: sections.iter().map(|section| section.id).collect(),
        sections,
    }
}

/// Receive the next event or fail after one second
pub(crate) async fn next_event(
    events: &mut tokio::sync::broadcast::Receiver<crate::types::Event>,
) -> crate::types::Event {
    tokio::time::timeout(std::time::Duration::from_secs(1), events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}
