//! Scripted transfer engine writing real files into a local video store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use syllabus_dl::{
    ContentStore, LocalVideoFileStore, Result, Source, SyllabusTreeNode, TransferEngine,
    TransferEvent, TransferEventSink, Video, VideoId,
};

/// Engine that accepts work immediately and finishes it on demand
///
/// Submitted videos report progress 0.0 until [`finish_all`](Self::finish_all)
/// writes their files and reports completion.
pub struct ScriptedEngine {
    store: LocalVideoFileStore,
    sink: Mutex<Option<TransferEventSink>>,
    pending: Mutex<Vec<(Video, Option<String>)>>,
    progress: Mutex<HashMap<VideoId, f32>>,
    submissions: Mutex<usize>,
}

impl ScriptedEngine {
    pub fn new(store: LocalVideoFileStore) -> Self {
        Self {
            store,
            sink: Mutex::new(None),
            pending: Mutex::new(Vec::new()),
            progress: Mutex::new(HashMap::new()),
            submissions: Mutex::new(0),
        }
    }

    /// Number of start and restore requests accepted so far
    pub fn submissions(&self) -> usize {
        *self.submissions.lock().unwrap()
    }

    /// Write every pending video to disk and report completion
    pub async fn finish_all(&self) {
        let pending: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        for (video, quality) in pending {
            tokio::fs::create_dir_all(self.store.dir()).await.unwrap();
            tokio::fs::write(self.store.path_for(video.id), b"video bytes")
                .await
                .unwrap();
            self.progress.lock().unwrap().remove(&video.id);
            self.send(TransferEvent::Completed {
                source: Source::Video { video, quality },
                success: true,
            });
        }
    }

    fn accept(&self, tree: &SyllabusTreeNode) {
        *self.submissions.lock().unwrap() += 1;
        for (video, quality) in tree.videos() {
            self.progress.lock().unwrap().insert(video.id, 0.0);
            self.pending
                .lock()
                .unwrap()
                .push((video.clone(), quality.map(str::to_string)));
        }
        self.send(TransferEvent::Progress {
            source: tree.source.clone(),
            progress: 0.0,
        });
    }

    fn send(&self, event: TransferEvent) {
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink.send(event).ok();
        }
    }
}

#[async_trait]
impl TransferEngine for ScriptedEngine {
    fn attach(&self, sink: TransferEventSink) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    async fn start(&self, tree: &SyllabusTreeNode) -> Result<()> {
        self.accept(tree);
        Ok(())
    }

    async fn cancel(&self, tree: &SyllabusTreeNode) -> Result<()> {
        let ids = tree.video_ids();
        self.pending
            .lock()
            .unwrap()
            .retain(|(video, _)| !ids.contains(&video.id));
        let mut progress = self.progress.lock().unwrap();
        for id in ids {
            progress.remove(&id);
        }
        Ok(())
    }

    async fn restore(&self, tree: &SyllabusTreeNode) -> Result<()> {
        self.accept(tree);
        Ok(())
    }

    fn progress_for(&self, video: VideoId) -> Option<f32> {
        self.progress.lock().unwrap().get(&video).copied()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Content store remembering the last cached quality per video
#[derive(Default)]
pub struct RecordingContentStore {
    qualities: Mutex<HashMap<VideoId, Option<String>>>,
}

impl RecordingContentStore {
    pub fn cached_quality(&self, video: VideoId) -> Option<String> {
        self.qualities.lock().unwrap().get(&video).cloned().flatten()
    }
}

#[async_trait]
impl ContentStore for RecordingContentStore {
    async fn set_cached_quality(&self, video: VideoId, quality: Option<String>) -> Result<()> {
        self.qualities.lock().unwrap().insert(video, quality);
        Ok(())
    }
}
