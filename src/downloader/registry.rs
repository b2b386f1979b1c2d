//! Exclusive table of in-flight video transfers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::tree::{Source, SyllabusTreeNode};
use crate::types::{UnitId, VideoId};

/// In-flight videos keyed by id, with the unit they were submitted for
pub(crate) type InFlight = HashMap<VideoId, UnitId>;

/// Mutex-guarded registry shared by submissions, cancels, removals and the
/// event relay.
///
/// Holding the guard is what serializes cache bookkeeping for a video against
/// deletion of its file.
#[derive(Clone, Default)]
pub(crate) struct TransferRegistry {
    inner: Arc<tokio::sync::Mutex<InFlight>>,
}

impl TransferRegistry {
    /// Acquire exclusive access to the table
    pub(crate) async fn lock(&self) -> tokio::sync::MutexGuard<'_, InFlight> {
        self.inner.lock().await
    }

    /// Record every video of a submitted tree
    pub(crate) async fn track(&self, tree: &SyllabusTreeNode) {
        let mut in_flight = self.inner.lock().await;
        for (video, unit) in unit_videos(tree) {
            in_flight.insert(video, unit);
        }
    }

    /// Forget every video of a tree
    pub(crate) async fn untrack(&self, tree: &SyllabusTreeNode) {
        let mut in_flight = self.inner.lock().await;
        for video in tree.video_ids() {
            in_flight.remove(&video);
        }
    }

    /// Sorted ids of in-flight videos
    pub(crate) async fn snapshot(&self) -> Vec<VideoId> {
        let mut videos: Vec<VideoId> = self.inner.lock().await.keys().copied().collect();
        videos.sort();
        videos
    }
}

/// Videos of a tree paired with their nearest unit ancestor
fn unit_videos(tree: &SyllabusTreeNode) -> Vec<(VideoId, UnitId)> {
    fn walk(node: &SyllabusTreeNode, unit: Option<UnitId>, out: &mut Vec<(VideoId, UnitId)>) {
        let unit = match &node.source {
            Source::Unit(id) => Some(*id),
            _ => unit,
        };
        if let (Source::Video { video, .. }, Some(unit)) = (&node.source, unit) {
            out.push((video.id, unit));
        }
        for child in &node.children {
            walk(child, unit, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, None, &mut out);
    out
}
