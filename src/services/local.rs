//! Directory-backed video file store

use super::traits::VideoFileStore;
use crate::config::Config;
use crate::error::Error;
use crate::types::VideoId;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Stores one file per video as `<dir>/<video_id>.<extension>`
///
/// Transfer engines writing into the same directory should use
/// [`path_for`](Self::path_for) so both sides agree on file names.
///
/// # Examples
///
/// ```
/// use syllabus_dl::services::LocalVideoFileStore;
/// use syllabus_dl::VideoId;
///
/// let store = LocalVideoFileStore::new("/tmp/videos", "mp4");
/// assert_eq!(
///     store.path_for(VideoId(42)),
///     std::path::Path::new("/tmp/videos/42.mp4")
/// );
/// ```
#[derive(Clone, Debug)]
pub struct LocalVideoFileStore {
    dir: PathBuf,
    extension: String,
}

impl LocalVideoFileStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Create a store from the storage section of the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.storage.video_dir.clone(),
            config.storage.video_extension.clone(),
        )
    }

    /// Directory holding the files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the file for a video
    pub fn path_for(&self, video: VideoId) -> PathBuf {
        self.dir.join(format!("{}.{}", video.0, self.extension))
    }
}

#[async_trait]
impl VideoFileStore for LocalVideoFileStore {
    fn exists(&self, video: VideoId) -> bool {
        self.path_for(video).is_file()
    }

    async fn remove(&self, video: VideoId) -> crate::Result<()> {
        let path = self.path_for(video);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(video_id = video.0, path = %path.display(), "Removed video file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to remove video file '{}': {}", path.display(), e),
            ))),
        }
    }
}
