//! Configuration types for syllabus-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Download behavior configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Preferred video quality, e.g. "720" (default: "720")
    ///
    /// The highest available quality not above this value is picked; when every
    /// quality is above it, the lowest one is used.
    #[serde(default = "default_video_quality")]
    pub video_quality: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            video_quality: default_video_quality(),
        }
    }
}

/// Local media storage configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding downloaded videos (default: "./videos")
    #[serde(default = "default_video_dir")]
    pub video_dir: PathBuf,

    /// File extension of stored videos (default: "mp4")
    #[serde(default = "default_video_extension")]
    pub video_extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            video_dir: default_video_dir(),
            video_extension: default_video_extension(),
        }
    }
}

/// Event delivery configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventConfig {
    /// Broadcast buffer per subscriber (default: 1000)
    ///
    /// A subscriber that falls further behind receives `RecvError::Lagged`.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Main configuration for SyllabusDownloader
///
/// Sub-configs are flattened, so the serialized form has no nesting.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// Local media storage
    #[serde(flatten)]
    pub storage: StorageConfig,

    /// Event delivery
    #[serde(flatten)]
    pub events: EventConfig,
}

impl Config {
    /// Preferred video quality
    pub fn video_quality(&self) -> &str {
        &self.download.video_quality
    }

    /// Video storage directory
    pub fn video_dir(&self) -> &PathBuf {
        &self.storage.video_dir
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.download.video_quality.trim().is_empty() {
            return Err(Error::config("video_quality", "video quality must not be empty"));
        }
        if self.storage.video_extension.trim().is_empty() {
            return Err(Error::config(
                "video_extension",
                "video file extension must not be empty",
            ));
        }
        if self.events.event_channel_capacity == 0 {
            return Err(Error::config(
                "event_channel_capacity",
                "event channel capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_video_quality() -> String {
    "720".to_string()
}

fn default_video_dir() -> PathBuf {
    PathBuf::from("./videos")
}

fn default_video_extension() -> String {
    "mp4".to_string()
}

fn default_event_channel_capacity() -> usize {
    1000
}
