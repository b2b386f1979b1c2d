use super::test_helpers::*;
use super::*;
use crate::error::DownloadError;
use crate::services::TransferEvent;
use crate::tree::Source;
use crate::types::{DownloadState, SectionId, StepId, SyllabusEntity, UnitId, VideoId};
