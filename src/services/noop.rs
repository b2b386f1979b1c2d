//! No-op metadata service for graceful degradation

use super::traits::MetadataFetchService;
use crate::syllabus::Step;
use crate::types::StepId;
use async_trait::async_trait;

/// Metadata service used when no network layer is wired in
///
/// Every fetch fails with `Error::NotSupported`, so units whose steps are not
/// already loaded report the failure instead of downloading partially. Units
/// with fully loaded lessons never reach the service.
///
/// # Examples
///
/// ```
/// use syllabus_dl::services::{MetadataFetchService, NoOpMetadataService};
/// use syllabus_dl::StepId;
///
/// # #[tokio::main]
/// # async fn main() {
/// let service = NoOpMetadataService;
/// assert!(service.fetch_steps(&[StepId(1)]).await.is_err());
/// assert!(service.fetch_steps(&[]).await.unwrap().is_empty());
/// # }
/// ```
pub struct NoOpMetadataService;

#[async_trait]
impl MetadataFetchService for NoOpMetadataService {
    async fn fetch_steps(&self, ids: &[StepId]) -> crate::Result<Vec<Step>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Err(crate::Error::NotSupported(format!(
            "fetching {} step(s) requires a metadata service. \
             Load lesson steps before downloading or provide a MetadataFetchService.",
            ids.len()
        )))
    }
}
