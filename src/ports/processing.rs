use async_trait::async_trait;

use crate::domain::{errors::ProviderResult, models::JobStatus, value_objects::JobId};

/// Port for the persistent processing (fop) service
#[async_trait]
pub trait PersistentFop: Send + Sync + 'static {
    /// Submit `fops` against `bucket:key` and return the new job id
    async fn execute(
        &self,
        bucket: &str,
        key: &str,
        fops: &str,
        pipeline: Option<&str>,
        notify_url: Option<&str>,
        force: bool,
    ) -> ProviderResult<JobId>;

    /// Query the current status of a job
    async fn status(&self, id: &JobId) -> ProviderResult<JobStatus>;
}
