use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    state::{BAD_REQUEST, NO_SUCH_ENTRY},
    InMemoryProvider,
};
use crate::{
    domain::{
        errors::{ProviderError, ProviderResult},
        models::{JobItem, JobState, JobStatus},
        value_objects::JobId,
    },
    ports::{Auth, PersistentFop},
};

/// Description the provider reports for each job state
pub(crate) fn state_description(state: JobState) -> &'static str {
    match state {
        JobState::Succeeded => "The fop was completed successfully",
        JobState::Waiting => "The fop is waiting to be processed",
        JobState::Processing => "The fop is processing now",
        JobState::Failed => "The fop is failed",
        JobState::NotifyFailed => "Callback failed",
        JobState::Unknown(_) => "Unknown state",
    }
}

/// Persistent fop service that records jobs without running them.
///
/// Jobs stay waiting until [`InMemoryProvider::complete_job`] moves them on.
#[derive(Clone)]
pub struct InMemoryFop {
    provider: InMemoryProvider,
    auth: Arc<dyn Auth>,
}

impl InMemoryFop {
    pub fn new(provider: InMemoryProvider, auth: Arc<dyn Auth>) -> Self {
        Self { provider, auth }
    }
}

#[async_trait]
impl PersistentFop for InMemoryFop {
    async fn execute(
        &self,
        bucket: &str,
        key: &str,
        fops: &str,
        pipeline: Option<&str>,
        _notify_url: Option<&str>,
        _force: bool,
    ) -> ProviderResult<JobId> {
        if fops.trim().is_empty() {
            return Err(ProviderError::new(BAD_REQUEST, "invalid fops"));
        }

        let mut state = self.provider.state.write().await;
        state.object(bucket, key)?;

        let waiting = JobState::Waiting;
        let id = JobId::new(format!("z0.{}", Uuid::new_v4().simple()));
        let items = fops
            .split(';')
            .filter(|cmd| !cmd.is_empty())
            .map(|cmd| JobItem {
                cmd: cmd.to_string(),
                code: waiting.code(),
                desc: state_description(waiting).to_string(),
                error: None,
                hash: None,
                key: None,
                return_old: 0,
            })
            .collect();

        let status = JobStatus {
            id: id.clone(),
            code: waiting.code(),
            desc: state_description(waiting).to_string(),
            input_key: key.to_string(),
            input_bucket: bucket.to_string(),
            items,
            pipeline: pipeline.map(str::to_string),
            reqid: Some(format!("{}-{}", self.auth.access_key(), Uuid::new_v4().simple())),
        };
        state.jobs.insert(id.as_str().to_string(), status);

        Ok(id)
    }

    async fn status(&self, id: &JobId) -> ProviderResult<JobStatus> {
        let state = self.provider.state.read().await;
        state
            .jobs
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ProviderError::new(NO_SUCH_ENTRY, format!("no such persistent id: {}", id)))
    }
}
