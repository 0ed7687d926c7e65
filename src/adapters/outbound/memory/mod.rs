//! In-memory stand-in for the provider SDK, for development and tests.
//!
//! All managers built from one [`InMemoryProvider`] share the same state.
//! Signing and transport are not modelled.

mod auth;
mod bucket;
mod factory;
mod fop;
mod state;
mod upload;

pub use auth::InMemoryAuth;
pub use bucket::InMemoryBucketManager;
pub use factory::{ConstructionCounts, InMemoryManagerFactory};
pub use fop::InMemoryFop;
pub use upload::InMemoryUploadManager;

use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::models::{FileInfo, JobState};
use state::{BucketState, ProviderState};

/// Shared handle to the in-memory provider state
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    state: Arc<RwLock<ProviderState>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an owned bucket bound to `domains`
    pub async fn create_bucket(&self, name: &str, domains: &[&str]) {
        self.insert_bucket(name, domains, false).await;
    }

    /// Create a bucket shared with this account by another one
    pub async fn create_shared_bucket(&self, name: &str) {
        self.insert_bucket(name, &[], true).await;
    }

    async fn insert_bucket(&self, name: &str, domains: &[&str], shared: bool) {
        let mut state = self.state.write().await;
        state.buckets.insert(
            name.to_string(),
            BucketState {
                domains: domains.iter().map(|d| d.to_string()).collect(),
                shared,
                ..Default::default()
            },
        );
    }

    /// Configure the mirror source `prefetch` pulls from
    pub async fn set_mirror(&self, bucket: &str, base_url: &str) -> bool {
        let mut state = self.state.write().await;
        match state.buckets.get_mut(bucket) {
            Some(b) => {
                b.mirror = Some(base_url.to_string());
                true
            }
            None => false,
        }
    }

    /// Make `data` reachable at `url` for `fetch`/`prefetch`
    pub async fn add_remote(&self, url: &str, data: impl Into<Bytes>) {
        let mut state = self.state.write().await;
        state.remote.insert(url.to_string(), data.into());
    }

    /// Body and metadata of a stored object
    pub async fn object(&self, bucket: &str, key: &str) -> Option<(Bytes, FileInfo)> {
        let state = self.state.read().await;
        state
            .object(bucket, key)
            .ok()
            .map(|o| (o.data.clone(), o.info.clone()))
    }

    pub async fn object_keys(&self, bucket: &str) -> Vec<String> {
        let state = self.state.read().await;
        state
            .buckets
            .get(bucket)
            .map(|b| b.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Scheduled expiry of an object, in days
    pub async fn expiry_days(&self, bucket: &str, key: &str) -> Option<u32> {
        let state = self.state.read().await;
        state.object(bucket, key).ok().and_then(|o| o.delete_after_days)
    }

    /// Move a recorded job to `job_state`. Returns false for unknown ids.
    pub async fn complete_job(&self, id: &str, job_state: JobState) -> bool {
        let mut state = self.state.write().await;
        let Some(job) = state.jobs.get_mut(id) else {
            return false;
        };

        let desc = fop::state_description(job_state).to_string();
        job.code = job_state.code();
        job.desc = desc.clone();
        for item in &mut job.items {
            item.code = job_state.code();
            item.desc = desc.clone();
            if job_state == JobState::Failed {
                item.error = Some("processing failed".to_string());
            }
        }
        true
    }

    pub async fn job_count(&self) -> usize {
        self.state.read().await.jobs.len()
    }
}
