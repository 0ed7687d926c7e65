use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::client::{form_body, ManagementClient};
use crate::{
    domain::{errors::ProviderResult, models::JobStatus, value_objects::JobId},
    ports::{Auth, PersistentFop},
};

/// Submits and queries persistent processing jobs on the api host
#[derive(Clone)]
pub struct QiniuFop {
    client: ManagementClient,
    host: String,
}

impl QiniuFop {
    pub fn new(http: Client, auth: Arc<dyn Auth>, host: impl Into<String>) -> Self {
        Self {
            client: ManagementClient::new(http, auth),
            host: host.into(),
        }
    }
}

#[derive(Deserialize)]
struct Submitted {
    #[serde(rename = "persistentId")]
    persistent_id: String,
}

#[async_trait]
impl PersistentFop for QiniuFop {
    async fn execute(
        &self,
        bucket: &str,
        key: &str,
        fops: &str,
        pipeline: Option<&str>,
        notify_url: Option<&str>,
        force: bool,
    ) -> ProviderResult<JobId> {
        let mut fields = vec![("bucket", bucket), ("key", key), ("fops", fops)];
        if let Some(url) = notify_url {
            fields.push(("notifyURL", url));
        }
        if force {
            fields.push(("force", "1"));
        }
        if let Some(pipeline) = pipeline {
            fields.push(("pipeline", pipeline));
        }

        let submitted: Submitted = self
            .client
            .post(&self.host, "/pfop/", Some(form_body(&fields)))
            .await?;
        debug!(id = %submitted.persistent_id, bucket, key, "fop submitted");
        Ok(JobId::new(submitted.persistent_id))
    }

    async fn status(&self, id: &JobId) -> ProviderResult<JobStatus> {
        let path = format!("/status/get/prefop?{}", form_body(&[("id", id.as_str())]));
        self.client.get(&self.host, &path).await
    }
}
