use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use super::client::{form_body, ManagementClient, QiniuEndpoints};
use crate::{
    domain::{
        encoding::{encoded_entry, urlsafe_base64},
        errors::ProviderResult,
        models::{
            BatchItemResult, BatchOperation, FetchResult, FileInfo, ListFilesResult, ListOptions,
        },
        value_objects::{FileStatus, FileType},
    },
    ports::{Auth, BucketManager},
};

/// Bucket and object management over the rs, rsf, uc, api and io hosts
#[derive(Clone)]
pub struct QiniuBucketManager {
    client: ManagementClient,
    endpoints: QiniuEndpoints,
}

impl QiniuBucketManager {
    pub fn new(http: Client, auth: Arc<dyn Auth>, endpoints: QiniuEndpoints) -> Self {
        Self {
            client: ManagementClient::new(http, auth),
            endpoints,
        }
    }

    /// Run a single resource operation on the rs host
    async fn rs(&self, operation: BatchOperation) -> ProviderResult<()> {
        self.client
            .post_empty(&self.endpoints.rs, &operation.to_command())
            .await
    }
}

#[async_trait]
impl BucketManager for QiniuBucketManager {
    async fn buckets(&self, shared: bool) -> ProviderResult<Vec<String>> {
        let path = if shared { "/buckets?shared=rd" } else { "/buckets" };
        self.client.get(&self.endpoints.uc, path).await
    }

    async fn domains(&self, bucket: &str) -> ProviderResult<Vec<String>> {
        let path = format!("/v6/domain/list?{}", form_body(&[("tbl", bucket)]));
        self.client.get(&self.endpoints.api, &path).await
    }

    async fn list_files(
        &self,
        bucket: &str,
        options: &ListOptions,
    ) -> ProviderResult<ListFilesResult> {
        let limit = options.limit.to_string();
        let mut query = vec![("bucket", bucket), ("limit", limit.as_str())];
        if let Some(prefix) = &options.prefix {
            query.push(("prefix", prefix.as_str()));
        }
        if let Some(marker) = &options.marker {
            query.push(("marker", marker.as_str()));
        }
        if let Some(delimiter) = &options.delimiter {
            query.push(("delimiter", delimiter.as_str()));
        }

        let path = format!("/list?{}", form_body(&query));
        let mut page: ListFilesResult = self.client.get(&self.endpoints.rsf, &path).await?;
        // The last page carries an empty marker
        page.marker = page.marker.filter(|marker| !marker.is_empty());
        Ok(page)
    }

    async fn stat(&self, bucket: &str, key: &str) -> ProviderResult<FileInfo> {
        let operation = BatchOperation::Stat {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
        self.client
            .post(&self.endpoints.rs, &operation.to_command(), None)
            .await
    }

    async fn delete(&self, bucket: &str, key: &str) -> ProviderResult<()> {
        self.rs(BatchOperation::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
        .await
    }

    async fn rename(&self, bucket: &str, old_key: &str, new_key: &str) -> ProviderResult<()> {
        self.move_object(bucket, old_key, bucket, new_key, false)
            .await
    }

    async fn copy(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
        force: bool,
    ) -> ProviderResult<()> {
        self.rs(BatchOperation::Copy {
            from_bucket: from_bucket.to_string(),
            from_key: from_key.to_string(),
            to_bucket: to_bucket.to_string(),
            to_key: to_key.to_string(),
            force,
        })
        .await
    }

    async fn move_object(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
        force: bool,
    ) -> ProviderResult<()> {
        self.rs(BatchOperation::Move {
            from_bucket: from_bucket.to_string(),
            from_key: from_key.to_string(),
            to_bucket: to_bucket.to_string(),
            to_key: to_key.to_string(),
            force,
        })
        .await
    }

    async fn change_mime(&self, bucket: &str, key: &str, mime: &str) -> ProviderResult<()> {
        self.rs(BatchOperation::ChangeMime {
            bucket: bucket.to_string(),
            key: key.to_string(),
            mime: mime.to_string(),
        })
        .await
    }

    async fn change_type(
        &self,
        bucket: &str,
        key: &str,
        file_type: FileType,
    ) -> ProviderResult<()> {
        self.rs(BatchOperation::ChangeType {
            bucket: bucket.to_string(),
            key: key.to_string(),
            file_type,
        })
        .await
    }

    async fn change_status(
        &self,
        bucket: &str,
        key: &str,
        status: FileStatus,
    ) -> ProviderResult<()> {
        self.rs(BatchOperation::ChangeStatus {
            bucket: bucket.to_string(),
            key: key.to_string(),
            status,
        })
        .await
    }

    async fn fetch(
        &self,
        url: &str,
        bucket: &str,
        key: Option<&str>,
    ) -> ProviderResult<FetchResult> {
        let target = match key {
            Some(key) => encoded_entry(bucket, key),
            None => urlsafe_base64(bucket),
        };
        let path = format!("/fetch/{}/to/{}", urlsafe_base64(url), target);
        self.client.post(&self.endpoints.io, &path, None).await
    }

    async fn prefetch(&self, bucket: &str, key: &str) -> ProviderResult<()> {
        let path = format!("/prefetch/{}", encoded_entry(bucket, key));
        self.client.post_empty(&self.endpoints.io, &path).await
    }

    async fn batch(&self, operations: &[BatchOperation]) -> ProviderResult<Vec<BatchItemResult>> {
        let commands: Vec<String> = operations.iter().map(BatchOperation::to_command).collect();
        let pairs: Vec<(&str, &str)> = commands.iter().map(|c| ("op", c.as_str())).collect();
        self.client
            .post(&self.endpoints.rs, "/batch", Some(form_body(&pairs)))
            .await
    }

    async fn delete_after_days(&self, bucket: &str, key: &str, days: u32) -> ProviderResult<()> {
        self.rs(BatchOperation::DeleteAfterDays {
            bucket: bucket.to_string(),
            key: key.to_string(),
            days,
        })
        .await
    }
}
