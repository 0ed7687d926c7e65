use async_trait::async_trait;
use serde_json::json;
use std::{collections::BTreeSet, sync::Arc};
use tracing::debug;

use super::{
    state::{BAD_REQUEST, SOURCE_FETCH_FAILED},
    InMemoryProvider,
};
use crate::{
    domain::{
        errors::{ProviderError, ProviderResult},
        models::{
            BatchItemResult, BatchOperation, FetchResult, FileInfo, ListFilesResult, ListItem,
            ListOptions,
        },
        value_objects::{FileStatus, FileType},
    },
    ports::{Auth, BucketManager},
};

/// Largest page a listing returns
const MAX_LIST_LIMIT: usize = 1000;

/// Bucket manager over the shared in-memory state
#[derive(Clone)]
pub struct InMemoryBucketManager {
    provider: InMemoryProvider,
    auth: Arc<dyn Auth>,
}

impl InMemoryBucketManager {
    pub fn new(provider: InMemoryProvider, auth: Arc<dyn Auth>) -> Self {
        Self { provider, auth }
    }

    async fn apply(&self, op: BatchOperation) -> ProviderResult<Option<FileInfo>> {
        self.provider.state.write().await.apply(&op)
    }

    fn source_failed(url: &str) -> ProviderError {
        ProviderError::new(SOURCE_FETCH_FAILED, format!("fetch {} failed", url))
    }
}

#[async_trait]
impl BucketManager for InMemoryBucketManager {
    async fn buckets(&self, shared: bool) -> ProviderResult<Vec<String>> {
        debug!(account = self.auth.access_key(), shared, "listing buckets");
        let state = self.provider.state.read().await;
        Ok(state
            .buckets
            .iter()
            .filter(|(_, bucket)| shared || !bucket.shared)
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn domains(&self, bucket: &str) -> ProviderResult<Vec<String>> {
        let state = self.provider.state.read().await;
        Ok(state.bucket(bucket)?.domains.clone())
    }

    async fn list_files(
        &self,
        bucket: &str,
        options: &ListOptions,
    ) -> ProviderResult<ListFilesResult> {
        let state = self.provider.state.read().await;
        let objects = &state.bucket(bucket)?.objects;

        let limit = match options.limit {
            0 => MAX_LIST_LIMIT,
            n => n.min(MAX_LIST_LIMIT),
        };
        let prefix = options.prefix.as_deref().unwrap_or("");
        let delimiter = options.delimiter.as_deref().filter(|d| !d.is_empty());

        let mut result = ListFilesResult::default();
        let mut seen_prefixes = BTreeSet::new();
        let mut emitted = 0;
        let mut last_key: Option<&String> = None;

        let candidates = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| options.marker.as_ref().map_or(true, |m| *key > m));

        for (key, object) in candidates {
            let rest = &key[prefix.len()..];
            let common = delimiter.and_then(|delimiter| {
                rest.find(delimiter)
                    .map(|idx| format!("{}{}", prefix, &rest[..idx + delimiter.len()]))
            });

            // Keys under a prefix already on this page are consumed silently
            if let Some(common) = &common {
                if seen_prefixes.contains(common) {
                    last_key = Some(key);
                    continue;
                }
            }

            if emitted == limit {
                result.marker = last_key.cloned();
                break;
            }
            last_key = Some(key);
            emitted += 1;

            match common {
                Some(common) => {
                    seen_prefixes.insert(common.clone());
                    result.common_prefixes.push(common);
                }
                None => result.items.push(ListItem {
                    key: key.clone(),
                    info: object.info.clone(),
                }),
            }
        }

        Ok(result)
    }

    async fn stat(&self, bucket: &str, key: &str) -> ProviderResult<FileInfo> {
        let state = self.provider.state.read().await;
        Ok(state.object(bucket, key)?.info.clone())
    }

    async fn delete(&self, bucket: &str, key: &str) -> ProviderResult<()> {
        self.apply(BatchOperation::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
        .await
        .map(|_| ())
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
        self.apply(BatchOperation::Copy {
            from_bucket: from_bucket.to_string(),
            from_key: from_key.to_string(),
            to_bucket: to_bucket.to_string(),
            to_key: to_key.to_string(),
            force,
        })
        .await
        .map(|_| ())
    }

    async fn move_object(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
        force: bool,
    ) -> ProviderResult<()> {
        self.apply(BatchOperation::Move {
            from_bucket: from_bucket.to_string(),
            from_key: from_key.to_string(),
            to_bucket: to_bucket.to_string(),
            to_key: to_key.to_string(),
            force,
        })
        .await
        .map(|_| ())
    }

    async fn change_mime(&self, bucket: &str, key: &str, mime: &str) -> ProviderResult<()> {
        self.apply(BatchOperation::ChangeMime {
            bucket: bucket.to_string(),
            key: key.to_string(),
            mime: mime.to_string(),
        })
        .await
        .map(|_| ())
    }

    async fn change_type(
        &self,
        bucket: &str,
        key: &str,
        file_type: FileType,
    ) -> ProviderResult<()> {
        self.apply(BatchOperation::ChangeType {
            bucket: bucket.to_string(),
            key: key.to_string(),
            file_type,
        })
        .await
        .map(|_| ())
    }

    async fn change_status(
        &self,
        bucket: &str,
        key: &str,
        status: FileStatus,
    ) -> ProviderResult<()> {
        self.apply(BatchOperation::ChangeStatus {
            bucket: bucket.to_string(),
            key: key.to_string(),
            status,
        })
        .await
        .map(|_| ())
    }

    async fn fetch(
        &self,
        url: &str,
        bucket: &str,
        key: Option<&str>,
    ) -> ProviderResult<FetchResult> {
        let mut state = self.provider.state.write().await;
        state.bucket(bucket)?;
        let data = state
            .remote
            .get(url)
            .cloned()
            .ok_or_else(|| Self::source_failed(url))?;

        let key = match key {
            Some(key) => key.to_string(),
            None => super::state::content_hash(&data),
        };
        let ret = state.store(bucket, &key, data)?;
        let info = state.object(bucket, &ret.key)?.info.clone();

        Ok(FetchResult {
            hash: ret.hash,
            key: ret.key,
            fsize: info.fsize,
            mime_type: info.mime_type,
        })
    }

    async fn prefetch(&self, bucket: &str, key: &str) -> ProviderResult<()> {
        let mut state = self.provider.state.write().await;
        let mirror = state
            .bucket(bucket)?
            .mirror
            .clone()
            .ok_or_else(|| ProviderError::new(BAD_REQUEST, "no mirror source configured"))?;

        let url = format!("{}/{}", mirror.trim_end_matches('/'), key);
        let data = state
            .remote
            .get(&url)
            .cloned()
            .ok_or_else(|| Self::source_failed(&url))?;
        state.store(bucket, key, data).map(|_| ())
    }

    async fn batch(&self, operations: &[BatchOperation]) -> ProviderResult<Vec<BatchItemResult>> {
        if operations.is_empty() {
            return Err(ProviderError::new(BAD_REQUEST, "empty operations"));
        }

        let mut state = self.provider.state.write().await;
        let results = operations
            .iter()
            .map(|op| match state.apply(op) {
                Ok(Some(info)) => BatchItemResult {
                    code: 200,
                    data: serde_json::to_value(info).ok(),
                },
                Ok(None) => BatchItemResult {
                    code: 200,
                    data: None,
                },
                Err(err) => BatchItemResult {
                    code: u16::try_from(err.code()).unwrap_or(599),
                    data: Some(json!({ "error": err.message() })),
                },
            })
            .collect();

        Ok(results)
    }

    async fn delete_after_days(&self, bucket: &str, key: &str, days: u32) -> ProviderResult<()> {
        self.apply(BatchOperation::DeleteAfterDays {
            bucket: bucket.to_string(),
            key: key.to_string(),
            days,
        })
        .await
        .map(|_| ())
    }
}
