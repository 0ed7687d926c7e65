use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use super::{
    auth::decode_token,
    state::{content_hash, file_exists, BAD_TOKEN, LOCAL_ERROR, SCOPE_MISMATCH},
    InMemoryProvider,
};
use crate::{
    domain::{
        errors::{ProviderError, ProviderResult},
        models::PutRet,
    },
    ports::UploadManager,
};

/// Upload manager storing bodies in the shared in-memory state
#[derive(Clone)]
pub struct InMemoryUploadManager {
    provider: InMemoryProvider,
}

impl InMemoryUploadManager {
    pub fn new(provider: InMemoryProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl UploadManager for InMemoryUploadManager {
    async fn put(&self, token: &str, key: &str, data: Bytes) -> ProviderResult<PutRet> {
        let policy =
            decode_token(token).ok_or_else(|| ProviderError::new(BAD_TOKEN, "bad token"))?;

        let now = chrono::Utc::now().timestamp().max(0) as u64;
        if policy.deadline < now {
            return Err(ProviderError::new(BAD_TOKEN, "expired token"));
        }
        if let Some(scoped_key) = &policy.key {
            if scoped_key != key {
                return Err(ProviderError::new(
                    SCOPE_MISMATCH,
                    "key doesn't match with scope",
                ));
            }
        }

        let mut state = self.provider.state.write().await;
        let bucket = state.bucket(&policy.bucket)?;
        if let Some(existing) = bucket.objects.get(key) {
            // Without a key in the scope, only an identical body may be re-uploaded
            let overwrite_allowed = policy.key.is_some() && !policy.insert_only;
            if !overwrite_allowed && existing.info.hash != content_hash(&data) {
                return Err(file_exists());
            }
        }

        state.store(&policy.bucket, key, data)
    }

    async fn put_file(&self, token: &str, key: &str, path: &Path) -> ProviderResult<PutRet> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            ProviderError::new(
                LOCAL_ERROR,
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;
        self.put(token, key, Bytes::from(data)).await
    }
}
