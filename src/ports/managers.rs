use async_trait::async_trait;
use bytes::Bytes;
use std::{path::Path, sync::Arc};

use crate::{
    domain::{
        errors::ProviderResult,
        models::{
            BatchItemResult, BatchOperation, Credentials, FetchResult, FileInfo, ListFilesResult,
            ListOptions, PutRet,
        },
        value_objects::{FileStatus, FileType},
    },
    ports::{auth::Auth, processing::PersistentFop},
};

/// Port for the SDK's upload manager
#[async_trait]
pub trait UploadManager: Send + Sync + 'static {
    /// Upload an in-memory body under `key`
    async fn put(&self, token: &str, key: &str, data: Bytes) -> ProviderResult<PutRet>;

    /// Upload a local file under `key`
    async fn put_file(&self, token: &str, key: &str, path: &Path) -> ProviderResult<PutRet>;
}

/// Port for the SDK's bucket manager.
///
/// Every method is a single remote call; argument validity is decided by the
/// provider and reported through the error.
#[async_trait]
pub trait BucketManager: Send + Sync + 'static {
    /// Names of all buckets of the account, optionally including shared ones
    async fn buckets(&self, shared: bool) -> ProviderResult<Vec<String>>;

    /// Domains bound to a bucket
    async fn domains(&self, bucket: &str) -> ProviderResult<Vec<String>>;

    async fn list_files(
        &self,
        bucket: &str,
        options: &ListOptions,
    ) -> ProviderResult<ListFilesResult>;

    async fn stat(&self, bucket: &str, key: &str) -> ProviderResult<FileInfo>;

    async fn delete(&self, bucket: &str, key: &str) -> ProviderResult<()>;

    /// Move within a bucket
    async fn rename(&self, bucket: &str, old_key: &str, new_key: &str) -> ProviderResult<()>;

    async fn copy(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
        force: bool,
    ) -> ProviderResult<()>;

    async fn move_object(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
        force: bool,
    ) -> ProviderResult<()>;

    async fn change_mime(&self, bucket: &str, key: &str, mime: &str) -> ProviderResult<()>;

    async fn change_type(&self, bucket: &str, key: &str, file_type: FileType)
        -> ProviderResult<()>;

    async fn change_status(
        &self,
        bucket: &str,
        key: &str,
        status: FileStatus,
    ) -> ProviderResult<()>;

    /// Fetch a remote URL into the bucket; the provider picks a key when none is given
    async fn fetch(&self, url: &str, bucket: &str, key: Option<&str>)
        -> ProviderResult<FetchResult>;

    /// Refresh an object from the bucket's mirror source
    async fn prefetch(&self, bucket: &str, key: &str) -> ProviderResult<()>;

    async fn batch(&self, operations: &[BatchOperation]) -> ProviderResult<Vec<BatchItemResult>>;

    /// Schedule deletion; `days == 0` cancels the schedule
    async fn delete_after_days(&self, bucket: &str, key: &str, days: u32) -> ProviderResult<()>;
}

/// Builds the SDK collaborators a facade needs.
///
/// The facade calls each method exactly once, while it is being built.
pub trait ManagerFactory {
    fn auth(&self, credentials: &Credentials) -> Arc<dyn Auth>;

    fn upload_manager(&self) -> Arc<dyn UploadManager>;

    fn bucket_manager(&self, auth: Arc<dyn Auth>) -> Arc<dyn BucketManager>;

    fn persistent_fop(&self, auth: Arc<dyn Auth>) -> Arc<dyn PersistentFop>;
}
