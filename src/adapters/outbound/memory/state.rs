use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{
    errors::{ProviderError, ProviderResult},
    models::{BatchOperation, FileInfo, JobStatus, PutRet},
    value_objects::{FileStatus, FileType},
};

// Provider-style error codes
pub(crate) const BAD_REQUEST: i32 = 400;
pub(crate) const BAD_TOKEN: i32 = 401;
pub(crate) const SCOPE_MISMATCH: i32 = 403;
pub(crate) const SOURCE_FETCH_FAILED: i32 = 478;
pub(crate) const NO_SUCH_ENTRY: i32 = 612;
pub(crate) const FILE_EXISTS: i32 = 614;
pub(crate) const NO_SUCH_BUCKET: i32 = 631;
/// Client-side failure before any request was made
pub(crate) const LOCAL_ERROR: i32 = -1;

pub(crate) fn no_such_entry() -> ProviderError {
    ProviderError::new(NO_SUCH_ENTRY, "no such file or directory")
}

pub(crate) fn no_such_bucket() -> ProviderError {
    ProviderError::new(NO_SUCH_BUCKET, "no such bucket")
}

pub(crate) fn file_exists() -> ProviderError {
    ProviderError::new(FILE_EXISTS, "file exists")
}

#[derive(Default)]
pub(crate) struct ProviderState {
    pub buckets: BTreeMap<String, BucketState>,
    /// Bodies reachable by `fetch`/`prefetch`, keyed by URL
    pub remote: HashMap<String, Bytes>,
    pub jobs: HashMap<String, JobStatus>,
}

#[derive(Default)]
pub(crate) struct BucketState {
    pub domains: Vec<String>,
    pub shared: bool,
    /// Mirror source base URL used by `prefetch`
    pub mirror: Option<String>,
    pub objects: BTreeMap<String, StoredObject>,
}

#[derive(Clone)]
pub(crate) struct StoredObject {
    pub data: Bytes,
    pub info: FileInfo,
    pub delete_after_days: Option<u32>,
}

impl StoredObject {
    pub fn new(key: &str, data: Bytes) -> Self {
        let info = FileInfo {
            hash: content_hash(&data),
            fsize: data.len() as u64,
            mime_type: guess_mime(key).to_string(),
            put_time: chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() / 100,
            file_type: FileType::Standard,
            status: FileStatus::Enabled,
        };
        Self {
            data,
            info,
            delete_after_days: None,
        }
    }
}

pub(crate) fn content_hash(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

fn guess_mime(key: &str) -> &'static str {
    let extension = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

impl ProviderState {
    pub fn bucket(&self, name: &str) -> ProviderResult<&BucketState> {
        self.buckets.get(name).ok_or_else(no_such_bucket)
    }

    pub fn bucket_mut(&mut self, name: &str) -> ProviderResult<&mut BucketState> {
        self.buckets.get_mut(name).ok_or_else(no_such_bucket)
    }

    pub fn object(&self, bucket: &str, key: &str) -> ProviderResult<&StoredObject> {
        self.bucket(bucket)?.objects.get(key).ok_or_else(no_such_entry)
    }

    pub fn object_mut(&mut self, bucket: &str, key: &str) -> ProviderResult<&mut StoredObject> {
        self.bucket_mut(bucket)?
            .objects
            .get_mut(key)
            .ok_or_else(no_such_entry)
    }

    /// Store a body, replacing whatever was under `key`
    pub fn store(&mut self, bucket: &str, key: &str, data: Bytes) -> ProviderResult<PutRet> {
        let object = StoredObject::new(key, data);
        let hash = object.info.hash.clone();
        self.bucket_mut(bucket)?
            .objects
            .insert(key.to_string(), object);
        Ok(PutRet {
            hash,
            key: key.to_string(),
        })
    }

    /// Apply one resource-management operation. `Stat` yields the metadata.
    pub fn apply(&mut self, op: &BatchOperation) -> ProviderResult<Option<FileInfo>> {
        match op {
            BatchOperation::Stat { bucket, key } => Ok(Some(self.object(bucket, key)?.info.clone())),
            BatchOperation::Delete { bucket, key } => {
                self.bucket_mut(bucket)?
                    .objects
                    .remove(key)
                    .ok_or_else(no_such_entry)?;
                Ok(None)
            }
            BatchOperation::Move {
                from_bucket,
                from_key,
                to_bucket,
                to_key,
                force,
            } => self.transfer(from_bucket, from_key, to_bucket, to_key, *force, true),
            BatchOperation::Copy {
                from_bucket,
                from_key,
                to_bucket,
                to_key,
                force,
            } => self.transfer(from_bucket, from_key, to_bucket, to_key, *force, false),
            BatchOperation::ChangeMime { bucket, key, mime } => {
                if mime.trim().is_empty() {
                    return Err(ProviderError::new(BAD_REQUEST, "invalid mime type"));
                }
                self.object_mut(bucket, key)?.info.mime_type = mime.clone();
                Ok(None)
            }
            BatchOperation::ChangeType {
                bucket,
                key,
                file_type,
            } => {
                self.object_mut(bucket, key)?.info.file_type = *file_type;
                Ok(None)
            }
            BatchOperation::ChangeStatus {
                bucket,
                key,
                status,
            } => {
                self.object_mut(bucket, key)?.info.status = *status;
                Ok(None)
            }
            BatchOperation::DeleteAfterDays { bucket, key, days } => {
                self.object_mut(bucket, key)?.delete_after_days = (*days > 0).then_some(*days);
                Ok(None)
            }
        }
    }

    fn transfer(
        &mut self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
        force: bool,
        remove_source: bool,
    ) -> ProviderResult<Option<FileInfo>> {
        let source = self.object(from_bucket, from_key)?.clone();
        let target_exists = self.bucket(to_bucket)?.objects.contains_key(to_key);

        if target_exists && !force {
            return Err(file_exists());
        }
        if from_bucket == to_bucket && from_key == to_key {
            return Ok(None);
        }

        if remove_source {
            self.bucket_mut(from_bucket)?.objects.remove(from_key);
        }
        self.bucket_mut(to_bucket)?
            .objects
            .insert(to_key.to_string(), source);
        Ok(None)
    }
}
