use serde::{Deserialize, Serialize};

use crate::domain::{
    encoding::{encoded_entry, urlsafe_base64},
    value_objects::{FileStatus, FileType},
};

/// One resource-management operation inside a `batch` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Stat {
        bucket: String,
        key: String,
    },
    Delete {
        bucket: String,
        key: String,
    },
    Move {
        from_bucket: String,
        from_key: String,
        to_bucket: String,
        to_key: String,
        force: bool,
    },
    Copy {
        from_bucket: String,
        from_key: String,
        to_bucket: String,
        to_key: String,
        force: bool,
    },
    ChangeMime {
        bucket: String,
        key: String,
        mime: String,
    },
    ChangeType {
        bucket: String,
        key: String,
        file_type: FileType,
    },
    ChangeStatus {
        bucket: String,
        key: String,
        status: FileStatus,
    },
    DeleteAfterDays {
        bucket: String,
        key: String,
        days: u32,
    },
}

impl BatchOperation {
    /// Stat every key of a bucket
    pub fn stat_all<I, S>(bucket: &str, keys: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter()
            .map(|key| BatchOperation::Stat {
                bucket: bucket.to_string(),
                key: key.into(),
            })
            .collect()
    }

    /// Delete every key of a bucket
    pub fn delete_all<I, S>(bucket: &str, keys: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter()
            .map(|key| BatchOperation::Delete {
                bucket: bucket.to_string(),
                key: key.into(),
            })
            .collect()
    }

    /// Wire form of the operation, e.g. `/delete/<entry>`
    pub fn to_command(&self) -> String {
        match self {
            BatchOperation::Stat { bucket, key } => {
                format!("/stat/{}", encoded_entry(bucket, key))
            }
            BatchOperation::Delete { bucket, key } => {
                format!("/delete/{}", encoded_entry(bucket, key))
            }
            BatchOperation::Move {
                from_bucket,
                from_key,
                to_bucket,
                to_key,
                force,
            } => format!(
                "/move/{}/{}/force/{}",
                encoded_entry(from_bucket, from_key),
                encoded_entry(to_bucket, to_key),
                force
            ),
            BatchOperation::Copy {
                from_bucket,
                from_key,
                to_bucket,
                to_key,
                force,
            } => format!(
                "/copy/{}/{}/force/{}",
                encoded_entry(from_bucket, from_key),
                encoded_entry(to_bucket, to_key),
                force
            ),
            BatchOperation::ChangeMime { bucket, key, mime } => format!(
                "/chgm/{}/mime/{}",
                encoded_entry(bucket, key),
                urlsafe_base64(mime)
            ),
            BatchOperation::ChangeType {
                bucket,
                key,
                file_type,
            } => format!(
                "/chtype/{}/type/{}",
                encoded_entry(bucket, key),
                u8::from(*file_type)
            ),
            BatchOperation::ChangeStatus {
                bucket,
                key,
                status,
            } => format!(
                "/chstatus/{}/status/{}",
                encoded_entry(bucket, key),
                u8::from(*status)
            ),
            BatchOperation::DeleteAfterDays { bucket, key, days } => {
                format!("/deleteAfterDays/{}/{}", encoded_entry(bucket, key), days)
            }
        }
    }
}

/// Per-operation outcome of a batch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemResult {
    /// HTTP-like status of this operation, 200 on success
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl BatchItemResult {
    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}
