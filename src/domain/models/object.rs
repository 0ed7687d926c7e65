use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{FileStatus, FileType};

/// Upload manager response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutRet {
    pub hash: String,
    pub key: String,
}

/// Object metadata as returned by `stat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub hash: String,
    pub fsize: u64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Upload time in units of 100 nanoseconds since the Unix epoch
    #[serde(rename = "putTime")]
    pub put_time: i64,
    #[serde(rename = "type", default)]
    pub file_type: FileType,
    #[serde(default)]
    pub status: FileStatus,
}

impl FileInfo {
    /// Upload time as a timestamp
    pub fn put_time_utc(&self) -> Option<DateTime<Utc>> {
        let secs = self.put_time.div_euclid(10_000_000);
        let nanos = (self.put_time.rem_euclid(10_000_000) * 100) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// One entry of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub key: String,
    #[serde(flatten)]
    pub info: FileInfo,
}

/// A page of a bucket listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilesResult {
    #[serde(default)]
    pub items: Vec<ListItem>,
    #[serde(rename = "commonPrefixes", default)]
    pub common_prefixes: Vec<String>,
    /// Continuation marker, absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Listing parameters, forwarded unchanged to the bucket manager
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ListOptions {
    #[builder(into)]
    pub prefix: Option<String>,
    #[builder(into)]
    pub marker: Option<String>,
    #[builder(default = 1000)]
    pub limit: usize,
    #[builder(into)]
    pub delimiter: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Result of fetching a remote URL into a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    pub hash: String,
    pub key: String,
    pub fsize: u64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}
