use serde::{Deserialize, Serialize};

use crate::domain::value_objects::JobId;

/// A submitted persistent processing job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingJob {
    pub id: JobId,
    pub fops: String,
    pub pipeline: Option<String>,
    pub notify_url: Option<String>,
}

/// Lifecycle state derived from a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Succeeded,
    Waiting,
    Processing,
    Failed,
    NotifyFailed,
    Unknown(i32),
}

impl JobState {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => JobState::Succeeded,
            1 => JobState::Waiting,
            2 => JobState::Processing,
            3 => JobState::Failed,
            4 => JobState::NotifyFailed,
            other => JobState::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            JobState::Succeeded => 0,
            JobState::Waiting => 1,
            JobState::Processing => 2,
            JobState::Failed => 3,
            JobState::NotifyFailed => 4,
            JobState::Unknown(code) => *code,
        }
    }

    /// No further status change will happen
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::NotifyFailed
        )
    }
}

/// Status document of a processing job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: JobId,
    pub code: i32,
    pub desc: String,
    #[serde(rename = "inputKey", default)]
    pub input_key: String,
    #[serde(rename = "inputBucket", default)]
    pub input_bucket: String,
    #[serde(default)]
    pub items: Vec<JobItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reqid: Option<String>,
}

impl JobStatus {
    pub fn state(&self) -> JobState {
        JobState::from_code(self.code)
    }
}

/// Outcome of one command of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobItem {
    pub cmd: String,
    pub code: i32,
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "returnOld", default)]
    pub return_old: i32,
}
