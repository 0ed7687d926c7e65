use thiserror::Error;

use crate::domain::{errors::ProviderError, models::JobStatus, value_objects::JobId};

/// Errors raised by the processing job lifecycle (submit, status, wait)
#[derive(Debug, Clone, Error)]
pub enum JobError {
    /// The provider rejected the submission; no job id exists
    #[error("Job submission failed: {0}")]
    Submission(#[source] ProviderError),

    /// The status query for an existing job failed
    #[error("Status query for job '{id}' failed: {source}")]
    Status {
        id: JobId,
        #[source]
        source: ProviderError,
    },

    /// The job reached the failed terminal state
    #[error("Job '{id}' failed: {}", .status.desc)]
    Failed { id: JobId, status: Box<JobStatus> },

    /// Polling gave up before the job reached a terminal state
    #[error("Job '{id}' still running after {attempts} status queries")]
    TimedOut { id: JobId, attempts: u32 },
}

impl JobError {
    /// The provider error behind this failure, if any
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            JobError::Submission(err) | JobError::Status { source: err, .. } => Some(err),
            JobError::Failed { .. } | JobError::TimedOut { .. } => None,
        }
    }
}

/// Result type for job operations
pub type JobResult<T> = Result<T, JobError>;
