use bon::Builder;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    domain::{
        errors::{JobError, JobResult},
        models::{JobState, JobStatus},
        value_objects::JobId,
    },
    ports::processing::PersistentFop,
};

/// Cadence of the status polling loop
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct PollPolicy {
    /// Delay after the first non-terminal status
    #[builder(default = Duration::from_secs(1))]
    pub initial_delay: Duration,
    #[builder(default = Duration::from_secs(30))]
    pub max_delay: Duration,
    /// Growth factor applied to the delay after every attempt
    #[builder(default = 2)]
    pub multiplier: u32,
    /// Total number of status queries before giving up
    #[builder(default = 30)]
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PollPolicy {
    /// Delay following `delay`, grown by `multiplier` and capped at `max_delay`
    pub fn next_delay(&self, delay: Duration) -> Duration {
        delay
            .saturating_mul(self.multiplier.max(1))
            .min(self.max_delay)
    }

    /// Number of status queries a wait makes; never less than one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Query `id` once
pub async fn query_status(fop: &dyn PersistentFop, id: &JobId) -> JobResult<JobStatus> {
    fop.status(id).await.map_err(|source| JobError::Status {
        id: id.clone(),
        source,
    })
}

/// Poll `id` with exponential backoff until it reaches a terminal state.
///
/// A job that ends in [`JobState::Failed`] is returned as
/// [`JobError::Failed`]. A failed status query aborts the loop. The job is
/// queried at least once, even when `max_attempts` is 0.
pub async fn wait_for_terminal(
    fop: &dyn PersistentFop,
    id: &JobId,
    policy: &PollPolicy,
) -> JobResult<JobStatus> {
    let attempts = policy.attempts();
    let mut delay = policy.initial_delay;

    for attempt in 1..=attempts {
        let status = query_status(fop, id).await?;
        let state = status.state();
        debug!(job = %id, attempt, code = state.code(), "job status");

        if state == JobState::Failed {
            warn!(job = %id, desc = %status.desc, "job failed");
            return Err(JobError::Failed {
                id: id.clone(),
                status: Box::new(status),
            });
        }
        if state.is_terminal() {
            return Ok(status);
        }

        if attempt < attempts {
            tokio::time::sleep(delay).await;
            delay = policy.next_delay(delay);
        }
    }

    warn!(job = %id, attempts, "job did not finish in time");
    Err(JobError::TimedOut {
        id: id.clone(),
        attempts,
    })
}
