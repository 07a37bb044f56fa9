use std::time::Duration;

use crate::job::{JobId, PollHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the start request for `url`.
    StartJob { url: String },
    /// Run one status check for `job_id` after `delay`.
    ScheduleStatusCheck {
        poll: PollHandle,
        job_id: JobId,
        delay: Duration,
    },
    /// Drop any pending check of `poll`. Never reaches the server.
    CancelStatusCheck { poll: PollHandle },
    FetchResults { job_id: JobId },
    DownloadArtifact { job_id: JobId },
}
