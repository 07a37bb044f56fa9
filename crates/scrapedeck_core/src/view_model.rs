use crate::job::{JobId, JobStatus, PollHandle};
use crate::render::ResultsView;
use crate::state::SessionPhase;

/// Enable state of the two user controls. Never both `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub submit_enabled: bool,
    pub cancel_enabled: bool,
}

/// Last progress report of the current job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub job_id: JobId,
    pub status: JobStatus,
    pub item_count: u64,
}

impl JobInfo {
    pub fn summary(&self) -> String {
        format!(
            "Job {} — status: {} — items: {}",
            self.job_id, self.status, self.item_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub phase: SessionPhase,
    pub input: String,
    pub status_line: String,
    pub job_info: Option<JobInfo>,
    pub current_job_id: Option<JobId>,
    pub active_poll: Option<PollHandle>,
    pub controls: Controls,
    pub results: ResultsView,
    pub results_pending: bool,
    pub download_pending: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// No request of the session is outstanding.
    pub fn is_settled(&self) -> bool {
        self.phase == SessionPhase::Idle && !self.results_pending && !self.download_pending
    }
}
