//! Job status poller.
//!
//! The poller never owns a timer. It answers every processed status check with
//! the delay before the next one, so a new check is only armed after the previous
//! response (or failure) has been handled and two checks never overlap.

use std::time::Duration;

use crate::job::{JobId, JobStatus, PollHandle, StatusReport};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const GENERIC_JOB_ERROR: &str = "unknown error";
pub const MISSING_STATUS_ERROR: &str = "status response carried no status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
    Stopped(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    Finished,
    /// Structured error field or `status == "error"`.
    JobFailed(String),
    /// Network, HTTP or decoding failure during a check.
    TransportFailed(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    Continue { delay: Duration },
    Stopped(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPoller {
    job_id: JobId,
    handle: PollHandle,
    settings: PollSettings,
    state: PollerState,
    checks_completed: u32,
}

impl JobPoller {
    pub fn new(job_id: JobId, handle: PollHandle, settings: PollSettings) -> Self {
        Self {
            job_id,
            handle,
            settings,
            state: PollerState::Idle,
            checks_completed: 0,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn handle(&self) -> PollHandle {
        self.handle
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    pub fn checks_completed(&self) -> u32 {
        self.checks_completed
    }

    /// Enters `Polling`; the first check is due immediately.
    pub fn start(&mut self) -> Option<Duration> {
        if self.state != PollerState::Idle {
            return None;
        }
        self.state = PollerState::Polling;
        Some(Duration::ZERO)
    }

    /// Interprets one status response. Returns `None` when the poller is not polling.
    pub fn observe(&mut self, report: &StatusReport) -> Option<PollStep> {
        if self.state != PollerState::Polling {
            return None;
        }
        self.checks_completed += 1;

        if let Some(message) = report.error_message() {
            return Some(self.stop(StopReason::JobFailed(message.to_string())));
        }
        let step = match &report.status {
            Some(JobStatus::Finished) => self.stop(StopReason::Finished),
            Some(JobStatus::Error) => {
                self.stop(StopReason::JobFailed(GENERIC_JOB_ERROR.to_string()))
            }
            Some(_) => PollStep::Continue {
                delay: self.settings.interval,
            },
            None => self.stop(StopReason::TransportFailed(MISSING_STATUS_ERROR.to_string())),
        };
        Some(step)
    }

    /// A check could not be completed. Fatal; there is no retry.
    pub fn fail(&mut self, message: impl Into<String>) -> Option<PollStep> {
        if self.state != PollerState::Polling {
            return None;
        }
        self.checks_completed += 1;
        Some(self.stop(StopReason::TransportFailed(message.into())))
    }

    /// User cancel. Local only; the server job is never told.
    pub fn cancel(&mut self) -> bool {
        if self.state != PollerState::Polling {
            return false;
        }
        self.stop(StopReason::Cancelled);
        true
    }

    fn stop(&mut self, reason: StopReason) -> PollStep {
        self.state = PollerState::Stopped(reason.clone());
        PollStep::Stopped(reason)
    }
}
