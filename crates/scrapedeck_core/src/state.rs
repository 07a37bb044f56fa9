use crate::job::{JobId, PollHandle};
use crate::poller::{JobPoller, PollSettings};
use crate::render::ResultsView;
use crate::view_model::{AppViewModel, Controls, JobInfo};

/// Where the session is in the job lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Start request in flight.
    Submitting,
    /// A poll registration is active.
    Polling,
}

/// Session controller state. The only owner of the current job id and the
/// active poll registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    phase: SessionPhase,
    current_job_id: Option<JobId>,
    poller: Option<JobPoller>,
    last_poll_handle: PollHandle,
    poll_settings: PollSettings,
    status_line: String,
    job_info: Option<JobInfo>,
    results: ResultsView,
    results_pending: Option<JobId>,
    download_pending: Option<JobId>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_settings(poll_settings: PollSettings) -> Self {
        Self {
            poll_settings,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            input: self.input.clone(),
            status_line: self.status_line.clone(),
            job_info: self.job_info.clone(),
            current_job_id: self.current_job_id.clone(),
            active_poll: self.active_poll(),
            controls: self.controls(),
            results: self.results.clone(),
            results_pending: self.results_pending.is_some(),
            download_pending: self.download_pending.is_some(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn controls(&self) -> Controls {
        match self.phase {
            SessionPhase::Idle => Controls {
                submit_enabled: true,
                cancel_enabled: false,
            },
            SessionPhase::Submitting => Controls {
                submit_enabled: false,
                cancel_enabled: false,
            },
            SessionPhase::Polling => Controls {
                submit_enabled: false,
                cancel_enabled: true,
            },
        }
    }

    pub fn active_poll(&self) -> Option<PollHandle> {
        self.poller.as_ref().map(JobPoller::handle)
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>) {
        self.status_line = text.into();
        self.mark_dirty();
    }

    pub(crate) fn begin_submit(&mut self) {
        self.phase = SessionPhase::Submitting;
        self.job_info = None;
        self.results = ResultsView::Empty;
        self.results_pending = None;
        self.mark_dirty();
    }

    pub(crate) fn return_to_idle(&mut self) {
        self.phase = SessionPhase::Idle;
        self.mark_dirty();
    }

    /// Installs a fresh poll registration for `job_id`. Returns the handle of any
    /// registration it replaced, which the caller must cancel.
    pub(crate) fn begin_polling(&mut self, job_id: JobId) -> (Option<PollHandle>, &mut JobPoller) {
        let replaced = self.poller.take().map(|p| p.handle());
        self.last_poll_handle += 1;
        self.current_job_id = Some(job_id.clone());
        self.phase = SessionPhase::Polling;
        self.mark_dirty();
        let poller = self.poller.insert(JobPoller::new(
            job_id,
            self.last_poll_handle,
            self.poll_settings,
        ));
        (replaced, poller)
    }

    /// The active poller, if `poll` is its handle.
    pub(crate) fn poller_for(&mut self, poll: PollHandle) -> Option<&mut JobPoller> {
        self.poller.as_mut().filter(|p| p.handle() == poll)
    }

    pub(crate) fn active_poller(&mut self) -> Option<&mut JobPoller> {
        self.poller.as_mut()
    }

    /// Clears the active poll registration and returns to idle.
    pub(crate) fn clear_poll(&mut self) -> Option<JobPoller> {
        let poller = self.poller.take();
        self.return_to_idle();
        poller
    }

    pub(crate) fn set_job_info(&mut self, info: JobInfo) {
        self.job_info = Some(info);
        self.mark_dirty();
    }

    pub(crate) fn expect_results(&mut self, job_id: JobId) {
        self.results_pending = Some(job_id);
    }

    /// Consumes the pending results marker if it belongs to `job_id`.
    pub(crate) fn take_results_pending(&mut self, job_id: &JobId) -> bool {
        if self.results_pending.as_ref() == Some(job_id) {
            self.results_pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_results(&mut self, results: ResultsView) {
        self.results = results;
        self.mark_dirty();
    }

    pub(crate) fn displayed_table_job(&self) -> Option<&JobId> {
        match &self.results {
            ResultsView::Table(table) => Some(table.job_id()),
            _ => None,
        }
    }

    pub(crate) fn download_pending(&self) -> Option<&JobId> {
        self.download_pending.as_ref()
    }

    pub(crate) fn set_download_pending(&mut self, job_id: Option<JobId>) {
        self.download_pending = job_id;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
