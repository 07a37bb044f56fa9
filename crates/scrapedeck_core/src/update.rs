use crate::job::{JobId, PollHandle, ResultsReport, StatusReport};
use crate::poller::{PollStep, StopReason};
use crate::render::{render_results, ResultsView};
use crate::state::SessionPhase;
use crate::view_model::JobInfo;
use crate::{AppState, Effect, Msg};

pub const EMPTY_INPUT_PROMPT: &str = "Enter a search URL to scrape.";
pub const STARTING_TEXT: &str = "Starting scrape...";
pub const START_REJECTED_TEXT: &str = "Failed to start job.";
pub const CANCELLED_TEXT: &str = "Polling stopped by user.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::CancelClicked => cancel(&mut state),
        Msg::DownloadClicked => download(&mut state),
        Msg::StartCompleted { job_id } => {
            if state.phase() != SessionPhase::Submitting {
                return (state, Vec::new());
            }
            match JobId::from_reply(job_id) {
                Some(job_id) => start_polling(&mut state, job_id),
                None => {
                    state.set_status(START_REJECTED_TEXT);
                    state.return_to_idle();
                    Vec::new()
                }
            }
        }
        Msg::StartFailed { message } => {
            if state.phase() == SessionPhase::Submitting {
                state.set_status(format!("Error starting job: {message}"));
                state.return_to_idle();
            }
            Vec::new()
        }
        Msg::StatusReceived { poll, report } => status_received(&mut state, poll, &report),
        Msg::StatusFailed { poll, message } => status_failed(&mut state, poll, message),
        Msg::ResultsReceived { job_id, report } => {
            results_received(&mut state, &job_id, &report);
            Vec::new()
        }
        Msg::ResultsFailed { job_id, message } => {
            if state.take_results_pending(&job_id) {
                state.set_results(ResultsView::Failed(format!(
                    "Error getting results: {message}"
                )));
            }
            Vec::new()
        }
        Msg::DownloadFinished { job_id, saved_to } => {
            if state.download_pending() == Some(&job_id) {
                state.set_download_pending(None);
                state.set_status(format!("Saved artifact for job {job_id}: {saved_to}"));
            }
            Vec::new()
        }
        Msg::DownloadFailed { job_id, message } => {
            if state.download_pending() == Some(&job_id) {
                state.set_download_pending(None);
                state.set_status(format!("Download failed for job {job_id}: {message}"));
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if !state.controls().submit_enabled {
        return Vec::new();
    }
    let url = state.input().trim().to_string();
    if url.is_empty() {
        state.set_status(EMPTY_INPUT_PROMPT);
        return Vec::new();
    }
    state.begin_submit();
    state.set_status(STARTING_TEXT);
    vec![Effect::StartJob { url }]
}

fn start_polling(state: &mut AppState, job_id: JobId) -> Vec<Effect> {
    state.set_status(format!("Job queued: {job_id}"));
    let (replaced, poller) = state.begin_polling(job_id.clone());
    let poll = poller.handle();
    let first_delay = poller.start();

    let mut effects = Vec::with_capacity(2);
    if let Some(old) = replaced {
        effects.push(Effect::CancelStatusCheck { poll: old });
    }
    if let Some(delay) = first_delay {
        effects.push(Effect::ScheduleStatusCheck {
            poll,
            job_id,
            delay,
        });
    }
    effects
}

fn status_received(state: &mut AppState, poll: PollHandle, report: &StatusReport) -> Vec<Effect> {
    let Some(poller) = state.poller_for(poll) else {
        return Vec::new();
    };
    let job_id = poller.job_id().clone();
    let Some(step) = poller.observe(report) else {
        return Vec::new();
    };

    if report.error_message().is_none() {
        if let Some(status) = report.status.clone() {
            let info = JobInfo {
                job_id: job_id.clone(),
                status,
                item_count: report.item_count,
            };
            state.set_status(info.summary());
            state.set_job_info(info);
        }
    }

    match step {
        PollStep::Continue { delay } => vec![Effect::ScheduleStatusCheck {
            poll,
            job_id,
            delay,
        }],
        PollStep::Stopped(reason) => stop_polling(state, reason),
    }
}

fn status_failed(state: &mut AppState, poll: PollHandle, message: String) -> Vec<Effect> {
    let step = state.poller_for(poll).and_then(|poller| poller.fail(message));
    match step {
        Some(PollStep::Stopped(reason)) => stop_polling(state, reason),
        _ => Vec::new(),
    }
}

/// Terminal transition of the active poller. Clears the registration; only a
/// finished job leads to a results fetch.
fn stop_polling(state: &mut AppState, reason: StopReason) -> Vec<Effect> {
    let Some(poller) = state.clear_poll() else {
        return Vec::new();
    };
    match reason {
        StopReason::Finished => {
            let job_id = poller.job_id().clone();
            state.expect_results(job_id.clone());
            vec![Effect::FetchResults { job_id }]
        }
        StopReason::JobFailed(message) => {
            state.set_status(format!("Job error: {message}"));
            Vec::new()
        }
        StopReason::TransportFailed(message) => {
            state.set_status(format!("Polling error: {message}"));
            Vec::new()
        }
        StopReason::Cancelled => {
            state.set_status(CANCELLED_TEXT);
            vec![Effect::CancelStatusCheck {
                poll: poller.handle(),
            }]
        }
    }
}

fn cancel(state: &mut AppState) -> Vec<Effect> {
    if state.phase() != SessionPhase::Polling {
        return Vec::new();
    }
    let cancelled = state.active_poller().is_some_and(|poller| poller.cancel());
    if cancelled {
        stop_polling(state, StopReason::Cancelled)
    } else {
        Vec::new()
    }
}

fn results_received(state: &mut AppState, job_id: &JobId, report: &ResultsReport) {
    if !state.take_results_pending(job_id) {
        return;
    }
    let view = match report.error_message() {
        Some(message) => ResultsView::Failed(format!("Error fetching results: {message}")),
        None => render_results(job_id, report.items()),
    };
    state.set_results(view);
}

fn download(state: &mut AppState) -> Vec<Effect> {
    let Some(job_id) = state.displayed_table_job().cloned() else {
        state.set_status("No results to download yet.");
        return Vec::new();
    };
    if state.download_pending().is_some() {
        return Vec::new();
    }
    state.set_download_pending(Some(job_id.clone()));
    state.set_status(format!("Downloading artifact for job {job_id}..."));
    vec![Effect::DownloadArtifact { job_id }]
}
