use crate::job::{JobId, PollHandle, ResultsReport, StatusReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the target URL input.
    InputChanged(String),
    /// User pressed the submit control.
    SubmitClicked,
    /// User pressed the cancel control.
    CancelClicked,
    /// User activated the download affordance of the displayed table.
    DownloadClicked,
    /// Start request answered; `job_id` is `None` when the reply carried none.
    StartCompleted { job_id: Option<String> },
    /// Start request could not be completed (network, HTTP or decoding).
    StartFailed { message: String },
    /// One status check answered.
    StatusReceived {
        poll: PollHandle,
        report: StatusReport,
    },
    /// One status check could not be completed.
    StatusFailed { poll: PollHandle, message: String },
    ResultsReceived {
        job_id: JobId,
        report: ResultsReport,
    },
    ResultsFailed { job_id: JobId, message: String },
    /// Artifact written to `saved_to`.
    DownloadFinished { job_id: JobId, saved_to: String },
    DownloadFailed { job_id: JobId, message: String },
}
