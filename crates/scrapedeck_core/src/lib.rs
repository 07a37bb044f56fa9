//! Scrapedeck core: pure job-lifecycle state machine, results table model and
//! markup escaping. No IO happens here; the app executes the returned effects.
mod effect;
mod escape;
pub mod html;
mod job;
mod msg;
mod poller;
mod render;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use escape::{escape, escape_attr};
pub use job::{JobId, JobStatus, PollHandle, ResultItem, ResultsReport, StatusReport};
pub use msg::Msg;
pub use poller::{
    JobPoller, PollSettings, PollStep, PollerState, StopReason, DEFAULT_POLL_INTERVAL,
    GENERIC_JOB_ERROR,
};
pub use render::{
    artifact_path, render_results, DownloadLink, Href, HrefKind, ResultRow, ResultsTable,
    ResultsView, COLUMN_HEADERS, DOWNLOAD_ROUTE, LINK_LABEL, NO_RESULTS_TEXT,
};
pub use state::{AppState, SessionPhase};
pub use update::{update, CANCELLED_TEXT, EMPTY_INPUT_PROMPT, START_REJECTED_TEXT, STARTING_TEXT};
pub use view_model::{AppViewModel, Controls, JobInfo};
