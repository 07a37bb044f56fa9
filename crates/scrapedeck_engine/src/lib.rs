//! Scrapedeck engine: job protocol client and effect execution.
mod api;
mod engine;
mod filename;
mod persist;
mod sink;
mod types;

pub use api::{
    ApiSettings, JobApi, ReqwestJobApi, DEFAULT_BASE_URL, DOWNLOAD_ROUTE, RESULTS_ROUTE,
    START_ROUTE, STATUS_ROUTE,
};
pub use engine::{EngineHandle, ARTIFACT_EXTENSION};
pub use filename::artifact_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{
    ApiError, ApiErrorKind, DownloadError, EngineEvent, PollId, ResultsReply, StartReply,
    StartRequest, StatusReply, WireItem,
};
