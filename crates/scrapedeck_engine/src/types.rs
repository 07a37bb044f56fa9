use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::persist::PersistError;

/// Poll registration number assigned by the caller.
pub type PollId = u64;

/// Body of `POST /start_scrape`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartRequest<'a> {
    pub url: &'a str,
}

/// Reply of `POST /start_scrape`. Only `jobid` matters; its absence means failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StartReply {
    #[serde(default)]
    pub jobid: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply of `GET /status/{jobid}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    /// Older servers report the item count under this name.
    #[serde(default)]
    pub items_found: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One record inside a results reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct WireItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Reply of `GET /results/{jobid}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResultsReply {
    #[serde(default)]
    pub results: Option<Vec<WireItem>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StartCompleted {
        result: Result<StartReply, ApiError>,
    },
    StatusCompleted {
        poll: PollId,
        job_id: String,
        result: Result<StatusReply, ApiError>,
    },
    ResultsCompleted {
        job_id: String,
        result: Result<ResultsReply, ApiError>,
    },
    DownloadCompleted {
        job_id: String,
        result: Result<PathBuf, DownloadError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Body was not the expected JSON shape.
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::InvalidUrl => write!(f, "invalid url"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Decode => write!(f, "unparseable response"),
            ApiErrorKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not save artifact: {0}")]
    Persist(String),
}

impl From<PersistError> for DownloadError {
    fn from(err: PersistError) -> Self {
        DownloadError::Persist(err.to_string())
    }
}
