use std::fmt;

/// Identifies one poll registration. Events carrying a stale handle are ignored.
pub type PollHandle = u64;

/// Opaque, server-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Empty identifiers count as missing, the same as an absent `jobid` field.
    pub fn from_reply(id: Option<String>) -> Option<Self> {
        id.filter(|id| !id.is_empty()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-reported job status. Only `Finished` and `Error` are terminal; any
/// unrecognised value is kept verbatim and treated like `Queued`/`Running`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Finished,
    Error,
    Other(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => JobStatus::Queued,
            "running" => JobStatus::Running,
            "finished" => JobStatus::Finished,
            "error" => JobStatus::Error,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Finished => "finished",
            JobStatus::Error => "error",
            JobStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status check's answer, already decoded from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    pub status: Option<JobStatus>,
    pub item_count: u64,
    pub error: Option<String>,
}

impl StatusReport {
    pub fn with_status(status: JobStatus, item_count: u64) -> Self {
        Self {
            status: Some(status),
            item_count,
            error: None,
        }
    }

    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            status: None,
            item_count: 0,
            error: Some(message.into()),
        }
    }

    /// The structured error field, when it carries a non-empty message.
    pub fn error_message(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }
}

/// One extracted record. Every field is optional; empty strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub link: Option<String>,
}

impl ResultItem {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn link(&self) -> Option<&str> {
        non_empty(self.link.as_deref())
    }
}

/// Answer of the results operation for a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsReport {
    pub results: Option<Vec<ResultItem>>,
    pub error: Option<String>,
}

impl ResultsReport {
    pub fn with_items(items: Vec<ResultItem>) -> Self {
        Self {
            results: Some(items),
            error: None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }

    pub fn items(&self) -> &[ResultItem] {
        self.results.as_deref().unwrap_or_default()
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_statuses_are_kept_verbatim() {
        assert_eq!(JobStatus::parse("queued"), JobStatus::Queued);
        assert_eq!(JobStatus::parse("finished"), JobStatus::Finished);
        assert_eq!(JobStatus::parse("paused"), JobStatus::Other("paused".into()));
        assert_eq!(JobStatus::parse("paused").as_str(), "paused");
        assert_eq!(JobStatus::parse("Finished").as_str(), "Finished");
    }

    #[test]
    fn empty_fields_count_as_absent() {
        assert_eq!(JobId::from_reply(Some(String::new())), None);
        assert_eq!(JobId::from_reply(None), None);
        assert_eq!(StatusReport::with_error("").error_message(), None);
        assert_eq!(ResultItem::titled("T").with_link("").link(), None);
        assert!(ResultsReport::default().items().is_empty());
    }
}
