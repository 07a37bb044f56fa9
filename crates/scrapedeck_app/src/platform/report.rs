use std::path::{Path, PathBuf};

use scrapedeck_core::{html, JobId, ResultsView};
use scrapedeck_engine::{artifact_filename, AtomicFileWriter, PersistError};

/// Saves the displayed results as a standalone HTML page next to the artifacts.
pub struct ReportWriter {
    writer: AtomicFileWriter,
}

impl ReportWriter {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.as_ref()),
        }
    }

    pub fn write(&self, job_id: &JobId, view: &ResultsView) -> Result<PathBuf, PersistError> {
        let title = format!("Scrape results for job {job_id}");
        let page = html::results_page(&title, view);
        self.writer
            .write(&artifact_filename(job_id.as_str(), "html"), page.as_bytes())
    }
}
