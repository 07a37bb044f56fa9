use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scrapedeck_logging::{deck_debug, deck_info, deck_warn};
use tokio_util::sync::CancellationToken;

use crate::api::JobApi;
use crate::filename::artifact_filename;
use crate::persist::AtomicFileWriter;
use crate::sink::EventSink;
use crate::{DownloadError, EngineEvent, PollId};

pub const ARTIFACT_EXTENSION: &str = "csv";

enum EngineCommand {
    Start {
        url: String,
    },
    CheckStatus {
        poll: PollId,
        job_id: String,
        delay: Duration,
    },
    CancelCheck {
        poll: PollId,
    },
    FetchResults {
        job_id: String,
    },
    Download {
        job_id: String,
        output_dir: PathBuf,
    },
}

/// Runs job protocol requests on a background tokio runtime and reports
/// each completion to the sink. At most one status check is pending at a
/// time: registering a check for a new poll drops any other.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn JobApi>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("scrapedeck-engine")
            .build()?;

        thread::Builder::new()
            .name("scrapedeck-dispatch".into())
            .spawn(move || {
                let mut pending: HashMap<PollId, CancellationToken> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    dispatch(&runtime, &api, &sink, &mut pending, command);
                }
                for (_, token) in pending.drain() {
                    token.cancel();
                }
                deck_debug!("engine dispatcher stopped");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn start(&self, url: impl Into<String>) {
        self.send(EngineCommand::Start { url: url.into() });
    }

    /// Issues one status request for `job_id` after `delay`.
    pub fn check_status(&self, poll: PollId, job_id: impl Into<String>, delay: Duration) {
        self.send(EngineCommand::CheckStatus {
            poll,
            job_id: job_id.into(),
            delay,
        });
    }

    /// Drops the pending check for `poll`, if any. Nothing is sent to the server.
    pub fn cancel_check(&self, poll: PollId) {
        self.send(EngineCommand::CancelCheck { poll });
    }

    pub fn fetch_results(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::FetchResults {
            job_id: job_id.into(),
        });
    }

    pub fn download(&self, job_id: impl Into<String>, output_dir: impl Into<PathBuf>) {
        self.send(EngineCommand::Download {
            job_id: job_id.into(),
            output_dir: output_dir.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            deck_warn!("engine dispatcher is gone; command dropped");
        }
    }
}

fn dispatch(
    runtime: &tokio::runtime::Runtime,
    api: &Arc<dyn JobApi>,
    sink: &Arc<dyn EventSink>,
    pending: &mut HashMap<PollId, CancellationToken>,
    command: EngineCommand,
) {
    let api = api.clone();
    let sink = sink.clone();
    match command {
        EngineCommand::Start { url } => {
            runtime.spawn(async move {
                let result = api.start(&url).await;
                sink.emit(EngineEvent::StartCompleted { result });
            });
        }
        EngineCommand::CheckStatus {
            poll,
            job_id,
            delay,
        } => {
            pending.retain(|other, token| {
                if *other == poll {
                    return true;
                }
                deck_debug!("superseding status check for poll {}", other);
                token.cancel();
                false
            });
            let token = CancellationToken::new();
            pending.insert(poll, token.clone());
            let status_job = job_id.clone();
            runtime.spawn(async move {
                let check = async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    api.status(&status_job).await
                };
                tokio::select! {
                    _ = token.cancelled() => {
                        deck_debug!("status check for poll {} cancelled", poll);
                    }
                    result = check => {
                        sink.emit(EngineEvent::StatusCompleted { poll, job_id, result });
                    }
                }
            });
        }
        EngineCommand::CancelCheck { poll } => {
            if let Some(token) = pending.remove(&poll) {
                token.cancel();
            }
        }
        EngineCommand::FetchResults { job_id } => {
            runtime.spawn(async move {
                let result = api.results(&job_id).await;
                sink.emit(EngineEvent::ResultsCompleted { job_id, result });
            });
        }
        EngineCommand::Download { job_id, output_dir } => {
            runtime.spawn(async move {
                let result = download_artifact(api.as_ref(), &job_id, output_dir).await;
                if let Ok(path) = &result {
                    deck_info!("saved artifact for job {} to {}", job_id, path.display());
                }
                sink.emit(EngineEvent::DownloadCompleted { job_id, result });
            });
        }
    }
}

async fn download_artifact(
    api: &dyn JobApi,
    job_id: &str,
    output_dir: PathBuf,
) -> Result<PathBuf, DownloadError> {
    let bytes = api.download(job_id).await?;
    let filename = artifact_filename(job_id, ARTIFACT_EXTENSION);
    let writer = AtomicFileWriter::new(output_dir);
    tokio::task::spawn_blocking(move || writer.write(&filename, &bytes))
        .await
        .map_err(|err| DownloadError::Persist(err.to_string()))?
        .map_err(DownloadError::from)
}
