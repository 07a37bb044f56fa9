use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use scrapedeck_core::{Effect, JobId, JobStatus, Msg, ResultItem, ResultsReport, StatusReport};
use scrapedeck_engine::{
    ApiSettings, EngineEvent, EngineHandle, EventSink, ReqwestJobApi, ResultsReply, StatusReply,
    WireItem,
};
use scrapedeck_logging::{clip_for_log, deck_debug, deck_info, deck_warn};

use super::app::Inbound;

/// Executes core effects on the engine.
pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        settings: ApiSettings,
        output_dir: PathBuf,
        inbound: mpsc::Sender<Inbound>,
    ) -> Result<Self> {
        let base_url = settings.base_url.clone();
        let api = ReqwestJobApi::new(settings)
            .with_context(|| format!("cannot use service at {base_url}"))?;
        let engine = EngineHandle::new(Arc::new(api), Arc::new(MsgSink { tx: inbound }))
            .context("starting engine runtime")?;
        deck_info!("talking to scraping service at {}", base_url);
        Ok(Self { engine, output_dir })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob { url } => {
                    deck_info!("StartJob url_len={} url={}", url.len(), clip_for_log(&url, 200));
                    self.engine.start(url);
                }
                Effect::ScheduleStatusCheck {
                    poll,
                    job_id,
                    delay,
                } => {
                    deck_debug!(
                        "ScheduleStatusCheck poll={} job={} delay_ms={}",
                        poll,
                        job_id,
                        delay.as_millis()
                    );
                    self.engine.check_status(poll, job_id.as_str(), delay);
                }
                Effect::CancelStatusCheck { poll } => {
                    deck_info!("CancelStatusCheck poll={}", poll);
                    self.engine.cancel_check(poll);
                }
                Effect::FetchResults { job_id } => {
                    deck_info!("FetchResults job={}", job_id);
                    self.engine.fetch_results(job_id.as_str());
                }
                Effect::DownloadArtifact { job_id } => {
                    deck_info!(
                        "DownloadArtifact job={} dir={}",
                        job_id,
                        self.output_dir.display()
                    );
                    self.engine.download(job_id.as_str(), self.output_dir.clone());
                }
            }
        }
    }
}

struct MsgSink {
    tx: mpsc::Sender<Inbound>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Inbound::Msg(event_to_msg(event)));
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StartCompleted { result } => match result {
            Ok(reply) => Msg::StartCompleted {
                job_id: reply.jobid,
            },
            Err(err) => {
                deck_warn!("start request failed: {}", err);
                Msg::StartFailed {
                    message: err.to_string(),
                }
            }
        },
        EngineEvent::StatusCompleted {
            poll,
            job_id,
            result,
        } => match result {
            Ok(reply) => Msg::StatusReceived {
                poll,
                report: status_report(reply),
            },
            Err(err) => {
                deck_warn!("status check for job {} failed: {}", job_id, err);
                Msg::StatusFailed {
                    poll,
                    message: err.to_string(),
                }
            }
        },
        EngineEvent::ResultsCompleted { job_id, result } => match result {
            Ok(reply) => Msg::ResultsReceived {
                job_id: JobId::new(job_id),
                report: results_report(reply),
            },
            Err(err) => {
                deck_warn!("results fetch for job {} failed: {}", job_id, err);
                Msg::ResultsFailed {
                    job_id: JobId::new(job_id),
                    message: err.to_string(),
                }
            }
        },
        EngineEvent::DownloadCompleted { job_id, result } => match result {
            Ok(path) => Msg::DownloadFinished {
                job_id: JobId::new(job_id),
                saved_to: path.display().to_string(),
            },
            Err(err) => {
                deck_warn!("download for job {} failed: {}", job_id, err);
                Msg::DownloadFailed {
                    job_id: JobId::new(job_id),
                    message: err.to_string(),
                }
            }
        },
    }
}

fn status_report(reply: StatusReply) -> StatusReport {
    StatusReport {
        status: reply
            .status
            .filter(|s| !s.is_empty())
            .map(|s| JobStatus::parse(&s)),
        item_count: reply.count.or(reply.items_found).unwrap_or(0),
        error: reply.error,
    }
}

fn results_report(reply: ResultsReply) -> ResultsReport {
    ResultsReport {
        results: reply
            .results
            .map(|items| items.into_iter().map(result_item).collect()),
        error: reply.error,
    }
}

fn result_item(item: WireItem) -> ResultItem {
    ResultItem {
        title: item.title,
        description: item.description,
        price: item.price,
        link: item.link,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use scrapedeck_engine::StartReply;

    use super::*;

    #[test]
    fn status_reply_maps_to_report() {
        let msg = event_to_msg(EngineEvent::StatusCompleted {
            poll: 3,
            job_id: "j1".into(),
            result: Ok(StatusReply {
                status: Some("running".into()),
                ..StatusReply::default()
            }),
        });
        assert_eq!(
            msg,
            Msg::StatusReceived {
                poll: 3,
                report: StatusReport::with_status(JobStatus::Running, 0),
            }
        );
    }

    #[test]
    fn empty_status_string_counts_as_missing() {
        let msg = event_to_msg(EngineEvent::StatusCompleted {
            poll: 1,
            job_id: "j1".into(),
            result: Ok(StatusReply {
                status: Some(String::new()),
                count: Some(2),
                ..StatusReply::default()
            }),
        });
        let Msg::StatusReceived { report, .. } = msg else {
            panic!("expected a status message");
        };
        assert_eq!(report.status, None);
        assert_eq!(report.item_count, 2);
    }

    #[test]
    fn item_count_prefers_count_over_items_found() {
        let both = status_report(StatusReply {
            status: Some("running".into()),
            count: Some(3),
            items_found: Some(9),
            error: None,
        });
        assert_eq!(both.item_count, 3);
        let legacy = status_report(StatusReply {
            status: Some("running".into()),
            items_found: Some(9),
            ..StatusReply::default()
        });
        assert_eq!(legacy.item_count, 9);
    }

    #[test]
    fn start_reply_without_job_id_is_passed_through() {
        let msg = event_to_msg(EngineEvent::StartCompleted {
            result: Ok(StartReply::default()),
        });
        assert_eq!(msg, Msg::StartCompleted { job_id: None });
    }

    #[test]
    fn results_reply_keeps_absent_and_empty_distinct() {
        let absent = results_report(ResultsReply::default());
        assert_eq!(absent.results, None);
        let empty = results_report(ResultsReply {
            results: Some(Vec::new()),
            error: None,
        });
        assert_eq!(empty.results, Some(Vec::new()));
    }
}
