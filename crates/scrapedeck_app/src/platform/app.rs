use std::sync::mpsc;

use anyhow::{Context, Result};
use scrapedeck_core::{update, AppState, AppViewModel, JobId, Msg, ResultsView};
use scrapedeck_logging::{deck_debug, deck_error, deck_info};

use super::effects::EffectRunner;
use super::input::{spawn_stdin_reader, Command, HELP_TEXT};
use super::report::ReportWriter;
use super::ui;
use crate::cli::AppConfig;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum Inbound {
    Msg(Msg),
    Help,
    Quit,
    /// Stdin reached EOF; exit once the session settles.
    InputClosed,
}

pub fn run_app(config: AppConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel::<Inbound>();
    let runner = EffectRunner::new(config.api.clone(), config.output_dir.clone(), tx.clone())?;
    let reports = config
        .html_report
        .then(|| ReportWriter::new(&config.output_dir));
    let mut session = Session {
        state: AppState::with_poll_settings(config.poll),
        runner,
        reports,
        auto_download: config.auto_download,
        handled_table: None,
    };

    println!("{HELP_TEXT}");
    if let Some(url) = config.initial_url {
        for inbound in Command::Submit(url).into_inbound() {
            tx.send(inbound).context("queueing start-up URL")?;
        }
    }
    spawn_stdin_reader(tx).context("starting input reader")?;

    let mut input_closed = false;
    while let Ok(inbound) = rx.recv() {
        match inbound {
            Inbound::Msg(msg) => session.dispatch(msg),
            Inbound::Help => println!("{HELP_TEXT}"),
            Inbound::Quit => break,
            Inbound::InputClosed => input_closed = true,
        }
        if input_closed && session.view().is_settled() {
            break;
        }
    }
    deck_info!("session ended");
    Ok(())
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    reports: Option<ReportWriter>,
    auto_download: bool,
    /// Job whose table already got its report and auto-download.
    handled_table: Option<JobId>,
}

impl Session {
    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) {
        if let Msg::StatusReceived { poll, .. } | Msg::StatusFailed { poll, .. } = &msg {
            if self.state.active_poll() != Some(*poll) {
                deck_debug!("discarding status event of stale poll {}", poll);
            }
        }

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);

        if self.state.consume_dirty() {
            let view = self.state.view();
            println!("\n{}", ui::render::render(&view));
            self.after_render(&view);
        }
    }

    fn after_render(&mut self, view: &AppViewModel) {
        let ResultsView::Table(table) = &view.results else {
            return;
        };
        if self.handled_table.as_ref() == Some(table.job_id()) {
            return;
        }
        self.handled_table = Some(table.job_id().clone());

        if let Some(reports) = &self.reports {
            match reports.write(table.job_id(), &view.results) {
                Ok(path) => println!("HTML report saved to {}", path.display()),
                Err(err) => {
                    deck_error!("writing report for job {} failed: {}", table.job_id(), err);
                    println!("Could not save HTML report: {err}");
                }
            }
        }
        if self.auto_download {
            self.dispatch(Msg::DownloadClicked);
        }
    }
}
