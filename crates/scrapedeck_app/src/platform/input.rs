use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use scrapedeck_core::Msg;
use scrapedeck_logging::{deck_debug, deck_warn};

use super::app::Inbound;

pub const HELP_TEXT: &str = "Type a search URL and press Enter to scrape it. \
Commands: cancel, download, help, quit.";

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Cancel,
    Download,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Command {
    match line.trim().to_ascii_lowercase().as_str() {
        "cancel" | "stop" => Command::Cancel,
        "download" | "dl" => Command::Download,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Submit(line.to_string()),
    }
}

impl Command {
    pub fn into_inbound(self) -> Vec<Inbound> {
        match self {
            Command::Submit(url) => vec![
                Inbound::Msg(Msg::InputChanged(url)),
                Inbound::Msg(Msg::SubmitClicked),
            ],
            Command::Cancel => vec![Inbound::Msg(Msg::CancelClicked)],
            Command::Download => vec![Inbound::Msg(Msg::DownloadClicked)],
            Command::Help => vec![Inbound::Help],
            Command::Quit => vec![Inbound::Quit],
        }
    }
}

/// Forwards stdin lines until EOF, then reports the closed input.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Inbound>) -> io::Result<()> {
    thread::Builder::new()
        .name("scrapedeck-stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        deck_warn!("stdin read failed: {}", err);
                        break;
                    }
                };
                for inbound in parse_line(&line).into_inbound() {
                    if tx.send(inbound).is_err() {
                        return;
                    }
                }
            }
            deck_debug!("stdin closed");
            let _ = tx.send(Inbound::InputClosed);
        })?;
    Ok(())
}
