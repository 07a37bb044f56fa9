use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use scrapedeck_core::PollSettings;
use scrapedeck_engine::{ApiSettings, DEFAULT_BASE_URL};

use crate::platform::LogDestination;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "scrapedeck",
    version,
    about = "Submit a scrape job to a scraping service, follow it, and show its results"
)]
pub struct Cli {
    /// Search URL to submit at start-up
    pub url: Option<String>,

    /// Base URL of the scraping service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Delay between status checks, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Whole-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Connect timeout, in seconds
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Directory for downloaded artifacts and HTML reports
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Write an HTML report of the results table into the output directory
    #[arg(long)]
    pub html_report: bool,

    /// Download the job's CSV artifact as soon as results are shown
    #[arg(long)]
    pub auto_download: bool,

    /// Where log lines go
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Everything the running app needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub poll: PollSettings,
    pub output_dir: PathBuf,
    pub html_report: bool,
    pub auto_download: bool,
    pub initial_url: Option<String>,
}

impl Cli {
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            api: ApiSettings {
                base_url: self.base_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                ..ApiSettings::default()
            },
            poll: PollSettings {
                interval: Duration::from_millis(self.poll_interval_ms),
            },
            output_dir: self.output_dir.clone(),
            html_report: self.html_report,
            auto_download: self.auto_download,
            initial_url: self.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_settings() {
        let cli = Cli::parse_from(["scrapedeck"]);
        let config = cli.app_config();
        let api_defaults = ApiSettings::default();
        assert_eq!(config.api.base_url, api_defaults.base_url);
        assert_eq!(config.api.connect_timeout, api_defaults.connect_timeout);
        assert_eq!(config.api.request_timeout, api_defaults.request_timeout);
        assert_eq!(config.poll, PollSettings::default());
        assert_eq!(cli.log, LogTarget::File);
        assert!(config.initial_url.is_none());
    }

    #[test]
    fn flags_are_carried_into_config() {
        let cli = Cli::parse_from([
            "scrapedeck",
            "--base-url",
            "http://scraper.lan:8080",
            "--poll-interval-ms",
            "500",
            "--auto-download",
            "--log",
            "both",
            "https://www.olx.in/items/q-car-cover",
        ]);
        let config = cli.app_config();
        assert_eq!(config.api.base_url, "http://scraper.lan:8080");
        assert_eq!(config.poll.interval, Duration::from_millis(500));
        assert!(config.auto_download);
        assert!(!config.html_report);
        assert_eq!(cli.log, LogTarget::Both);
        assert_eq!(
            config.initial_url.as_deref(),
            Some("https://www.olx.in/items/q-car-cover")
        );
    }
}
