mod cli;
mod platform;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    platform::initialize_logging(args.log.into());
    platform::run_app(args.app_config())
}
