mod app;
mod effects;
mod input;
mod logging;
mod report;
pub mod ui;

pub use app::run_app;
pub use logging::{initialize as initialize_logging, LogDestination};
