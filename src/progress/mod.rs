//! Progress reporting for extraction operations

mod handler;
mod logging;

pub use handler::{ExtractionEvent, NoOpHandler, ProgressHandler};
pub use logging::LoggingHandler;
