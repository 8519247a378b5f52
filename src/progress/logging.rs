//! Logging-based progress handler

use super::{ExtractionEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ExtractionEvent) {
        match event {
            ExtractionEvent::StrategyStarted { strategy, image } => {
                info!(strategy = %strategy, image = %image, "Trying Procfile extractor");
            }
            ExtractionEvent::StrategySkipped { strategy, reason } => {
                info!(strategy = %strategy, reason = %reason, "Extractor found no Procfile");
            }
            ExtractionEvent::StrategySucceeded { strategy, bytes } => {
                info!(strategy = %strategy, bytes, "Procfile extracted");
            }
            ExtractionEvent::ContainerCreated { id, image } => {
                debug!(container = %id, image = %image, "Created ephemeral container");
            }
            ExtractionEvent::ProcfileLocated { id, path } => {
                debug!(container = %id, path = %path, "Copying Procfile from container");
            }
            ExtractionEvent::ContainerRemoved { id, success } => {
                if *success {
                    debug!(container = %id, "Removed ephemeral container");
                } else {
                    warn!(container = %id, "Ephemeral container could not be removed");
                }
            }
        }
    }
}
