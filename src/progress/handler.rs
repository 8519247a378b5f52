//! Progress handler trait and events

/// Events emitted while extracting a Procfile from an image
#[derive(Debug, Clone)]
pub enum ExtractionEvent {
    /// An extractor in the chain is about to run
    StrategyStarted { strategy: String, image: String },

    /// An extractor found nothing and the chain moves on
    StrategySkipped { strategy: String, reason: String },

    /// An extractor produced a Procfile
    StrategySucceeded { strategy: String, bytes: usize },

    /// An ephemeral container was created to read files from
    ContainerCreated { id: String, image: String },

    /// The path the Procfile is expected at inside the container
    ProcfileLocated { id: String, path: String },

    /// The ephemeral container was torn down
    ContainerRemoved { id: String, success: bool },
}

/// Trait for handling progress events during extraction
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ExtractionEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ExtractionEvent) {}
}
