use super::ProcfileExtractor;
use crate::context::ExtractContext;
use crate::error::{ErrorKind, ExtractError};
use crate::image::ImageRef;
use crate::progress::{ExtractionEvent, ProgressHandler};
use async_trait::async_trait;
use tracing::debug;

/// Tries each extractor in order until one succeeds.
///
/// A "not found" error moves on to the next extractor; any other error is
/// returned as-is. When every extractor comes up empty the result is
/// [`ExtractError::NoSuitableExtractor`], which is itself a "not found" so
/// chains can be nested.
pub struct MultiExtractor {
    extractors: Vec<Box<dyn ProcfileExtractor>>,
}

impl MultiExtractor {
    pub fn new(extractors: Vec<Box<dyn ProcfileExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

#[async_trait]
impl ProcfileExtractor for MultiExtractor {
    async fn extract(
        &self,
        ctx: &ExtractContext,
        image: &ImageRef,
        progress: &dyn ProgressHandler,
    ) -> Result<Vec<u8>, ExtractError> {
        for extractor in &self.extractors {
            progress.on_progress(&ExtractionEvent::StrategyStarted {
                strategy: extractor.name().to_string(),
                image: image.to_string(),
            });

            match extractor.extract(ctx, image, progress).await {
                Ok(procfile) => {
                    progress.on_progress(&ExtractionEvent::StrategySucceeded {
                        strategy: extractor.name().to_string(),
                        bytes: procfile.len(),
                    });
                    return Ok(procfile);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(strategy = extractor.name(), error = %e, "Trying next extractor");
                    progress.on_progress(&ExtractionEvent::StrategySkipped {
                        strategy: extractor.name().to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Err(ExtractError::NoSuitableExtractor)
    }

    fn name(&self) -> &str {
        "multi"
    }
}
