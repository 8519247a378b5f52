//! Procfile extraction strategies
//!
//! Each extractor derives raw Procfile bytes from an image in its own way.
//! [`MultiExtractor`] chains them: an extractor that reports
//! [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) hands over to the next
//! one, any other error stops the chain.

pub mod cmd;
pub mod file;
pub mod multi;

pub use cmd::CmdExtractor;
pub use file::FileExtractor;
pub use multi::MultiExtractor;

use crate::context::ExtractContext;
use crate::error::ExtractError;
use crate::image::ImageRef;
use crate::progress::ProgressHandler;
use async_trait::async_trait;

#[async_trait]
pub trait ProcfileExtractor: Send + Sync {
    /// Returns the raw Procfile declared by `image`.
    async fn extract(
        &self,
        ctx: &ExtractContext,
        image: &ImageRef,
        progress: &dyn ProgressHandler,
    ) -> Result<Vec<u8>, ExtractError>;

    fn name(&self) -> &str;
}
