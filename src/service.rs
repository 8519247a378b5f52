//! Formation service
//!
//! Ties the pieces together: an extractor chain produces raw Procfile bytes,
//! the codec parses them and the mapper turns them into a [`Formation`].
//!
//! # Example
//!
//! ```no_run
//! use procfile_extract::{ExtractConfig, ExtractContext, FormationService, LoggingHandler};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = Arc::new(procfile_extract::runtime::DockerRuntime::connect()?);
//! let service = FormationService::with_runtime(runtime, &ExtractConfig::default());
//!
//! let image = "acme/web:latest".parse()?;
//! let formation = service
//!     .formation(&ExtractContext::new(), &image, &LoggingHandler)
//!     .await?;
//! for (name, process) in &formation {
//!     println!("{}: {}", name, process.command);
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::{ExtractConfig, Strategy};
use crate::context::ExtractContext;
use crate::error::ExtractError;
use crate::extractors::{CmdExtractor, FileExtractor, MultiExtractor, ProcfileExtractor};
use crate::formation::{formation_from_procfile, Formation};
use crate::image::ImageRef;
use crate::procfile;
use crate::progress::ProgressHandler;
use crate::runtime::ContainerRuntime;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct FormationService {
    extractor: Box<dyn ProcfileExtractor>,
}

impl FormationService {
    pub fn new(extractor: Box<dyn ProcfileExtractor>) -> Self {
        Self { extractor }
    }

    /// Builds the extractor chain described by `config` on top of `runtime`.
    pub fn with_runtime(runtime: Arc<dyn ContainerRuntime>, config: &ExtractConfig) -> Self {
        let extractors = config
            .strategies
            .iter()
            .map(|strategy| -> Box<dyn ProcfileExtractor> {
                match strategy {
                    Strategy::File => Box::new(
                        FileExtractor::new(runtime.clone())
                            .with_procfile_name(config.procfile_name.clone()),
                    ),
                    Strategy::Cmd => Box::new(CmdExtractor::new(runtime.clone())),
                }
            })
            .collect();

        Self::new(Box::new(MultiExtractor::new(extractors)))
    }

    /// Raw Procfile bytes from the first extractor that finds one.
    pub async fn procfile(
        &self,
        ctx: &ExtractContext,
        image: &ImageRef,
        progress: &dyn ProgressHandler,
    ) -> Result<Vec<u8>, ExtractError> {
        self.extractor.extract(ctx, image, progress).await
    }

    pub async fn formation(
        &self,
        ctx: &ExtractContext,
        image: &ImageRef,
        progress: &dyn ProgressHandler,
    ) -> Result<Formation, ExtractError> {
        let start = Instant::now();
        let bytes = self.procfile(ctx, image, progress).await?;
        let parsed = procfile::parse(&bytes)?;
        let formation = formation_from_procfile(&parsed)?;

        info!(
            image = %image,
            processes = formation.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Formation resolved"
        );
        Ok(formation)
    }
}
