//! procfile-extract - discover the processes a container image declares
//!
//! Given an image reference, this library finds the image's Procfile and turns
//! it into a [`Formation`]: a table of process names and launch commands.
//!
//! # Core Concepts
//!
//! - **Extractors**: interchangeable strategies that derive raw Procfile bytes
//!   from an image. [`FileExtractor`] reads the file out of a throwaway
//!   container, [`CmdExtractor`] synthesizes a `web` process from the image's
//!   `CMD`, and [`MultiExtractor`] chains them.
//! - **Error kinds**: an extractor that simply finds nothing returns an error of
//!   kind [`ErrorKind::NotFound`] and the chain moves on; anything else aborts.
//! - **Runtime**: all container operations go through the
//!   [`ContainerRuntime`](runtime::ContainerRuntime) trait, implemented for
//!   Docker by [`DockerRuntime`](runtime::DockerRuntime).
//!
//! # Example Usage
//!
//! ```ignore
//! use procfile_extract::{ExtractConfig, ExtractContext, FormationService, NoOpHandler};
//! use procfile_extract::runtime::DockerRuntime;
//! use std::sync::Arc;
//!
//! let runtime = Arc::new(DockerRuntime::connect()?);
//! let service = FormationService::with_runtime(runtime, &ExtractConfig::default());
//! let formation = service
//!     .formation(&ExtractContext::new(), &"acme/web:latest".parse()?, &NoOpHandler)
//!     .await?;
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod formation;
pub mod image;
pub mod procfile;
pub mod progress;
pub mod runtime;
pub mod service;
pub mod util;

pub use config::{ConfigError, ExtractConfig, Strategy};
pub use context::ExtractContext;
pub use error::{ErrorKind, ExtractError, NotFoundCause};
pub use extractors::{CmdExtractor, FileExtractor, MultiExtractor, ProcfileExtractor};
pub use formation::{formation_from_procfile, Command, Formation, FormationError, Process};
pub use image::{ImageRef, ImageRefError};
pub use procfile::{Procfile, ProcfileError};
pub use progress::{ExtractionEvent, LoggingHandler, NoOpHandler, ProgressHandler};
pub use service::FormationService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "procfile-extract");
    }
}
