//! Container runtime capabilities used by the extractors
//!
//! Extractors never talk to a container engine directly. They are handed an
//! `Arc<dyn ContainerRuntime>`; [`DockerRuntime`] implements it over the Docker
//! Engine API and [`MockRuntime`] implements it in memory for tests.

pub mod docker;
pub mod mock;

pub use docker::DockerRuntime;
pub use mock::{MockRuntime, RuntimeCall};

use crate::image::ImageRef;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to connect to container runtime: {0}")]
    Connection(String),

    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{operation} was cancelled")]
    Cancelled { operation: &'static str },

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

/// Image configuration relevant to Procfile discovery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Default command (`CMD`), empty when the image declares none
    pub cmd: Vec<String>,
    pub working_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerMetadata {
    pub working_dir: Option<String>,
}

#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn inspect_image(&self, image: &ImageRef) -> Result<ImageMetadata, RuntimeError>;

    /// Creates, but does not start, a container running the image's default command.
    async fn create_container(&self, image: &ImageRef) -> Result<ContainerHandle, RuntimeError>;

    async fn inspect_container(&self, id: &str) -> Result<ContainerMetadata, RuntimeError>;

    /// Returns a tar archive containing the file or directory at `path`.
    async fn copy_from_container(&self, id: &str, path: &str) -> Result<Vec<u8>, RuntimeError>;

    async fn remove_container(&self, id: &str) -> Result<(), RuntimeError>;

    fn name(&self) -> &str;
}
