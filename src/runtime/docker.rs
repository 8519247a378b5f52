use super::{ContainerHandle, ContainerMetadata, ContainerRuntime, ImageMetadata, RuntimeError};
use crate::image::ImageRef;
use async_trait::async_trait;
use bollard::container::{
    Config, DownloadFromContainerOptions, InspectContainerOptions, RemoveContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::Docker;
use futures_util::stream::TryStreamExt;
use tracing::debug;

/// [`ContainerRuntime`] backed by a Docker (or Podman) Engine API endpoint
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connects using `DOCKER_HOST` or the platform's default socket.
    pub fn connect() -> Result<Self, RuntimeError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RuntimeError::Connection(e.to_string()))?;
        Ok(Self { docker })
    }

    pub fn from_client(docker: Docker) -> Self {
        Self { docker }
    }

    pub async fn ping(&self) -> Result<(), RuntimeError> {
        let version = self
            .docker
            .version()
            .await
            .map_err(|e| RuntimeError::Connection(e.to_string()))?;
        debug!(
            api_version = version.api_version.as_deref().unwrap_or("unknown"),
            "Connected to container runtime"
        );
        Ok(())
    }
}

fn api_error(operation: &'static str, subject: &str, err: BollardError) -> RuntimeError {
    match err {
        BollardError::DockerResponseServerError {
            status_code: 404, ..
        } => RuntimeError::NotFound(subject.to_string()),
        other => RuntimeError::Api {
            operation,
            message: other.to_string(),
        },
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn inspect_image(&self, image: &ImageRef) -> Result<ImageMetadata, RuntimeError> {
        let name = image.to_string();
        let inspect = self
            .docker
            .inspect_image(&name)
            .await
            .map_err(|e| api_error("inspect image", &name, e))?;

        let config = inspect.config.unwrap_or_default();
        Ok(ImageMetadata {
            cmd: config.cmd.unwrap_or_default(),
            working_dir: non_empty(config.working_dir),
        })
    }

    async fn create_container(&self, image: &ImageRef) -> Result<ContainerHandle, RuntimeError> {
        let name = image.to_string();
        let config = Config {
            image: Some(name.clone()),
            ..Default::default()
        };

        let response = self
            .docker
            .create_container::<String, String>(None, config)
            .await
            .map_err(|e| api_error("create container", &name, e))?;

        for warning in &response.warnings {
            debug!(container = %response.id, warning = %warning, "Container created with warning");
        }
        Ok(ContainerHandle { id: response.id })
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerMetadata, RuntimeError> {
        let inspect = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| api_error("inspect container", id, e))?;

        Ok(ContainerMetadata {
            working_dir: non_empty(inspect.config.and_then(|c| c.working_dir)),
        })
    }

    async fn copy_from_container(&self, id: &str, path: &str) -> Result<Vec<u8>, RuntimeError> {
        let options = DownloadFromContainerOptions {
            path: path.to_string(),
        };

        let chunks: Vec<_> = self
            .docker
            .download_from_container(id, Some(options))
            .try_collect()
            .await
            .map_err(|e| api_error("copy from container", path, e))?;

        Ok(chunks.concat())
    }

    async fn remove_container(&self, id: &str) -> Result<(), RuntimeError> {
        let options = RemoveContainerOptions {
            force: true,
            v: true,
            ..Default::default()
        };

        self.docker
            .remove_container(id, Some(options))
            .await
            .map_err(|e| api_error("remove container", id, e))
    }

    fn name(&self) -> &str {
        "docker"
    }
}
