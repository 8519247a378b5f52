use super::ProcfileExtractor;
use crate::archive;
use crate::context::ExtractContext;
use crate::error::ExtractError;
use crate::image::ImageRef;
use crate::procfile::PROCFILE_NAME;
use crate::progress::{ExtractionEvent, ProgressHandler};
use crate::runtime::{ContainerRuntime, RuntimeError};
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Reads the Procfile from the image's working directory.
///
/// A container is created (never started) so the image filesystem can be
/// copied from, and it is removed again before `extract` returns.
pub struct FileExtractor {
    runtime: Arc<dyn ContainerRuntime>,
    procfile_name: String,
}

impl FileExtractor {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self {
            runtime,
            procfile_name: PROCFILE_NAME.to_string(),
        }
    }

    pub fn with_procfile_name(mut self, name: impl Into<String>) -> Self {
        self.procfile_name = name.into();
        self
    }

    async fn read_procfile(
        &self,
        ctx: &ExtractContext,
        id: &str,
        progress: &dyn ProgressHandler,
    ) -> Result<Vec<u8>, ExtractError> {
        let path = self.procfile_path(ctx, id).await?;
        progress.on_progress(&ExtractionEvent::ProcfileLocated {
            id: id.to_string(),
            path: path.clone(),
        });
        self.copy_file(ctx, id, &path).await
    }

    /// `<WORKDIR>/Procfile`, or a path relative to the root when no WORKDIR is set.
    async fn procfile_path(&self, ctx: &ExtractContext, id: &str) -> Result<String, ExtractError> {
        let container = ctx
            .run("inspect container", self.runtime.inspect_container(id))
            .await?;

        Ok(match container.working_dir {
            Some(dir) => format!("{}/{}", dir.trim_end_matches('/'), self.procfile_name),
            None => self.procfile_name.clone(),
        })
    }

    async fn copy_file(
        &self,
        ctx: &ExtractContext,
        id: &str,
        path: &str,
    ) -> Result<Vec<u8>, ExtractError> {
        let tarball = match ctx
            .run("copy from container", self.runtime.copy_from_container(id, path))
            .await
        {
            Ok(tarball) => tarball,
            Err(e @ (RuntimeError::Cancelled { .. } | RuntimeError::Timeout { .. })) => {
                return Err(e.into())
            }
            Err(e) => return Err(ExtractError::not_found(e)),
        };

        archive::first_file(Cursor::new(tarball)).map_err(ExtractError::not_found)
    }
}

#[async_trait]
impl ProcfileExtractor for FileExtractor {
    async fn extract(
        &self,
        ctx: &ExtractContext,
        image: &ImageRef,
        progress: &dyn ProgressHandler,
    ) -> Result<Vec<u8>, ExtractError> {
        let container = ctx
            .run("create container", self.runtime.create_container(image))
            .await?;
        progress.on_progress(&ExtractionEvent::ContainerCreated {
            id: container.id.clone(),
            image: image.to_string(),
        });

        let guard = ContainerGuard::new(self.runtime.clone(), container.id);
        let result = self.read_procfile(ctx, guard.id(), progress).await;
        guard.release(ctx, progress).await;
        result
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Owns an ephemeral container and removes it exactly once.
///
/// [`ContainerGuard::release`] removes it on every normal exit path. If the
/// owning future is dropped first, `Drop` hands the removal to the runtime.
struct ContainerGuard {
    runtime: Arc<dyn ContainerRuntime>,
    id: String,
    released: bool,
}

impl ContainerGuard {
    fn new(runtime: Arc<dyn ContainerRuntime>, id: String) -> Self {
        Self {
            runtime,
            id,
            released: false,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    /// Removes the container. Failures are logged, never returned, so they
    /// cannot mask the outcome of the extraction itself.
    ///
    /// The removal runs as its own task: if the caller stops polling midway,
    /// it still completes.
    async fn release(mut self, ctx: &ExtractContext, progress: &dyn ProgressHandler) {
        self.released = true;

        // Cleanup ignores cancellation but still respects the per-call timeout.
        let removal = tokio::spawn(remove_container(
            self.runtime.clone(),
            self.id.clone(),
            ctx.timeout(),
        ));
        let result = removal.await.unwrap_or_else(|e| {
            Err(RuntimeError::Api {
                operation: "remove container",
                message: e.to_string(),
            })
        });

        if let Err(e) = &result {
            warn!(container = %self.id, error = %e, "Failed to remove ephemeral container");
        }
        progress.on_progress(&ExtractionEvent::ContainerRemoved {
            id: self.id.clone(),
            success: result.is_ok(),
        });
    }
}

async fn remove_container(
    runtime: Arc<dyn ContainerRuntime>,
    id: String,
    timeout: Option<Duration>,
) -> Result<(), RuntimeError> {
    let removal = runtime.remove_container(&id);
    match timeout {
        Some(timeout) => tokio::time::timeout(timeout, removal)
            .await
            .unwrap_or(Err(RuntimeError::Timeout {
                operation: "remove container",
                timeout,
            })),
        None => removal.await,
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let id = std::mem::take(&mut self.id);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!(container = %id, "Extraction abandoned, removing container in background");
                let runtime = self.runtime.clone();
                handle.spawn(async move {
                    if let Err(e) = remove_container(runtime, id.clone(), None).await {
                        warn!(container = %id, error = %e, "Failed to remove ephemeral container");
                    }
                });
            }
            Err(_) => {
                warn!(container = %id, "No async runtime available, ephemeral container leaked");
            }
        }
    }
}
