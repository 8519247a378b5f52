use super::ProcfileExtractor;
use crate::context::ExtractContext;
use crate::error::ExtractError;
use crate::image::ImageRef;
use crate::procfile::{self, ProcessDescriptor, Procfile};
use crate::progress::ProgressHandler;
use crate::runtime::ContainerRuntime;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Builds a Procfile from the image's `CMD`, assuming it is the `web` process.
///
/// Never reports "not found": every image has a (possibly empty) default command.
pub struct CmdExtractor {
    runtime: Arc<dyn ContainerRuntime>,
}

impl CmdExtractor {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl ProcfileExtractor for CmdExtractor {
    async fn extract(
        &self,
        ctx: &ExtractContext,
        image: &ImageRef,
        _progress: &dyn ProgressHandler,
    ) -> Result<Vec<u8>, ExtractError> {
        let metadata = ctx
            .run("inspect image", self.runtime.inspect_image(image))
            .await?;
        debug!(image = %image, cmd = ?metadata.cmd, "Synthesizing web process from CMD");

        let procfile = Procfile::Extended(BTreeMap::from([(
            "web".to_string(),
            ProcessDescriptor::args(metadata.cmd),
        )]));
        Ok(procfile::marshal(&procfile)?)
    }

    fn name(&self) -> &str {
        "cmd"
    }
}
