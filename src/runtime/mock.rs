use super::{ContainerHandle, ContainerMetadata, ContainerRuntime, ImageMetadata, RuntimeError};
use crate::image::ImageRef;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A call observed by [`MockRuntime`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    InspectImage(String),
    CreateContainer(String),
    InspectContainer(String),
    CopyFromContainer { id: String, path: String },
    RemoveContainer(String),
}

/// In-memory runtime for tests.
///
/// Images are registered with [`MockRuntime::with_image`]; files are served
/// as pre-built tar archives keyed by path. Any operation can be made to fail.
pub struct MockRuntime {
    images: HashMap<String, ImageMetadata>,
    archives: HashMap<String, Vec<u8>>,
    failures: HashSet<&'static str>,
    calls: Mutex<Vec<RuntimeCall>>,
    containers: Mutex<HashMap<String, String>>,
    next_id: Mutex<u32>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            archives: HashMap::new(),
            failures: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            containers: Mutex::new(HashMap::new()),
            next_id: Mutex::new(0),
        }
    }

    pub fn with_image(mut self, image: &ImageRef, metadata: ImageMetadata) -> Self {
        self.images.insert(image.to_string(), metadata);
        self
    }

    /// Serves `archive` for copies of `path` out of any container.
    pub fn with_archive(mut self, path: impl Into<String>, archive: Vec<u8>) -> Self {
        self.archives.insert(path.into(), archive);
        self
    }

    /// Makes an operation fail: one of `inspect_image`, `create_container`,
    /// `inspect_container`, `copy_from_container` or `remove_container`.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failures.insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&RuntimeCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn removals(&self) -> usize {
        self.count(|c| matches!(c, RuntimeCall::RemoveContainer(_)))
    }

    fn record(&self, call: RuntimeCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: &'static str) -> Result<(), RuntimeError> {
        if self.failures.contains(operation) {
            return Err(RuntimeError::Api {
                operation,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn inspect_image(&self, image: &ImageRef) -> Result<ImageMetadata, RuntimeError> {
        let name = image.to_string();
        self.record(RuntimeCall::InspectImage(name.clone()));
        self.check("inspect_image")?;
        self.images
            .get(&name)
            .cloned()
            .ok_or(RuntimeError::NotFound(name))
    }

    async fn create_container(&self, image: &ImageRef) -> Result<ContainerHandle, RuntimeError> {
        let name = image.to_string();
        self.record(RuntimeCall::CreateContainer(name.clone()));
        self.check("create_container")?;
        if !self.images.contains_key(&name) {
            return Err(RuntimeError::NotFound(name));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = format!("mock-{}", *next_id);
        self.containers.lock().unwrap().insert(id.clone(), name);
        Ok(ContainerHandle { id })
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerMetadata, RuntimeError> {
        self.record(RuntimeCall::InspectContainer(id.to_string()));
        self.check("inspect_container")?;

        let image = self.containers.lock().unwrap().get(id).cloned();
        let working_dir = image
            .and_then(|name| self.images.get(&name))
            .and_then(|metadata| metadata.working_dir.clone());
        Ok(ContainerMetadata { working_dir })
    }

    async fn copy_from_container(&self, id: &str, path: &str) -> Result<Vec<u8>, RuntimeError> {
        self.record(RuntimeCall::CopyFromContainer {
            id: id.to_string(),
            path: path.to_string(),
        });
        self.check("copy_from_container")?;
        self.archives
            .get(path)
            .cloned()
            .ok_or_else(|| RuntimeError::NotFound(path.to_string()))
    }

    async fn remove_container(&self, id: &str) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::RemoveContainer(id.to_string()));
        self.check("remove_container")
    }

    fn name(&self) -> &str {
        "mock"
    }
}
