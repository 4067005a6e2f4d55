//! In-memory platform: a registry, launch service and metadata store that never touch
//! the operating system. Used to exercise the classifier, resolver and dispatcher.

use super::{AppRegistry, ItemInfo, LaunchRequest, LaunchService, MetadataService};
use crate::status::Status;
use crate::types::{AppQuery, Item, LaunchModifiers};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// An application known to the in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct MemoryApp {
    pub path: PathBuf,
    pub creator: Option<String>,
    pub bundle_id: Option<String>,
    pub name: Option<String>,
}

impl MemoryApp {
    fn matches(&self, query: &AppQuery) -> bool {
        let creator_ok = query
            .creator
            .as_ref()
            .is_none_or(|c| self.creator.as_deref() == Some(c.as_str()));
        let bundle_ok = query
            .bundle_id
            .as_ref()
            .is_none_or(|id| self.bundle_id.as_ref() == Some(id));
        let name_ok = query
            .name
            .as_ref()
            .is_none_or(|name| self.name.as_ref() == Some(name));
        creator_ok && bundle_ok && name_ok
    }
}

/// A launch-service call captured by the in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLaunch {
    pub application: Option<PathBuf>,
    pub items: Vec<Item>,
    pub modifiers: LaunchModifiers,
}

#[derive(Debug, Default)]
pub struct MemoryPlatform {
    suffix: Option<String>,
    apps: Vec<MemoryApp>,
    files: HashMap<PathBuf, ItemInfo>,
    launch_failure: Option<Status>,
    queries: RefCell<Vec<AppQuery>>,
    launches: RefCell<Vec<RecordedLaunch>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle_suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    pub fn with_app(mut self, app: MemoryApp) -> Self {
        self.apps.push(app);
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, info: ItemInfo) -> Self {
        self.files.insert(path.into(), info);
        self
    }

    /// Make every launch fail with `status`.
    pub fn failing_launches(mut self, status: Status) -> Self {
        self.launch_failure = Some(status);
        self
    }

    /// Registry queries in the order they were made.
    pub fn queries(&self) -> Vec<AppQuery> {
        self.queries.borrow().clone()
    }

    /// Launch requests in the order they were made.
    pub fn launches(&self) -> Vec<RecordedLaunch> {
        self.launches.borrow().clone()
    }
}

impl AppRegistry for MemoryPlatform {
    fn bundle_suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or(".app")
    }

    fn find_application(&self, query: &AppQuery) -> Result<PathBuf, Status> {
        self.queries.borrow_mut().push(query.clone());
        self.apps
            .iter()
            .find(|app| app.matches(query))
            .map(|app| app.path.clone())
            .ok_or(Status::APPLICATION_NOT_FOUND)
    }
}

impl LaunchService for MemoryPlatform {
    fn open(&self, request: &LaunchRequest<'_>) -> Result<(), Status> {
        if let Some(status) = self.launch_failure {
            return Err(status);
        }
        self.launches.borrow_mut().push(RecordedLaunch {
            application: request.application.map(Path::to_path_buf),
            items: request.items.to_vec(),
            modifiers: request.modifiers.clone(),
        });
        Ok(())
    }
}

impl MetadataService for MemoryPlatform {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn locate(&self, path: &Path) -> Result<(), Status> {
        if self.files.contains_key(path) {
            Ok(())
        } else {
            Err(Status::FILE_NOT_FOUND)
        }
    }

    fn item_info(&self, path: &Path) -> Result<ItemInfo, Status> {
        self.files.get(path).cloned().ok_or(Status::FILE_NOT_FOUND)
    }
}
