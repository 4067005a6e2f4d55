//! @dose
//! purpose: The freedesktop platform backend used by the binary. The application
//!     registry is the set of desktop entries found under the XDG data directories; the
//!     launch and metadata services delegate to the launcher and metadata modules.
//!
//! when-editing:
//!     - !Directory order is precedence order: XDG_DATA_HOME, XDG_DATA_DIRS, then extra dirs
//!     - !A desktop ID provided by an earlier directory shadows later ones, even when the
//!       earlier entry is hidden or not an application
//!
//! invariants:
//!     - Lookup is deterministic: entries are visited sorted by file name
//!     - No match yields APPLICATION_NOT_FOUND
//!
//! gotchas:
//!     - Bundle IDs are desktop IDs, names match `Name=` or the file name with suffix,
//!       creator codes match the X-Creator-Code key

use super::desktop_entry::{self, DesktopEntry, DESKTOP_SUFFIX};
use super::{launcher, metadata};
use super::{AppRegistry, ItemInfo, LaunchRequest, LaunchService, MetadataService};
use crate::config::Config;
use crate::status::Status;
use crate::types::AppQuery;
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DEFAULT_DATA_DIRS: &str = "/usr/local/share:/usr/share";

#[derive(Debug, Clone)]
pub struct XdgPlatform {
    application_dirs: Vec<PathBuf>,
    opener: String,
    print_command: String,
}

/// A desktop entry found while scanning the application directories.
struct Candidate {
    id: String,
    path: PathBuf,
    entry: DesktopEntry,
}

impl XdgPlatform {
    pub fn new(application_dirs: Vec<PathBuf>, opener: impl Into<String>, print_command: impl Into<String>) -> Self {
        Self {
            application_dirs,
            opener: opener.into(),
            print_command: print_command.into(),
        }
    }

    /// Backend configured from the environment and the loaded config.
    pub fn from_config(config: &Config) -> Self {
        let mut dirs = default_application_dirs();
        dirs.extend(config.registry.extra_dirs.iter().cloned());
        Self::new(dirs, &config.opener, &config.print_command)
    }

    pub fn application_dirs(&self) -> &[PathBuf] {
        &self.application_dirs
    }

    fn candidates(&self) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for dir in &self.application_dirs {
            let walker = WalkDir::new(dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file());

            for dir_entry in walker {
                let path = dir_entry.path();
                if !path.to_string_lossy().ends_with(DESKTOP_SUFFIX) {
                    continue;
                }
                let Some(id) = desktop_entry::desktop_id(dir, path) else {
                    continue;
                };
                if !seen.insert(id.clone()) {
                    continue;
                }
                match DesktopEntry::load(path) {
                    Ok(entry) => candidates.push(Candidate {
                        id,
                        path: path.to_path_buf(),
                        entry,
                    }),
                    Err(err) => tracing::debug!("skipping {}: {}", path.display(), err),
                }
            }
        }

        candidates
    }
}

impl Candidate {
    fn matches(&self, query: &AppQuery) -> bool {
        if self.entry.is_hidden() || !self.entry.is_application() {
            return false;
        }
        if let Some(creator) = &query.creator {
            if self.entry.creator() != Some(creator.as_str()) {
                return false;
            }
        }
        if let Some(bundle_id) = &query.bundle_id {
            if &self.id != bundle_id {
                return false;
            }
        }
        if let Some(name) = &query.name {
            let file_name = self.path.file_name().map(|n| n.to_string_lossy());
            let by_name = self.entry.name() == Some(name.as_str());
            let by_file = file_name.as_deref() == Some(name.as_str());
            if !by_name && !by_file {
                return false;
            }
        }
        true
    }
}

/// `$XDG_DATA_HOME/applications` followed by each `$XDG_DATA_DIRS` entry.
pub fn default_application_dirs() -> Vec<PathBuf> {
    let data_home = env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::data_dir);

    let data_dirs = env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_DIRS.to_string());

    data_home
        .into_iter()
        .chain(data_dirs.split(':').filter(|d| !d.is_empty()).map(PathBuf::from))
        .map(|dir| dir.join("applications"))
        .collect()
}

impl AppRegistry for XdgPlatform {
    fn bundle_suffix(&self) -> &str {
        DESKTOP_SUFFIX
    }

    fn find_application(&self, query: &AppQuery) -> Result<PathBuf, Status> {
        let found = self
            .candidates()
            .into_iter()
            .find(|candidate| candidate.matches(query))
            .map(|candidate| candidate.path);

        match found {
            Some(path) => {
                tracing::debug!("{} matched {}", query, path.display());
                Ok(path)
            }
            None => Err(Status::APPLICATION_NOT_FOUND),
        }
    }
}

impl LaunchService for XdgPlatform {
    fn open(&self, request: &LaunchRequest<'_>) -> Result<(), Status> {
        launcher::open(&self.opener, &self.print_command, request)
    }
}

impl MetadataService for XdgPlatform {
    fn exists(&self, path: &Path) -> bool {
        metadata::exists(path)
    }

    fn locate(&self, path: &Path) -> Result<(), Status> {
        metadata::locate(path)
    }

    fn item_info(&self, path: &Path) -> Result<ItemInfo, Status> {
        metadata::item_info(path)
    }
}
