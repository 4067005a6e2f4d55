//! @dose
//! purpose: The narrow capability traits the core needs from the operating system:
//!     an application registry, a launch service and a file-metadata service. The
//!     classifier, resolver and dispatcher only talk to these traits, so they run
//!     unchanged against the freedesktop backend or the in-memory one.
//!
//! when-editing:
//!     - !Every failure crosses the trait boundary as a `Status`, never as a backend error
//!     - New backends implement all three traits; `Platform` is blanket-implemented
//!
//! invariants:
//!     - Traits take `&self`; backends own no state that changes during an invocation
//!       (the in-memory backend records launches behind a RefCell for tests)
//!
//! flows:
//!     - Registry: find_application(query) -> application path
//!     - Launch: open(LaunchRequest) -> ()
//!     - Metadata: exists / locate / item_info

pub mod desktop_entry;
pub mod memory;
pub mod xdg;

mod executable;
mod launcher;
mod metadata;

use crate::status::Status;
use crate::types::{AppQuery, Item, LaunchModifiers};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub use executable::architectures;
pub use xdg::XdgPlatform;

/// Application lookup by creator code, bundle identifier and/or name.
pub trait AppRegistry {
    /// Suffix carried by application bundles on this platform.
    fn bundle_suffix(&self) -> &str {
        ".app"
    }

    /// Return the one application matching every populated field of `query`.
    fn find_application(&self, query: &AppQuery) -> Result<PathBuf, Status>;
}

/// One call into the launch service.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    /// Application to open the items with; `None` uses each item's default handler.
    pub application: Option<&'a Path>,
    pub items: &'a [Item],
    pub modifiers: &'a LaunchModifiers,
}

/// Opens applications, documents and URLs.
pub trait LaunchService {
    fn open(&self, request: &LaunchRequest<'_>) -> Result<(), Status>;
}

/// File metadata queries.
pub trait MetadataService {
    /// Cheap existence check (`stat`), used before any URL heuristics.
    fn exists(&self, path: &Path) -> bool;

    /// Verify that `path` names an item the platform can work with.
    fn locate(&self, path: &Path) -> Result<(), Status>;

    /// Gather everything the info report prints about `path`.
    fn item_info(&self, path: &Path) -> Result<ItemInfo, Status>;
}

/// Everything an invocation needs from the operating system.
pub trait Platform: AppRegistry + LaunchService + MetadataService {}

impl<T: AppRegistry + LaunchService + MetadataService + ?Sized> Platform for T {}

/// What kind of filesystem object an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemKind {
    Volume,
    Application,
    Folder,
    Symlink,
    NamedPipe,
    CharacterDevice,
    BlockDevice,
    Socket,
    Document,
    #[default]
    Unknown,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Volume => "volume",
            ItemKind::Application => "application",
            ItemKind::Folder => "folder",
            ItemKind::Symlink => "symbolic link",
            ItemKind::NamedPipe => "named pipe",
            ItemKind::CharacterDevice => "character device",
            ItemKind::BlockDevice => "block device",
            ItemKind::Socket => "socket",
            ItemKind::Document => "document",
            ItemKind::Unknown => "unknown",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, ItemKind::Folder | ItemKind::Volume)
    }
}

/// Attributes of the volume mounted at an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeInfo {
    pub capacity: Option<u64>,
    pub available: Option<u64>,
    pub max_name_length: Option<u64>,
    pub read_only: Option<bool>,
}

/// Metadata about one local item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemInfo {
    pub kind: ItemKind,
    pub hidden: bool,
    pub executable: bool,
    pub bundle_id: Option<String>,
    pub name: Option<String>,
    /// CPU architectures found in an executable header; empty when none.
    pub architectures: Vec<String>,
    pub read_only: bool,
    pub link_count: Option<u64>,
    /// Number of entries, for folders.
    pub entries: Option<u64>,
    pub logical_size: Option<u64>,
    pub allocated_size: Option<u64>,
    pub created: Option<DateTime<Local>>,
    pub modified: Option<DateTime<Local>>,
    pub accessed: Option<DateTime<Local>>,
    pub volume: Option<VolumeInfo>,
    pub symlink_target: Option<PathBuf>,
}
