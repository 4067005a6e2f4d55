//! @dose
//! purpose: Filesystem-backed metadata queries: existence checks for the classifier and
//!     the full ItemInfo record for the info report.
//!
//! when-editing:
//!     - !Queries never follow a final symlink except `exists`, which mirrors `stat`
//!     - Volume attributes are only gathered for mount points
//!
//! invariants:
//!     - Failures map to a Status via Status::from_io
//!     - Missing optional attributes stay None instead of failing the whole query
//!
//! gotchas:
//!     - Architecture sniffing only runs on files with an execute bit, so data files whose
//!       magic collides with fat Mach-O (Java classes) are not misreported

use super::desktop_entry::{self, DesktopEntry, DESKTOP_SUFFIX};
use super::executable::architectures;
use super::{ItemInfo, ItemKind, VolumeInfo};
use crate::status::Status;
use chrono::{DateTime, Local};
use std::fs::{self, Metadata};
use std::path::Path;

pub(crate) fn exists(path: &Path) -> bool {
    fs::metadata(path).is_ok()
}

pub(crate) fn locate(path: &Path) -> Result<(), Status> {
    fs::symlink_metadata(path)
        .map(|_| ())
        .map_err(|e| Status::from_io(&e))
}

pub(crate) fn item_info(path: &Path) -> Result<ItemInfo, Status> {
    let meta = fs::symlink_metadata(path).map_err(|e| Status::from_io(&e))?;
    let file_type = meta.file_type();

    let mut info = ItemInfo {
        hidden: path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(false),
        read_only: meta.permissions().readonly(),
        created: meta.created().ok().map(DateTime::<Local>::from),
        modified: meta.modified().ok().map(DateTime::<Local>::from),
        accessed: meta.accessed().ok().map(DateTime::<Local>::from),
        ..Default::default()
    };
    fill_unix_fields(&meta, &mut info);

    if file_type.is_symlink() {
        info.kind = ItemKind::Symlink;
        info.symlink_target = fs::read_link(path).ok();
    } else if file_type.is_dir() {
        info.kind = if is_mount_point(path, &meta) {
            info.volume = Some(volume_info(path));
            ItemKind::Volume
        } else {
            ItemKind::Folder
        };
        info.entries = fs::read_dir(path).ok().map(|dir| dir.count() as u64);
    } else if file_type.is_file() {
        info.kind = ItemKind::Document;
        if path.to_string_lossy().ends_with(DESKTOP_SUFFIX) {
            fill_desktop_entry(path, &mut info);
        }
        if info.executable {
            info.architectures = architectures(path);
        }
    } else {
        info.kind = special_kind(&meta);
    }

    if info.kind.is_container() {
        info.logical_size = None;
        info.allocated_size = None;
    }

    Ok(info)
}

fn fill_desktop_entry(path: &Path, info: &mut ItemInfo) {
    let Ok(entry) = DesktopEntry::load(path) else {
        return;
    };
    if !entry.is_application() {
        return;
    }
    info.kind = ItemKind::Application;
    info.name = entry.name().map(str::to_string);
    info.bundle_id = path
        .parent()
        .and_then(|dir| desktop_entry::desktop_id(dir, path));
}

#[cfg(unix)]
fn fill_unix_fields(meta: &Metadata, info: &mut ItemInfo) {
    use std::os::unix::fs::MetadataExt;

    info.link_count = Some(meta.nlink());
    info.logical_size = Some(meta.len());
    info.allocated_size = Some(meta.blocks() * 512);
    info.executable = meta.file_type().is_file() && meta.mode() & 0o111 != 0;
}

#[cfg(not(unix))]
fn fill_unix_fields(meta: &Metadata, info: &mut ItemInfo) {
    info.logical_size = Some(meta.len());
}

#[cfg(unix)]
fn special_kind(meta: &Metadata) -> ItemKind {
    use std::os::unix::fs::FileTypeExt;

    let file_type = meta.file_type();
    if file_type.is_fifo() {
        ItemKind::NamedPipe
    } else if file_type.is_char_device() {
        ItemKind::CharacterDevice
    } else if file_type.is_block_device() {
        ItemKind::BlockDevice
    } else if file_type.is_socket() {
        ItemKind::Socket
    } else {
        ItemKind::Unknown
    }
}

#[cfg(not(unix))]
fn special_kind(_meta: &Metadata) -> ItemKind {
    ItemKind::Unknown
}

#[cfg(unix)]
fn is_mount_point(path: &Path, meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    let Ok(canonical) = path.canonicalize() else {
        return false;
    };
    match canonical.parent() {
        None => true,
        Some(parent) => fs::metadata(parent)
            .map(|parent_meta| parent_meta.dev() != meta.dev())
            .unwrap_or(false),
    }
}

#[cfg(not(unix))]
fn is_mount_point(path: &Path, _meta: &Metadata) -> bool {
    path.parent().is_none()
}

#[cfg(unix)]
#[allow(clippy::unnecessary_cast)]
fn volume_info(path: &Path) -> VolumeInfo {
    use nix::sys::statvfs::{statvfs, FsFlags};

    match statvfs(path) {
        Ok(stats) => {
            let fragment = stats.fragment_size() as u64;
            VolumeInfo {
                capacity: Some(stats.blocks() as u64 * fragment),
                available: Some(stats.blocks_available() as u64 * fragment),
                max_name_length: Some(stats.name_max() as u64),
                read_only: Some(stats.flags().contains(FsFlags::ST_RDONLY)),
            }
        }
        Err(err) => {
            tracing::debug!("statvfs failed for {}: {}", path.display(), err);
            VolumeInfo::default()
        }
    }
}

#[cfg(not(unix))]
fn volume_info(_path: &Path) -> VolumeInfo {
    VolumeInfo::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_missing_is_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");
        assert!(!exists(&missing));
        assert_eq!(locate(&missing), Err(Status::FILE_NOT_FOUND));
        assert_eq!(item_info(&missing), Err(Status::FILE_NOT_FOUND));
    }

    #[test]
    fn test_document_info() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        assert!(exists(&path));
        let info = item_info(&path).unwrap();
        assert_eq!(info.kind, ItemKind::Document);
        assert_eq!(info.logical_size, Some(5));
        assert!(!info.hidden);
        assert!(!info.executable);
        assert!(info.architectures.is_empty());
        assert!(info.modified.is_some());
    }

    #[test]
    fn test_folder_counts_entries() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".cache");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a"), "").unwrap();
        fs::write(dir.join("b"), "").unwrap();

        let info = item_info(&dir).unwrap();
        assert_eq!(info.kind, ItemKind::Folder);
        assert_eq!(info.entries, Some(2));
        assert!(info.hidden);
        assert_eq!(info.logical_size, None);
    }

    #[test]
    fn test_desktop_application_info() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("org.example.Editor.desktop");
        fs::write(
            &path,
            "[Desktop Entry]\nType=Application\nName=Example Editor\nExec=editor %F\n",
        )
        .unwrap();

        let info = item_info(&path).unwrap();
        assert_eq!(info.kind, ItemKind::Application);
        assert_eq!(info.name.as_deref(), Some("Example Editor"));
        assert_eq!(info.bundle_id.as_deref(), Some("org.example.Editor"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_info_and_dangling_locate() {
        let temp_dir = TempDir::new().unwrap();
        let link = temp_dir.path().join("dangling");
        std::os::unix::fs::symlink(temp_dir.path().join("nowhere"), &link).unwrap();

        assert!(!exists(&link));
        assert_eq!(locate(&link), Ok(()));
        let info = item_info(&link).unwrap();
        assert_eq!(info.kind, ItemKind::Symlink);
        assert_eq!(info.symlink_target, Some(temp_dir.path().join("nowhere")));
    }

    #[cfg(unix)]
    #[test]
    fn test_root_is_a_volume() {
        let info = item_info(Path::new("/")).unwrap();
        assert_eq!(info.kind, ItemKind::Volume);
        assert!(info.volume.is_some());
    }
}
