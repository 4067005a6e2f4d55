//! @dose
//! purpose: The -f report: a header line naming the item's kind, followed by tab-indented
//!     attribute lines for whatever the metadata service could gather.
//!
//! when-editing:
//!     - !Lines appear in a fixed order; absent attributes are skipped, never printed empty
//!     - Size formatting follows the binary-prefix rules in format_size
//!
//! invariants:
//!     - Remote items print a single "<url>: URL" line and never reach the metadata service
//!     - Folders and volumes show contents, other kinds show size
//!
//! gotchas:
//!     - Dates render in local time

use crate::error::{LaunchError, Result};
use crate::platform::{ItemInfo, MetadataService, VolumeInfo};
use crate::types::Item;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::io::Write;

const KB: u64 = 1 << 10;
const MB: u64 = 1 << 20;
const GB: u64 = 1 << 30;
const TB: u64 = 1 << 40;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write the report for one item to `out`.
pub fn print_info<M, W>(item: &Item, metadata: &M, out: &mut W) -> Result<()>
where
    M: MetadataService + ?Sized,
    W: Write + ?Sized,
{
    let report = match item {
        Item::Remote(url) => format!("{}: URL\n", url),
        Item::Local(path) => {
            let info = metadata.item_info(path).map_err(|status| {
                LaunchError::platform(format!("unable to get information about '{}'", item), status)
            })?;
            render_info(&item.to_string(), &info)
        }
    };

    out.write_all(report.as_bytes())
        .map_err(|e| LaunchError::io("can't write to standard output", e))
}

pub fn render_info(shown: &str, info: &ItemInfo) -> String {
    let mut report = String::new();

    let _ = write!(report, "{}: ", shown);
    if info.hidden {
        report.push_str("invisible ");
    }
    if info.executable {
        report.push_str("executable ");
    }
    report.push_str(info.kind.label());
    report.push('\n');

    if let Some(bundle_id) = &info.bundle_id {
        let _ = writeln!(report, "\tbundle ID: {}", bundle_id);
    }
    if let Some(name) = &info.name {
        let _ = writeln!(report, "\tname: {}", name);
    }
    if !info.architectures.is_empty() {
        let _ = writeln!(report, "\tarchitecture: {}", info.architectures.join(", "));
    }

    let _ = writeln!(
        report,
        "\tattributes: {}",
        if info.read_only { "read-only" } else { "none" }
    );

    if let Some(links) = info.link_count.filter(|n| *n > 1) {
        let _ = writeln!(report, "\thard link count: {}", links);
    }

    if info.kind.is_container() {
        if let Some(entries) = info.entries {
            let _ = writeln!(report, "\tcontents: {}", format_count(entries));
        }
    } else if let Some(size) = format_sizes(info.logical_size, info.allocated_size) {
        let _ = writeln!(report, "\tsize: {}", size);
    }

    for (label, date) in [
        ("created", info.created),
        ("modified", info.modified),
        ("accessed", info.accessed),
    ] {
        if let Some(date) = date {
            let _ = writeln!(report, "\t{}: {}", label, format_date(&date));
        }
    }

    if let Some(volume) = &info.volume {
        render_volume(&mut report, volume);
    }

    if let Some(target) = &info.symlink_target {
        let _ = writeln!(report, "\ttarget: {}", target.display());
    }

    report
}

fn render_volume(report: &mut String, volume: &VolumeInfo) {
    if let Some(capacity) = volume.capacity {
        let _ = writeln!(report, "\tcapacity: {}", format_size(capacity));
    }
    if let Some(available) = volume.available {
        let _ = writeln!(report, "\tavailable: {}", format_size(available));
    }
    if let Some(length) = volume.max_name_length {
        let _ = writeln!(report, "\tmaximum name length: {}", length);
    }
    if let Some(read_only) = volume.read_only {
        let _ = writeln!(
            report,
            "\tis: {}",
            if read_only { "read-only" } else { "read-write" }
        );
    }
}

fn format_count(entries: u64) -> String {
    match entries {
        0 => "zero items".to_string(),
        1 => "1 item".to_string(),
        n => format!("{} items", n),
    }
}

fn format_sizes(logical: Option<u64>, allocated: Option<u64>) -> Option<String> {
    match (logical, allocated) {
        (Some(_), Some(0)) => Some("zero bytes on disk (zero bytes used)".to_string()),
        (Some(logical), Some(allocated)) => Some(format!(
            "{} on disk ({} bytes used)",
            format_size(allocated),
            logical
        )),
        (Some(size), None) | (None, Some(size)) => Some(format_size(size)),
        (None, None) => None,
    }
}

fn format_date(date: &DateTime<Local>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Human-readable size with binary prefixes.
pub fn format_size(size: u64) -> String {
    match size {
        0 => "zero bytes".to_string(),
        n if n < KB => format!("{} bytes", n),
        n if n < MB => format!("{:.1} KB", n as f64 / KB as f64),
        n if n < GB => format!("{:.2} MB", (n >> 10) as f64 / KB as f64),
        n if n < 4 * TB => format!("{:.2} GB", (n >> 20) as f64 / KB as f64),
        n => format!("{} TB", n >> 40),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::MemoryPlatform;
    use crate::platform::ItemKind;
    use crate::status::Status;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use url::Url;

    fn date() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "zero bytes");
        assert_eq!(format_size(1), "1 bytes");
        assert_eq!(format_size(1023), "1023 bytes");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * MB), "5.00 MB");
        assert_eq!(format_size(3 * GB / 2), "1.50 GB");
        assert_eq!(format_size(100 * GB), "100.00 GB");
        assert_eq!(format_size(5 * TB), "5 TB");
    }

    #[test]
    fn test_document_report() {
        let info = ItemInfo {
            kind: ItemKind::Document,
            link_count: Some(2),
            logical_size: Some(5),
            allocated_size: Some(4096),
            modified: Some(date()),
            ..Default::default()
        };
        assert_eq!(
            render_info("notes.txt", &info),
            "notes.txt: document\n\
             \tattributes: none\n\
             \thard link count: 2\n\
             \tsize: 4.0 KB on disk (5 bytes used)\n\
             \tmodified: 2024-03-09 14:05:00\n"
        );
    }

    #[test]
    fn test_empty_file_and_flags() {
        let info = ItemInfo {
            kind: ItemKind::Document,
            hidden: true,
            executable: true,
            read_only: true,
            link_count: Some(1),
            logical_size: Some(0),
            allocated_size: Some(0),
            architectures: vec!["x86_64".to_string(), "arm64".to_string()],
            ..Default::default()
        };
        assert_eq!(
            render_info(".tool", &info),
            ".tool: invisible executable document\n\
             \tarchitecture: x86_64, arm64\n\
             \tattributes: read-only\n\
             \tsize: zero bytes on disk (zero bytes used)\n"
        );
    }

    #[test]
    fn test_application_and_folder_report() {
        let app = ItemInfo {
            kind: ItemKind::Application,
            bundle_id: Some("org.example.Editor".to_string()),
            name: Some("Editor".to_string()),
            ..Default::default()
        };
        let report = render_info("org.example.Editor.desktop", &app);
        assert!(report.starts_with("org.example.Editor.desktop: application\n"));
        assert!(report.contains("\tbundle ID: org.example.Editor\n"));
        assert!(report.contains("\tname: Editor\n"));

        let folder = ItemInfo {
            kind: ItemKind::Folder,
            entries: Some(1),
            ..Default::default()
        };
        assert_eq!(
            render_info("docs", &folder),
            "docs: folder\n\tattributes: none\n\tcontents: 1 item\n"
        );
    }

    #[test]
    fn test_volume_and_symlink_report() {
        let volume = ItemInfo {
            kind: ItemKind::Volume,
            entries: Some(0),
            volume: Some(VolumeInfo {
                capacity: Some(2 * GB),
                available: Some(512 * MB),
                max_name_length: Some(255),
                read_only: Some(false),
            }),
            ..Default::default()
        };
        assert_eq!(
            render_info("/", &volume),
            "/: volume\n\
             \tattributes: none\n\
             \tcontents: zero items\n\
             \tcapacity: 2.00 GB\n\
             \tavailable: 512.00 MB\n\
             \tmaximum name length: 255\n\
             \tis: read-write\n"
        );

        let link = ItemInfo {
            kind: ItemKind::Symlink,
            symlink_target: Some(PathBuf::from("/etc/hosts")),
            ..Default::default()
        };
        assert!(render_info("hosts", &link).ends_with("\ttarget: /etc/hosts\n"));
    }

    #[test]
    fn test_print_info_remote_and_missing() {
        let platform = MemoryPlatform::new();
        let mut out = Vec::new();

        let remote = Item::Remote(Url::parse("https://example.com/").unwrap());
        print_info(&remote, &platform, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "https://example.com/: URL\n");

        let missing = Item::Local(PathBuf::from("./missing.txt"));
        let err = print_info(&missing, &platform, &mut Vec::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("unable to get information about 'missing.txt': {}", Status::FILE_NOT_FOUND)
        );
    }
}
