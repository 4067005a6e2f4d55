//! @dose
//! purpose: The Item type: one classified command-line target, either a remote URL or a
//!     local filesystem path. Items are created by the classifier and never change
//!     afterwards.
//!
//! invariants:
//!     - Remote items never carry the `file` scheme; file URLs are converted to Local
//!     - Display of a Local item drops a leading "./" and nothing else
//!
//! gotchas:
//!     - Local paths are kept exactly as typed (relative stays relative) so printed
//!       output matches what the user passed

use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A URL with a non-file scheme.
    Remote(Url),
    /// A filesystem path, possibly synthesized from standard input.
    Local(PathBuf),
}

impl Item {
    /// Build an item from a parsed URL, turning `file:` URLs into paths.
    ///
    /// Returns `None` for a `file:` URL with no local path (one naming a remote host).
    pub fn from_url(url: Url) -> Option<Self> {
        if url.scheme() != "file" {
            return Some(Item::Remote(url));
        }
        url.to_file_path().ok().map(Item::Local)
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Item::Local(path) => Some(path),
            Item::Remote(_) => None,
        }
    }

    /// Argument form handed to launched programs and openers.
    pub fn as_argument(&self) -> String {
        match self {
            Item::Remote(url) => url.as_str().to_string(),
            Item::Local(path) => path.to_string_lossy().into_owned(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Remote(url) => f.write_str(url.as_str()),
            Item::Local(path) => {
                let shown = path.to_string_lossy();
                f.write_str(shown.strip_prefix("./").unwrap_or(&shown))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_becomes_local() {
        let item = Item::from_url(Url::parse("file:///etc/hosts").unwrap());
        assert_eq!(item, Some(Item::Local(PathBuf::from("/etc/hosts"))));
    }

    #[test]
    fn test_file_url_with_host_is_rejected() {
        assert_eq!(Item::from_url(Url::parse("file://server/share/x").unwrap()), None);
        assert_eq!(
            Item::from_url(Url::parse("file://localhost/etc/hosts").unwrap()),
            Some(Item::Local(PathBuf::from("/etc/hosts")))
        );
    }

    #[test]
    fn test_remote_url_display() {
        let item = Item::from_url(Url::parse("http://example.com").unwrap()).unwrap();
        assert!(matches!(item, Item::Remote(_)));
        assert_eq!(item.to_string(), "http://example.com/");
        assert!(item.local_path().is_none());
    }

    #[test]
    fn test_local_display_strips_leading_dot_slash() {
        assert_eq!(Item::Local(PathBuf::from("./notes.txt")).to_string(), "notes.txt");
        assert_eq!(Item::Local(PathBuf::from("../notes.txt")).to_string(), "../notes.txt");
        assert_eq!(Item::Local(PathBuf::from("/bin/ls")).to_string(), "/bin/ls");
    }
}
