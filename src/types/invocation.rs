//! @dose
//! purpose: The immutable description of one invocation: which action runs, which
//!     application (if any) it targets, and the launch modifiers handed to the launch
//!     service.
//!
//! invariants:
//!     - The action is decided once by the option parser
//!     - AppMatcher::Query and AppMatcher::Explicit never coexist
//!     - Launch modifiers other than `print` and `arguments` are only set for launching actions

use std::fmt;
use std::path::PathBuf;

/// What the invocation does once items and application are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Resolve the application and print its location.
    Find,
    /// Print each item's path or URL.
    FindItems,
    /// Launch the resolved application, optionally with documents.
    Open,
    /// Open each item with its default handler.
    OpenItems,
    /// Print metadata for each item.
    InfoItems,
    /// Open each item through the URL handler.
    LaunchUrls,
}

impl Action {
    /// Whether the action ends in a launch-service call.
    pub fn launches(self) -> bool {
        matches!(self, Action::Open | Action::OpenItems | Action::LaunchUrls)
    }
}

/// Four-character application creator code, e.g. `ToyS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorCode(String);

impl CreatorCode {
    pub const LEN: usize = 4;

    pub fn new(code: &str) -> Option<Self> {
        (code.len() == Self::LEN).then(|| Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreatorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

/// Registry lookup criteria; every populated field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppQuery {
    pub creator: Option<CreatorCode>,
    pub bundle_id: Option<String>,
    pub name: Option<String>,
}

impl AppQuery {
    pub fn is_empty(&self) -> bool {
        self.creator.is_none() && self.bundle_id.is_none() && self.name.is_none()
    }

    /// Copy of this query with `suffix` appended to the name.
    pub fn with_name_suffix(&self, suffix: &str) -> Option<Self> {
        let name = self.name.as_ref()?;
        Some(Self {
            name: Some(format!("{name}{suffix}")),
            ..self.clone()
        })
    }
}

impl fmt::Display for AppQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(creator) = &self.creator {
            parts.push(format!("creator {creator}"));
        }
        if let Some(bundle_id) = &self.bundle_id {
            parts.push(format!("bundle ID {bundle_id}"));
        }
        if let Some(name) = &self.name {
            parts.push(format!("name '{name}'"));
        }
        f.write_str(&parts.join(", "))
    }
}

/// How the application to use is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMatcher {
    /// Look the application up in the platform registry.
    Query(AppQuery),
    /// Use this application directly (from `-u` or an existing `-a` path).
    Explicit(PathBuf),
}

/// Flags that change how the launch service starts an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchModifiers {
    /// Return without waiting for the application (cleared by `-w` and by stdin items).
    pub asynchronous: bool,
    pub background: bool,
    pub new_instance: bool,
    pub hide: bool,
    pub suppress_default: bool,
    /// Ask the application to print the documents (`-p`).
    pub print: bool,
    /// Extra arguments passed to the launched application (`-o`).
    pub arguments: Vec<String>,
}

impl Default for LaunchModifiers {
    fn default() -> Self {
        Self {
            asynchronous: true,
            background: false,
            new_instance: false,
            hide: false,
            suppress_default: false,
            print: false,
            arguments: Vec::new(),
        }
    }
}

/// The validated result of option parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOptions {
    pub action: Action,
    pub matcher: Option<AppMatcher>,
    pub modifiers: LaunchModifiers,
    /// Interpret items as URLs even when a same-named file exists (`-U`).
    pub force_urls: bool,
}
