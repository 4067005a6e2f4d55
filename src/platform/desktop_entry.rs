//! @dose
//! purpose: Minimal freedesktop desktop-entry support: parse the `[Desktop Entry]`
//!     group of a `.desktop` file, derive desktop IDs, and expand the `Exec` key into
//!     concrete command lines for a list of items.
//!
//! when-editing:
//!     - !Only the `[Desktop Entry]` group is read; actions and localized keys are ignored
//!     - Field codes follow freedesktop conventions: %f %u single item, %F %U item list,
//!       %i %c %k and the deprecated codes expand to nothing, %% is a literal percent
//!
//! invariants:
//!     - Exec expansion always yields at least one command line
//!     - Extra arguments are placed directly after the program
//!
//! gotchas:
//!     - With only single-item codes and several items, one command line per item is produced
//!     - When Exec has no item field code at all, items are appended at the end

use crate::types::Item;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DESKTOP_SUFFIX: &str = ".desktop";

const MAIN_GROUP: &str = "Desktop Entry";

/// Custom key mapping a classic four-character creator code to an entry.
pub const CREATOR_KEY: &str = "X-Creator-Code";

static FIELD_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[a-zA-Z%]").unwrap());

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExecError {
    #[error("desktop entry has no Exec key")]
    MissingExec,
    #[error("unterminated quote in Exec value")]
    UnterminatedQuote,
    #[error("Exec value is empty")]
    Empty,
}

/// The `[Desktop Entry]` group of a desktop file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    fields: HashMap<String, String>,
}

impl DesktopEntry {
    pub fn parse(source: &str) -> Self {
        let mut fields = HashMap::new();
        let mut in_main_group = false;

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(group) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_main_group = group == MAIN_GROUP;
                continue;
            }
            if !in_main_group {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                fields
                    .entry(key.trim().to_string())
                    .or_insert_with(|| value.trim().to_string());
            }
        }

        Self { fields }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        fs::read_to_string(path).map(|source| Self::parse(&source))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("Name")
    }

    pub fn exec(&self) -> Option<&str> {
        self.get("Exec")
    }

    pub fn creator(&self) -> Option<&str> {
        self.get(CREATOR_KEY)
    }

    pub fn is_application(&self) -> bool {
        self.get("Type") == Some("Application")
    }

    pub fn is_hidden(&self) -> bool {
        self.get("Hidden") == Some("true")
    }

    /// Expand `Exec` into the command lines needed to open `items`.
    pub fn command_lines(&self, items: &[Item], extra: &[String]) -> Result<Vec<Vec<String>>, ExecError> {
        let exec = self.exec().ok_or(ExecError::MissingExec)?;
        expand_exec(exec, items, extra)
    }
}

/// Desktop file ID for `path` relative to an `applications` directory:
/// subdirectories join with `-` and the suffix is dropped.
pub fn desktop_id(applications_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(applications_dir).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("-");
    joined.strip_suffix(DESKTOP_SUFFIX).map(str::to_string)
}

/// Expand an Exec value into command lines. Quoting follows shell word splitting.
pub fn expand_exec(exec: &str, items: &[Item], extra: &[String]) -> Result<Vec<Vec<String>>, ExecError> {
    let tokens = shlex::split(exec).ok_or(ExecError::UnterminatedQuote)?;
    if tokens.is_empty() {
        return Err(ExecError::Empty);
    }

    let takes_list = tokens.iter().any(|t| t == "%F" || t == "%U");
    let takes_single = tokens
        .iter()
        .any(|t| t.contains("%f") || t.contains("%u"));

    let arguments: Vec<String> = items.iter().map(Item::as_argument).collect();
    let groups: Vec<&[String]> = if takes_single && !takes_list && arguments.len() > 1 {
        arguments.chunks(1).collect()
    } else {
        vec![&arguments[..]]
    };

    let lines = groups
        .into_iter()
        .map(|group| {
            let mut argv = Vec::new();
            for (index, token) in tokens.iter().enumerate() {
                match token.as_str() {
                    "%F" | "%U" => argv.extend(group.iter().cloned()),
                    "%f" | "%u" => argv.extend(group.first().cloned()),
                    "%i" | "%c" | "%k" => {}
                    _ => argv.push(substitute(token, group)),
                }
                if index == 0 {
                    argv.extend(extra.iter().cloned());
                }
            }
            if !takes_list && !takes_single {
                argv.extend(group.iter().cloned());
            }
            argv
        })
        .collect();

    Ok(lines)
}

/// Replace field codes embedded inside a larger token.
fn substitute(token: &str, group: &[String]) -> String {
    FIELD_CODE
        .replace_all(token, |caps: &Captures| match &caps[0] {
            "%%" => "%".to_string(),
            "%f" | "%u" => group.first().cloned().unwrap_or_default(),
            "%F" | "%U" => group.join(" "),
            _ => String::new(),
        })
        .into_owned()
}
