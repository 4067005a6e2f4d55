//! @dose
//! purpose: Classifies each positional argument as a local item or a remote URL, in
//!     command-line order, materializing "-" from standard input along the way.
//!
//! when-editing:
//!     - !Rules apply in order and the first match wins: stdin, existing path, absolute URL,
//!       email / hostname guesses (LaunchUrls only), located path
//!     - !An existing path is never reinterpreted as a URL unless -U was given
//!
//! invariants:
//!     - Output order equals input order
//!     - Reading standard input switches the returned options to a synchronous launch;
//!       the caller's options are left untouched
//!     - A file URL naming a remote host is not an item; it falls through to locate
//!
//! gotchas:
//!     - "a://b" is a URL only if no file of that name exists
//!     - Bare "example.com" is only guessed to be a website for -l

use crate::error::{LaunchError, Result};
use crate::platform::MetadataService;
use crate::stdin::{self, StdinTempFile};
use crate::types::{Action, InvocationOptions, Item};
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

const STDIN_TOKEN: &str = "-";

/// Classified items, the temp files backing any "-" items, and the options to launch with.
#[derive(Debug)]
pub struct Classified {
    pub items: Vec<Item>,
    pub temp_files: Vec<StdinTempFile>,
    pub options: InvocationOptions,
}

pub fn classify_items<M, R>(
    tokens: &[String],
    options: &InvocationOptions,
    metadata: &M,
    input: &mut R,
    temp_dir: &Path,
) -> Result<Classified>
where
    M: MetadataService + ?Sized,
    R: Read + ?Sized,
{
    let mut classified = Classified {
        items: Vec::with_capacity(tokens.len()),
        temp_files: Vec::new(),
        options: options.clone(),
    };

    for token in tokens {
        if token == STDIN_TOKEN {
            let file = stdin::materialize(input, temp_dir)?;
            classified.items.push(Item::Local(file.path().to_path_buf()));
            classified.temp_files.push(file);
            classified.options.modifiers.asynchronous = false;
            continue;
        }

        let item = classify_token(token, options, metadata)?;
        tracing::trace!("'{}' classified as {:?}", token, item);
        classified.items.push(item);
    }

    Ok(classified)
}

fn classify_token<M: MetadataService + ?Sized>(
    token: &str,
    options: &InvocationOptions,
    metadata: &M,
) -> Result<Item> {
    let path = Path::new(token);
    if !options.force_urls && metadata.exists(path) {
        return Ok(Item::Local(path.to_path_buf()));
    }

    if let Some(item) = Url::parse(token).ok().and_then(Item::from_url) {
        return Ok(item);
    }

    if options.action == Action::LaunchUrls {
        if let Some(item) = slack_url(token).and_then(Item::from_url) {
            return Ok(item);
        }
    }

    metadata
        .locate(path)
        .map_err(|status| LaunchError::platform(format!("unable to locate '{}'", token), status))?;
    Ok(Item::Local(PathBuf::from(token)))
}

/// Guess a URL for a token without a scheme: an email address or a hostname.
pub fn slack_url(token: &str) -> Option<Url> {
    if token.contains('@') && !token.contains('/') {
        if let Ok(url) = Url::parse(&format!("mailto:{token}")) {
            return Some(url);
        }
    }
    if token.contains('.') && !token.starts_with('/') {
        return Url::parse(&format!("http://{token}")).ok();
    }
    None
}
