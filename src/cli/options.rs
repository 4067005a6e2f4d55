//! @dose
//! purpose: Turns parsed command-line flags into InvocationOptions: picks the action,
//!     builds the application matcher and launch modifiers, and rejects contradictory
//!     combinations with the exact usage message for each.
//!
//! when-editing:
//!     - !Checks run in a fixed order; the first failing one determines the message
//!     - !Only existence checks reach the platform here (-a path, -u target); nothing launches
//!
//! invariants:
//!     - Without a matcher, Find becomes FindItems and Open becomes OpenItems
//!     - A returned InvocationOptions never combines an explicit application with a query
//!
//! gotchas:
//!     - -a is a path when that path exists, otherwise an application name
//!     - The creator length is counted in bytes

use super::Cli;
use crate::error::{LaunchError, Result};
use crate::platform::MetadataService;
use crate::types::{Action, AppMatcher, AppQuery, CreatorCode, InvocationOptions, LaunchModifiers};
use std::path::{Path, PathBuf};
use url::Url;

const INCOMPATIBLE_URL: &str =
    "application URL (argument of -u) incompatible with matching by -c, -i, -a";

pub fn parse_options<M: MetadataService + ?Sized>(cli: &Cli, metadata: &M) -> Result<InvocationOptions> {
    if cli.action_count() > 1 {
        return Err(LaunchError::usage("choose only one of -n, -p, -f, -l options"));
    }
    if cli.superuser {
        return Err(LaunchError::usage("-s option no longer functional, sorry"));
    }

    let creator = match &cli.creator {
        Some(code) => Some(CreatorCode::new(code).ok_or_else(|| {
            LaunchError::usage("creator (argument of -c) must be four characters long")
        })?),
        None => None,
    };
    let mut query = AppQuery {
        creator,
        bundle_id: cli.bundle_id.clone(),
        name: None,
    };

    let mut explicit = None;
    if let Some(app) = &cli.app_name {
        if metadata.exists(Path::new(app)) {
            explicit = Some(PathBuf::from(app));
        } else {
            query.name = Some(app.clone());
        }
    }

    if let Some(url) = &cli.app_url {
        let path = application_from_url(url, metadata)?;
        if explicit.is_some() || !query.is_empty() {
            return Err(LaunchError::usage(INCOMPATIBLE_URL));
        }
        explicit = Some(path);
    } else if explicit.is_some() && !query.is_empty() {
        return Err(LaunchError::usage(INCOMPATIBLE_URL));
    }

    let mut action = if cli.find > 0 {
        Action::Find
    } else if cli.info > 0 {
        Action::InfoItems
    } else if cli.launch_urls > 0 {
        Action::LaunchUrls
    } else {
        Action::Open
    };

    if !action.launches() && cli.has_launch_modifiers() {
        return Err(LaunchError::usage(
            "options -w, -b, -m, -h, -L, -U apply to application launch (not -n or -f)",
        ));
    }

    let matcher = match explicit {
        Some(path) => Some(AppMatcher::Explicit(path)),
        None if !query.is_empty() => Some(AppMatcher::Query(query)),
        None => None,
    };

    if matcher.is_none() {
        if cli.items.is_empty() {
            return Err(LaunchError::usage(
                "without items, must specify an application by -u, or one or more of -c, -i, -a",
            ));
        }
        action = match action {
            Action::Find => Action::FindItems,
            Action::Open => Action::OpenItems,
            other => other,
        };
    }

    if action == Action::InfoItems && matcher.is_some() {
        return Err(LaunchError::usage(
            "can't get information (-f) on item(s) using an application (-u, -c, -i, -a)",
        ));
    }

    if cli.print > 0 && cli.items.is_empty() {
        return Err(LaunchError::usage(
            "print option (-p) must be accompanied by document(s) to print",
        ));
    }

    if action == Action::Find && !cli.items.is_empty() {
        return Err(LaunchError::usage(
            "application with documents only supported for open or print, not find",
        ));
    }

    let modifiers = LaunchModifiers {
        asynchronous: !cli.wait,
        background: cli.background,
        new_instance: cli.new_instance,
        hide: cli.hide,
        suppress_default: cli.suppress_default,
        print: cli.print > 0,
        arguments: cli.arguments.clone(),
    };

    tracing::debug!("action {:?}, matcher {:?}", action, matcher);

    Ok(InvocationOptions {
        action,
        matcher,
        modifiers,
        force_urls: cli.force_urls,
    })
}

/// The application named by a `-u` URL, which must be a file URL to an existing entry.
fn application_from_url<M: MetadataService + ?Sized>(text: &str, metadata: &M) -> Result<PathBuf> {
    let url = Url::parse(text).map_err(|_| LaunchError::usage("invalid URL (argument of -u)"))?;
    let not_found = || LaunchError::usage("can't find application (argument of -u)");

    if url.scheme() != "file" {
        return Err(not_found());
    }
    let path = url.to_file_path().map_err(|_| not_found())?;
    if metadata.exists(&path) {
        Ok(path)
    } else {
        Err(not_found())
    }
}
