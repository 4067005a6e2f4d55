//! @dose
//! purpose: Runs one invocation end to end: validates options, classifies items, resolves
//!     the application, then performs the selected action against the platform.
//!
//! when-editing:
//!     - !Each launching action has its own failure context ("can't open application",
//!       "can't open items", "can't launch URLs")
//!     - !Output for -n and -f goes to the writer passed in, never straight to stdout
//!
//! invariants:
//!     - Nothing is launched until every item has been classified and the application resolved
//!     - Temp files are handed back to the caller only on success
//!
//! flows:
//!     - Options: parse_options(cli)
//!     - Items: classify_items(tokens), reading stdin for "-"
//!     - Application: resolve_application(matcher), when one was given
//!     - Action: dispatch(options, application, items)

use super::info::print_info;
use crate::classify::classify_items;
use crate::cli::{parse_options, Cli};
use crate::config::Config;
use crate::error::{LaunchError, Result};
use crate::platform::{LaunchRequest, Platform};
use crate::resolver::resolve_application;
use crate::status::Status;
use crate::stdin::StdinTempFile;
use crate::types::{Action, InvocationOptions, Item};
use std::io::{Read, Write};
use std::path::Path;

/// Run the invocation described by `cli`, returning the temp files that still need cleanup.
pub fn run_invocation<P, R, W>(
    cli: &Cli,
    config: &Config,
    platform: &P,
    input: &mut R,
    out: &mut W,
) -> Result<Vec<StdinTempFile>>
where
    P: Platform + ?Sized,
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let options = parse_options(cli, platform)?;
    let classified = classify_items(&cli.items, &options, platform, input, &config.temp_dir())?;
    let options = &classified.options;

    let application = match &options.matcher {
        Some(matcher) => Some(resolve_application(matcher, platform)?),
        None => None,
    };

    dispatch(options, application.as_deref(), &classified.items, platform, out)?;
    Ok(classified.temp_files)
}

pub fn dispatch<P, W>(
    options: &InvocationOptions,
    application: Option<&Path>,
    items: &[Item],
    platform: &P,
    out: &mut W,
) -> Result<()>
where
    P: Platform + ?Sized,
    W: Write + ?Sized,
{
    tracing::debug!("{:?} with {} item(s)", options.action, items.len());

    match options.action {
        Action::Find => {
            let application = application
                .ok_or_else(|| LaunchError::platform("can't locate application", Status::APPLICATION_NOT_FOUND))?;
            writeln!(out, "{}", application.display()).map_err(write_error)
        }
        Action::FindItems => {
            for item in items {
                writeln!(out, "{}", item).map_err(write_error)?;
            }
            Ok(())
        }
        Action::InfoItems => {
            for item in items {
                print_info(item, platform, out)?;
            }
            Ok(())
        }
        Action::Open => {
            let application = application
                .ok_or_else(|| LaunchError::platform("can't open application", Status::APPLICATION_NOT_FOUND))?;
            launch(platform, options, Some(application), items, "can't open application")
        }
        Action::OpenItems => launch(platform, options, None, items, "can't open items"),
        Action::LaunchUrls => launch(platform, options, application, items, "can't launch URLs"),
    }
}

fn launch<P: Platform + ?Sized>(
    platform: &P,
    options: &InvocationOptions,
    application: Option<&Path>,
    items: &[Item],
    context: &str,
) -> Result<()> {
    let request = LaunchRequest {
        application,
        items,
        modifiers: &options.modifiers,
    };
    platform
        .open(&request)
        .map_err(|status| LaunchError::platform(context, status))
}

fn write_error(e: std::io::Error) -> LaunchError {
    LaunchError::io("can't write to standard output", e)
}
