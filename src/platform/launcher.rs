//! @dose
//! purpose: The freedesktop launch service. Starts applications named by a desktop entry
//!     or an executable path, hands items without an application to the system opener,
//!     and routes print requests to the print command.
//!
//! when-editing:
//!     - !Opener and print-command failures are reported through their exit status
//!     - Modifiers with no freedesktop equivalent are logged and otherwise ignored
//!
//! invariants:
//!     - Applications are waited for only when the request is synchronous
//!     - The opener is always waited for, one item at a time, in item order
//!
//! gotchas:
//!     - xdg-open exit codes: 1 syntax error, 2 file missing, 3 tool missing, 4 action failed

use super::desktop_entry::{DesktopEntry, DESKTOP_SUFFIX};
use super::LaunchRequest;
use crate::status::Status;
use crate::types::{Item, LaunchModifiers};
use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

pub(crate) fn open(opener: &str, print_command: &str, request: &LaunchRequest<'_>) -> Result<(), Status> {
    log_ignored_modifiers(request.modifiers);

    if request.modifiers.print {
        if let Some(app) = request.application {
            tracing::debug!(
                "printing through '{}' instead of {}",
                print_command,
                app.display()
            );
        }
        return print_items(print_command, request.items);
    }

    match request.application {
        Some(app) => launch_application(app, request.items, request.modifiers),
        None => open_with_handler(opener, request.items),
    }
}

fn log_ignored_modifiers(modifiers: &LaunchModifiers) {
    let ignored = [
        (modifiers.background, "background"),
        (modifiers.hide, "hide"),
        (modifiers.new_instance, "new instance"),
        (modifiers.suppress_default, "suppress default behavior"),
    ];
    for (_, name) in ignored.iter().filter(|(set, _)| *set) {
        tracing::debug!("launch modifier '{}' has no freedesktop equivalent, ignored", name);
    }
}

fn launch_application(app: &Path, items: &[Item], modifiers: &LaunchModifiers) -> Result<(), Status> {
    let command_lines = if app.to_string_lossy().ends_with(DESKTOP_SUFFIX) {
        let entry = DesktopEntry::load(app).map_err(|e| Status::from_io(&e))?;
        if !entry.is_application() {
            return Err(Status::NOT_AN_APPLICATION);
        }
        entry
            .command_lines(items, &modifiers.arguments)
            .map_err(|err| {
                tracing::warn!("{}: {}", app.display(), err);
                Status::NO_EXECUTABLE
            })?
    } else {
        ensure_executable(app)?;
        let mut argv = vec![app.to_string_lossy().into_owned()];
        argv.extend(modifiers.arguments.iter().cloned());
        argv.extend(items.iter().map(Item::as_argument));
        vec![argv]
    };

    for argv in command_lines {
        let mut child = spawn(&argv)?;
        if modifiers.asynchronous {
            tracing::debug!("launched {} (pid {})", argv[0], child.id());
            continue;
        }
        match child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!("{} exited with {}", argv[0], status);
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("failed to wait for {}: {}", argv[0], err),
        }
    }

    Ok(())
}

#[cfg(unix)]
fn ensure_executable(app: &Path) -> Result<(), Status> {
    use std::os::unix::fs::PermissionsExt;

    let meta = std::fs::metadata(app).map_err(|e| Status::from_io(&e))?;
    if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
        return Err(Status::NOT_AN_APPLICATION);
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(app: &Path) -> Result<(), Status> {
    let meta = std::fs::metadata(app).map_err(|e| Status::from_io(&e))?;
    if !meta.is_file() {
        return Err(Status::NOT_AN_APPLICATION);
    }
    Ok(())
}

fn spawn(argv: &[String]) -> Result<Child, Status> {
    let (program, args) = argv.split_first().ok_or(Status::NO_EXECUTABLE)?;
    tracing::debug!("spawning {:?}", argv);
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .spawn()
        .map_err(|err| spawn_status(&err))
}

fn spawn_status(err: &io::Error) -> Status {
    match err.kind() {
        io::ErrorKind::NotFound => Status::NO_EXECUTABLE,
        io::ErrorKind::PermissionDenied => Status::NO_LAUNCH_PERMISSION,
        _ => Status::UNKNOWN,
    }
}

fn open_with_handler(opener: &str, items: &[Item]) -> Result<(), Status> {
    for item in items {
        run_helper(opener, &item.as_argument())?;
    }
    Ok(())
}

fn print_items(print_command: &str, items: &[Item]) -> Result<(), Status> {
    for item in items {
        let path = item.local_path().ok_or(Status::FILE_NOT_FOUND)?;
        run_helper(print_command, &path.to_string_lossy())?;
    }
    Ok(())
}

/// Run a helper command on one argument and wait for it.
fn run_helper(command: &str, argument: &str) -> Result<(), Status> {
    tracing::debug!("running {} {}", command, argument);
    let status = Command::new(command)
        .arg(argument)
        .stdin(Stdio::null())
        .status()
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Status::PROCESS_NOT_FOUND,
            _ => spawn_status(&err),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(helper_exit_status(status.code()))
    }
}

pub(crate) fn helper_exit_status(code: Option<i32>) -> Status {
    match code {
        Some(2) => Status::FILE_NOT_FOUND,
        Some(3) => Status::APPLICATION_NOT_FOUND,
        _ => Status::UNKNOWN,
    }
}
