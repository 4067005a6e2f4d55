//! @dose
//! purpose: Materializes standard input as a temporary file so it can be opened like any
//!     other document, and removes that file once the launched application has had time
//!     to read it.
//!
//! when-editing:
//!     - !Temp files are named launch-stationery-XXXXXXXX inside the resolved temp directory
//!     - !Cleanup runs only after a successful dispatch; on failure the files are dropped
//!       (and removed) immediately
//!
//! invariants:
//!     - Each "-" item gets its own temp file, all removed by the same cleanup
//!     - The detached child never writes to the terminal
//!
//! do-not:
//!     - Never remove the files before the grace period; the application opens them
//!       asynchronously
//!
//! gotchas:
//!     - The grace period is a best-effort race: a slow application may still miss the file
//!     - Detaching forks; the parent exits 0 right away so the shell gets its prompt back

use crate::config::StdinConfig;
use crate::error::{LaunchError, Result};
use std::io::{self, Read, Write};
use std::path::Path;
use std::thread;
use tempfile::{Builder, TempPath};

const TEMP_PREFIX: &str = "launch-stationery-";
const TEMP_RANDOM_LEN: usize = 8;

/// A temporary file holding everything read from standard input.
#[derive(Debug)]
pub struct StdinTempFile {
    path: TempPath,
}

impl StdinTempFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}

/// Copy `reader` to a new temp file in `dir`.
pub fn materialize<R: Read + ?Sized>(reader: &mut R, dir: &Path) -> Result<StdinTempFile> {
    let mut file = Builder::new()
        .prefix(TEMP_PREFIX)
        .rand_bytes(TEMP_RANDOM_LEN)
        .tempfile_in(dir)
        .map_err(|e| LaunchError::io(format!("can't create temporary file in '{}'", dir.display()), e))?;

    let mut buffer = [0u8; 8192];
    loop {
        let count = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LaunchError::io("can't read from standard input", e)),
        };
        file.write_all(&buffer[..count]).map_err(|e| {
            LaunchError::io(format!("error writing to file '{}'", file.path().display()), e)
        })?;
    }
    file.flush()
        .map_err(|e| LaunchError::io(format!("error writing to file '{}'", file.path().display()), e))?;

    tracing::debug!("standard input saved to {}", file.path().display());
    Ok(StdinTempFile {
        path: file.into_temp_path(),
    })
}

/// Wait out the grace period, then remove `files`.
///
/// With `detach` set the process forks first: the parent exits 0 and the child, with its
/// standard streams on /dev/null, does the waiting.
pub fn schedule_cleanup(files: Vec<StdinTempFile>, config: &StdinConfig) -> Result<()> {
    if files.is_empty() {
        return Ok(());
    }

    io::stdout()
        .flush()
        .map_err(|e| LaunchError::io("can't flush standard output", e))?;

    if config.detach {
        detach()?;
    }

    thread::sleep(config.grace());

    for file in files {
        let shown = file.path().display().to_string();
        if let Err(e) = file.close() {
            tracing::warn!("can't remove temporary file '{}': {}", shown, e);
        }
    }
    Ok(())
}

#[cfg(unix)]
fn detach() -> Result<()> {
    use nix::unistd::{dup2, fork, setsid, ForkResult};
    use std::fs::OpenOptions;
    use std::os::unix::io::AsRawFd;

    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            tracing::debug!("temporary file cleanup continues in pid {}", child);
            std::process::exit(0);
        }
        Ok(ForkResult::Child) => {
            let _ = setsid();
            let null = OpenOptions::new()
                .read(true)
                .write(true)
                .open("/dev/null")
                .map_err(|e| LaunchError::io("can't open /dev/null", e))?;
            for fd in 0..=2 {
                dup2(null.as_raw_fd(), fd)
                    .map_err(|errno| LaunchError::io("can't redirect standard streams", errno.into()))?;
            }
            Ok(())
        }
        Err(errno) => Err(LaunchError::io("can't detach from terminal", errno.into())),
    }
}

#[cfg(not(unix))]
fn detach() -> Result<()> {
    Ok(())
}
