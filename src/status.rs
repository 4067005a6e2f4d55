//! @dose
//! purpose: Platform status codes and their human-readable descriptions. Every
//!     platform service reports failure as a `Status`; the formatter renders it as
//!     "<description> (<code>)" for the trailing part of fatal error messages.
//!
//! when-editing:
//!     - !Codes keep the values of the launch-services family they mirror, so messages stay
//!       stable across platform backends
//!     - New backends map their native failures onto an existing code where one fits
//!
//! invariants:
//!     - Lookup never fails: unknown codes render as "unknown error (<code>)"
//!     - The table is static and immutable

use std::fmt;

/// A platform status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

impl Status {
    pub const APP_IN_TRASH: Status = Status(-10660);
    pub const EXECUTABLE_INCORRECT_FORMAT: Status = Status(-10661);
    pub const UNKNOWN: Status = Status(-10810);
    pub const NOT_AN_APPLICATION: Status = Status(-10811);
    pub const DATA_UNAVAILABLE: Status = Status(-10813);
    pub const APPLICATION_NOT_FOUND: Status = Status(-10814);
    pub const UNKNOWN_TYPE: Status = Status(-10815);
    pub const LAUNCH_IN_PROGRESS: Status = Status(-10818);
    pub const SERVER_COMMUNICATION: Status = Status(-10822);
    pub const INCOMPATIBLE_SYSTEM_VERSION: Status = Status(-10825);
    pub const NO_LAUNCH_PERMISSION: Status = Status(-10826);
    pub const NO_EXECUTABLE: Status = Status(-10827);
    pub const NO_CLASSIC_ENVIRONMENT: Status = Status(-10828);
    pub const MULTIPLE_SESSIONS_NOT_SUPPORTED: Status = Status(-10829);
    pub const NO_SUCH_VOLUME: Status = Status(-35);
    pub const PROCESS_NOT_FOUND: Status = Status(-600);
    pub const WINDOW_SERVER: Status = Status(1001);
    pub const FILE_NOT_FOUND: Status = Status(-43);
    pub const END_OF_FILE: Status = Status(-39);

    pub fn code(self) -> i32 {
        self.0
    }

    /// Description from the status table, or the generic fallback.
    pub fn description(self) -> &'static str {
        STATUS_TABLE
            .iter()
            .find(|(status, _)| *status == self)
            .map(|(_, desc)| *desc)
            .unwrap_or(UNKNOWN_DESCRIPTION)
    }

    /// Map an I/O error from a filesystem query onto the closest status.
    pub fn from_io(err: &std::io::Error) -> Status {
        match err.kind() {
            std::io::ErrorKind::NotFound => Status::FILE_NOT_FOUND,
            std::io::ErrorKind::PermissionDenied => Status::NO_LAUNCH_PERMISSION,
            _ => Status::DATA_UNAVAILABLE,
        }
    }
}

const UNKNOWN_DESCRIPTION: &str = "unknown error";

static STATUS_TABLE: &[(Status, &str)] = &[
    // launch service
    (Status::APP_IN_TRASH, "application is in the Trash"),
    (
        Status::EXECUTABLE_INCORRECT_FORMAT,
        "executable is unsupported on this processor architecture",
    ),
    (Status::UNKNOWN, "unknown Launch Services error"),
    (Status::NOT_AN_APPLICATION, "item is not an application"),
    (Status::DATA_UNAVAILABLE, "item metadata is unavailable"),
    (Status::APPLICATION_NOT_FOUND, "application not found"),
    (Status::UNKNOWN_TYPE, "cannot determine item kind"),
    (
        Status::LAUNCH_IN_PROGRESS,
        "application is being opened; please try again after the application is open",
    ),
    (
        Status::SERVER_COMMUNICATION,
        "unable to connect to Launch Services.\nAre you logged in?",
    ),
    (
        Status::INCOMPATIBLE_SYSTEM_VERSION,
        "application is incompatible with this version of the system",
    ),
    (Status::NO_LAUNCH_PERMISSION, "no permission to launch this application"),
    (
        Status::NO_EXECUTABLE,
        "application package contains no executable, or an unusable executable",
    ),
    (
        Status::NO_CLASSIC_ENVIRONMENT,
        "Classic environment required but not available",
    ),
    (
        Status::MULTIPLE_SESSIONS_NOT_SUPPORTED,
        "unable to launch multiple instances of application",
    ),
    // misc
    (Status::NO_SUCH_VOLUME, "the volume cannot be found (buggy filesystem?)"),
    (
        Status::PROCESS_NOT_FOUND,
        "unable to connect to system service.\nAre you logged in?",
    ),
    (Status::WINDOW_SERVER, "window server error.\nAre you logged in?"),
    (Status::FILE_NOT_FOUND, "file not found"),
    (Status::END_OF_FILE, "data not found"),
];

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.0)
    }
}

impl std::error::Error for Status {}
