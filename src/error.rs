//! Error type shared by every stage of an invocation.

use crate::status::Status;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    /// Malformed or contradictory flags, detected before any platform call.
    #[error("{0}")]
    Usage(String),

    /// A registry, launch or metadata query failed.
    #[error("{context}: {status}")]
    Platform { context: String, status: Status },

    /// Standard input or temporary file failure.
    #[error("{context} ({source})")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn platform(context: impl Into<String>, status: Status) -> Self {
        Self::Platform {
            context: context.into(),
            status,
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = LaunchError> = std::result::Result<T, E>;
