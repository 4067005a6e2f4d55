//! @dose
//! purpose: This is the library crate root for launch, exposing the option parser, item
//!     classifier, application resolver, dispatcher and platform backends so the binary
//!     and the tests drive the same code.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - !Re-exports should include commonly used types and functions
//!
//! invariants:
//!     - Library code reports failures as LaunchError; only the binary decides exit codes
//!     - Nothing here reads process-wide state except Config::load and the XDG directory lookup
//!
//! gotchas:
//!     - The lib.rs is separate from main.rs - library consumers get lib, CLI gets main
//!     - stdin::schedule_cleanup may fork and exit the parent process

pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod resolver;
pub mod status;
pub mod stdin;
pub mod types;

// Re-export main types for convenience
pub use classify::{classify_items, Classified};
pub use cli::{parse_options, Cli};
pub use commands::{dispatch, format_size, print_info, render_info, run_invocation};
pub use config::Config;
pub use error::{LaunchError, Result};
pub use platform::{AppRegistry, ItemInfo, ItemKind, LaunchService, MetadataService, Platform, XdgPlatform};
pub use resolver::resolve_application;
pub use status::Status;
pub use types::{Action, AppMatcher, AppQuery, CreatorCode, InvocationOptions, Item, LaunchModifiers};
