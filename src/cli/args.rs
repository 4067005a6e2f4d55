//! @dose
//! purpose: This module defines the command-line surface of launch using the clap derive
//!     macros: the action flags, launch modifiers, application matchers, pass-through
//!     arguments and the positional items.
//!
//! when-editing:
//!     - !Cross-flag rules (one action, matcher compatibility) live in cli::options, not here;
//!       clap only rejects unknown flags and missing values
//!     - !The help flag is long-only because -h means "hide"
//!
//! invariants:
//!     - Every field is raw user input; nothing touches the filesystem here
//!     - Items keep their command-line order
//!
//! gotchas:
//!     - "-" is a positional item (standard input), not a flag
//!     - Action flags are counted so "-n -n" is reported as two actions; any other
//!       repeated flag is accepted and a repeated matcher keeps its last value
//!     - -o accepts values that start with a hyphen so application flags pass through

use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Default)]
#[command(name = "launch")]
#[command(version, about = "Open items, find applications, and report on files")]
#[command(disable_help_flag = true)]
#[command(args_override_self = true)]
#[command(
    override_usage = "launch [-npswbmhLU] [-c creator] [-i bundleID] [-u URL] [-a name|path] [-o argument] [item ...] [-]\n       launch [-npflswbmhLU] item ..."
)]
#[command(after_help = "'document' may be a file, folder, or disk; whatever the application can open.\n'item' may be a file, folder, disk, or URL.")]
pub struct Cli {
    /// Print matching paths/URLs instead of opening them
    #[arg(short = 'n', action = ArgAction::Count)]
    pub find: u8,

    /// Ask application(s) to print document(s)
    #[arg(short = 'p', action = ArgAction::Count)]
    pub print: u8,

    /// Display information about item(s)
    #[arg(short = 'f', action = ArgAction::Count)]
    pub info: u8,

    /// Launch URLs (treat bare hostnames and email addresses as URLs)
    #[arg(short = 'l', action = ArgAction::Count)]
    pub launch_urls: u8,

    /// Launch target(s) as superuser (no longer supported)
    #[arg(short = 's')]
    pub superuser: bool,

    /// Wait for application to finish opening before exiting
    #[arg(short = 'w')]
    pub wait: bool,

    /// Launch application in the background
    #[arg(short = 'b')]
    pub background: bool,

    /// Launch application again, even if already running
    #[arg(short = 'm')]
    pub new_instance: bool,

    /// Hide application once it's finished opening
    #[arg(short = 'h')]
    pub hide: bool,

    /// Suppress the application's default open behavior
    #[arg(short = 'L')]
    pub suppress_default: bool,

    /// Interpret items as URLs even if a file of the same name exists
    #[arg(short = 'U')]
    pub force_urls: bool,

    /// Match application by four-character creator code ('ToyS')
    #[arg(short = 'c', value_name = "creator")]
    pub creator: Option<String>,

    /// Match application by bundle identifier (org.gnome.TextEditor)
    #[arg(short = 'i', value_name = "bundleID")]
    pub bundle_id: Option<String>,

    /// Open application at file:// URL
    #[arg(short = 'u', value_name = "URL")]
    pub app_url: Option<String>,

    /// Match application by name, or open the application at a path
    #[arg(short = 'a', value_name = "name|path")]
    pub app_name: Option<String>,

    /// Pass argument to the application (can be repeated)
    #[arg(short = 'o', value_name = "argument", allow_hyphen_values = true)]
    pub arguments: Vec<String>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Files, folders, disks or URLs ("-" reads standard input)
    #[arg(value_name = "item")]
    pub items: Vec<String>,
}

impl Cli {
    /// Number of action flags (-n, -p, -f, -l) given, repeats included.
    pub fn action_count(&self) -> usize {
        [self.find, self.print, self.info, self.launch_urls]
            .iter()
            .map(|count| usize::from(*count))
            .sum()
    }

    /// Whether any flag that only makes sense when launching was given.
    pub fn has_launch_modifiers(&self) -> bool {
        self.wait
            || self.background
            || self.new_instance
            || self.hide
            || self.suppress_default
            || self.force_urls
    }
}
