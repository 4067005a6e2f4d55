mod args;
mod options;

pub use args::Cli;
pub use options::parse_options;
