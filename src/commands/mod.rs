mod dispatch;
mod info;

pub use dispatch::*;
pub use info::*;
