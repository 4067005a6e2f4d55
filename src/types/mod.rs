mod invocation;
mod item;

pub use invocation::*;
pub use item::*;
