mod common;
mod insight;
mod memory;

pub use common::*;
pub use insight::*;
pub use memory::*;
