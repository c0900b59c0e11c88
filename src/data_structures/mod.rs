//! Containers the rest of the core is built on.

mod soa;
mod pool;
mod bit_field;

pub use soa::*;
pub use pool::*;
pub use bit_field::*;
