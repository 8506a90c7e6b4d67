//! The prelude exports the structs which are useful in representing
//! things to do with the virtual CPU.  Providing this prelude is the
//! main purpose of the base crate.
pub use super::image::*;
pub use super::opcode::*;
pub use super::types::*;
