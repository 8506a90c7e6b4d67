//! The `base` crate defines the things about the virtual CPU which
//! are useful to both an assembler and a simulator.  The idea is that
//! a tool which only needs to know how memory is laid out, or which
//! numbers the CPU uses for its instructions, can depend on this
//! crate without pulling in the assembler itself.

mod image;
mod opcode;
mod types;

pub mod prelude;
