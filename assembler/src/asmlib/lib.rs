#![deny(unsafe_code)]
#![warn(unreachable_pub)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::manual_string_new)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::return_self_not_must_use)]
#![warn(clippy::wildcard_imports)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::items_after_statements)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Two-pass assembler for the virtual CPU.
//!
//! Source files are scanned in order by pass 1, which records label
//! and variable declarations and builds the constant pool.  Once all
//! files have been scanned, the constant pool and the variables are
//! placed in memory after the code.  Pass 2 then resolves every
//! operand and emits one record per instruction, and the image
//! writer turns those records into the text image read by the CPU.

mod context;
mod diagnostics;
mod driver;
mod grammar;
mod lexeme;
mod lexer;
mod rx;
mod source;
mod symtab;
mod types;

pub use diagnostics::{Diagnostic, DiagnosticKind, MAX_ERRORS};
pub use driver::*;
pub use source::{read_source_file, SourceFile};
pub use symtab::SymbolTable;
pub use types::{AssemblerFailure, IoAction, IoFailed, IoTarget, LineNumber, Location};
