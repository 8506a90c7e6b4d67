use std::path::{Path, PathBuf};

use tracing::{event, span, Level};

use base::prelude::{Address, ImageMode};

use super::context::AssemblyContext;
use super::diagnostics::Diagnostic;
use super::source::{read_source_file, SourceFile};
use super::symtab::SymbolTable;
use super::types::AssemblerFailure;

mod output;
mod pass1;
mod pass2;

pub use super::context::{Constant, Label, Variable};
pub use output::Image;
pub use pass2::EmittedInstruction;

/// Settings which control the kind of image produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub mode: ImageMode,
    /// When set, each instruction in the image is followed by a
    /// comment showing the source operands it came from.
    pub debug_info: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        AssemblyOptions {
            mode: ImageMode::Kernel,
            debug_info: true,
        }
    }
}

/// The result of assembling a program.
#[derive(Debug)]
pub struct Assembly {
    pub options: AssemblyOptions,
    pub instructions: Vec<EmittedInstruction>,
    pub labels: Vec<Label>,
    pub constants: Vec<Constant>,
    pub variables: Vec<Variable>,
    /// The first address after the last variable.
    pub next_free: Address,
    /// Problems found in the program.  If there are any, the image
    /// has operands which could not be resolved (and are 0).
    pub diagnostics: Vec<Diagnostic>,
}

impl Assembly {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Whether the image uses more memory than the CPU has.
    #[must_use]
    pub fn exceeds_capacity(&self) -> bool {
        u32::from(self.next_free) >= self.options.mode.capacity()
    }

    #[must_use]
    pub fn image(&self) -> Image<'_> {
        Image { assembly: self }
    }
}

/// Assembles `sources`, which are treated as a single program in the
/// order given.
///
/// # Errors
///
/// Fails when too many diagnostics are reported.
pub fn assemble_sources(
    sources: &[SourceFile],
    symtab: &SymbolTable,
    options: AssemblyOptions,
) -> Result<Assembly, AssemblerFailure> {
    let span = span!(Level::INFO, "assemble", mode=%options.mode);
    let _enter = span.enter();

    let mut ctx = AssemblyContext::new(symtab, options.mode.origin());
    let program = pass1::scan(sources, &mut ctx)?;
    ctx.allocate();
    let instructions = pass2::emit(&program, &mut ctx, options)?;
    let next_free = ctx.next_address();
    if u32::from(next_free) >= options.mode.capacity() {
        event!(
            Level::WARN,
            "image does not fit in memory: {} cells available, next free address is {next_free}",
            options.mode.capacity()
        );
    }
    let (labels, constants, variables, diagnostics) = ctx.into_tables();
    event!(
        Level::INFO,
        "{} instructions, {} constants, {} variables; {} diagnostics",
        instructions.len(),
        constants.len(),
        variables.len(),
        diagnostics.len()
    );
    Ok(Assembly {
        options,
        instructions,
        labels,
        constants,
        variables,
        next_free,
        diagnostics: diagnostics.into_inner(),
    })
}

/// Assembles the files named by `inputs` and writes the image to
/// `output_file`.  The image is written even if the program has
/// errors, so long as assembly ran to completion.
///
/// # Errors
///
/// Fails if an input file cannot be read, the image cannot be
/// written, or too many diagnostics are reported.
pub fn assemble_files(
    inputs: &[PathBuf],
    symtab: &SymbolTable,
    options: AssemblyOptions,
    output_file: &Path,
) -> Result<Assembly, AssemblerFailure> {
    let sources = inputs
        .iter()
        .map(|path| read_source_file(path))
        .collect::<Result<Vec<SourceFile>, AssemblerFailure>>()?;
    let assembly = assemble_sources(&sources, symtab, options)?;
    output::write_image(&assembly, output_file)?;
    Ok(assembly)
}
