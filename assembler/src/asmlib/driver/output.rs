//! Writes the text image read by the CPU.
use std::fmt::{self, Display, Formatter};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{event, Level};

use super::super::types::{AssemblerFailure, IoAction, IoFailed, IoTarget};
use super::Assembly;

/// Width the code field is padded to when a debug comment follows.
const CODE_FIELD_WIDTH: usize = 15;

/// The image of an assembled program: one line per instruction, then
/// one per constant, then an empty line for each variable.
pub struct Image<'a> {
    pub(super) assembly: &'a Assembly,
}

impl Display for Image<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for instruction in &self.assembly.instructions {
            let code = instruction.code();
            match instruction.debug() {
                Some(debug) => writeln!(f, "{code:<CODE_FIELD_WIDTH$} # {debug}")?,
                None => writeln!(f, "{code}")?,
            }
        }
        for constant in &self.assembly.constants {
            writeln!(f, "{}", constant.value)?;
        }
        for _ in &self.assembly.variables {
            writeln!(f)?;
        }
        Ok(())
    }
}

pub(super) fn write_image(assembly: &Assembly, output_file: &Path) -> Result<(), AssemblerFailure> {
    if let Some(dir) = output_file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|error| {
            AssemblerFailure::Io(IoFailed {
                action: IoAction::CreateDirectory,
                target: IoTarget::Directory(dir.to_owned()),
                error,
            })
        })?;
    }
    let fail = |error| {
        AssemblerFailure::Io(IoFailed {
            action: IoAction::Write,
            target: IoTarget::File(output_file.to_owned()),
            error,
        })
    };
    let file = File::create(output_file).map_err(fail)?;
    let mut writer = BufWriter::new(file);
    write!(writer, "{}", assembly.image()).map_err(fail)?;
    writer.flush().map_err(fail)?;
    event!(
        Level::INFO,
        "wrote {} lines to {}",
        assembly.instructions.len() + assembly.constants.len() + assembly.variables.len(),
        output_file.display()
    );
    Ok(())
}
