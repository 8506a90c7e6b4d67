use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io::Error as IoError;
use std::path::PathBuf;

use super::diagnostics::Diagnostic;

/// Line numbers count from 1, as editors do.
pub type LineNumber = usize;

/// Identifies a line of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: String,
    pub line: LineNumber,
}

impl Location {
    #[must_use]
    pub fn new(file: &str, line: LineNumber) -> Location {
        Location {
            file: file.to_string(),
            line,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
    CreateDirectory,
}

impl Display for IoAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoAction::Read => "read",
            IoAction::Write => "write",
            IoAction::CreateDirectory => "create directory",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoTarget {
    File(PathBuf),
    Directory(PathBuf),
}

impl Display for IoTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            IoTarget::File(name) => write!(f, "file {}", name.display()),
            IoTarget::Directory(name) => write!(f, "directory {}", name.display()),
        }
    }
}

#[derive(Debug)]
pub struct IoFailed {
    pub action: IoAction,
    pub target: IoTarget,
    pub error: IoError,
}

impl Display for IoFailed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let IoFailed {
            action,
            target,
            error,
        } = self;
        write!(f, "failed to {action} {target}: {error}")
    }
}

/// A failure which stops the assembler.  Problems with the program
/// being assembled are usually not failures of this kind; they are
/// reported as a [`Diagnostic`] and assembly carries on.  Only when
/// there are too many of them does assembly stop.
#[derive(Debug)]
pub enum AssemblerFailure {
    Io(IoFailed),
    TooManyErrors { diagnostics: Vec<Diagnostic> },
}

impl AssemblerFailure {
    /// The diagnostics which were reported before assembly stopped.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            AssemblerFailure::Io(_) => &[],
            AssemblerFailure::TooManyErrors { diagnostics } => diagnostics.as_slice(),
        }
    }
}

impl Display for AssemblerFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AssemblerFailure::Io(e) => write!(f, "I/O error: {e}"),
            AssemblerFailure::TooManyErrors { diagnostics } => write!(
                f,
                "too many compilation errors ({}), aborting",
                diagnostics.len()
            ),
        }
    }
}

impl Error for AssemblerFailure {}
