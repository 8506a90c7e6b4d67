use std::fs::OpenOptions;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::types::{AssemblerFailure, IoAction, IoFailed, IoTarget};

/// The text of one input file, split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// How the file is named in diagnostics.
    pub name: String,
    pub lines: Vec<String>,
}

impl SourceFile {
    #[must_use]
    pub fn new(name: &str, body: &str) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            lines: body.lines().map(str::to_string).collect(),
        }
    }

    /// Lines paired with their line numbers, counting from 1.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(n, line)| (n + 1, line.as_str()))
    }
}

/// Reads the source file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened or read.
pub fn read_source_file(path: &Path) -> Result<SourceFile, AssemblerFailure> {
    let fail = |e| {
        AssemblerFailure::Io(IoFailed {
            action: IoAction::Read,
            target: IoTarget::File(path.to_path_buf()),
            error: e,
        })
    };
    let input = OpenOptions::new().read(true).open(path).map_err(fail)?;
    let mut lines: Vec<String> = Vec::new();
    for line in BufReader::new(input).lines() {
        lines.push(line.map_err(fail)?);
    }
    Ok(SourceFile {
        name: path.display().to_string(),
        lines,
    })
}

#[test]
fn test_numbered_lines() {
    let file = SourceFile::new("x.asm", "cpu_exec\n\nDEBUG_ON\n");
    let numbered: Vec<(usize, &str)> = file.numbered_lines().collect();
    assert_eq!(numbered, vec![(1, "cpu_exec"), (2, ""), (3, "DEBUG_ON")]);
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    match read_source_file(&dir.path().join("missing.asm")) {
        Err(AssemblerFailure::Io(IoFailed {
            action: IoAction::Read,
            ..
        })) => (),
        other => panic!("expected a read failure, got {other:?}"),
    }
}
