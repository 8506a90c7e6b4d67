use std::fmt::{self, Display, Formatter};

use tracing::{event, Level};

use super::types::{AssemblerFailure, Location};

/// Assembly stops once more than this many diagnostics have been
/// reported.
pub const MAX_ERRORS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An instruction's operands do not have the shape its command
    /// needs.
    SyntaxMismatch,
    /// An instruction has fewer words than its command needs.
    MissingOperand,
    /// The name after `var:` or `label:` is not a valid identifier.
    MalformedIdentifier,
    /// A label or variable was declared twice.
    DuplicateDeclaration,
    /// A register, operator, syscall, color or keyboard mode is not
    /// in the symbol table.
    UndeclaredSymbol,
    /// A name is neither a declared variable nor a declared label.
    UndeclaredIdentifier,
    /// A variable is used by an instruction which precedes its
    /// declaration.
    UseBeforeDeclaration,
    /// The payload of a `write` has no value.
    UnresolvedConstant,
    /// A `write` refers to a label which has not been declared yet.
    UndeclaredLabelInWrite,
    UnknownCommand,
    /// A quotation mark is never closed.
    Tokenizer,
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::SyntaxMismatch => "syntax error",
            DiagnosticKind::MissingOperand => "unexpected end of instruction",
            DiagnosticKind::MalformedIdentifier => "malformed identifier",
            DiagnosticKind::DuplicateDeclaration => "duplicate declaration",
            DiagnosticKind::UndeclaredSymbol => "unknown symbol",
            DiagnosticKind::UndeclaredIdentifier => "undeclared identifier",
            DiagnosticKind::UseBeforeDeclaration => "used before declaration",
            DiagnosticKind::UnresolvedConstant => "unresolved constant",
            DiagnosticKind::UndeclaredLabelInWrite => "label used before declaration",
            DiagnosticKind::UnknownCommand => "unknown command",
            DiagnosticKind::Tokenizer => "invalid quoting",
        })
    }
}

/// A problem with the program being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub kind: DiagnosticKind,
    /// The offending source line, when there is one to show.
    pub source_line: Option<String>,
    pub message: String,
    /// What the user should have written.
    pub expected: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.kind, self.message)
    }
}

/// Accumulates the diagnostics of one assembly run.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Records `diagnostic`.
    ///
    /// # Errors
    ///
    /// Once more than [`MAX_ERRORS`] diagnostics have been recorded,
    /// assembly must stop; the failure carries everything reported
    /// so far.
    pub(crate) fn report(&mut self, diagnostic: Diagnostic) -> Result<(), AssemblerFailure> {
        event!(Level::DEBUG, "{diagnostic}");
        self.items.push(diagnostic);
        if self.items.len() > MAX_ERRORS {
            event!(
                Level::ERROR,
                "giving up after {} diagnostics",
                self.items.len()
            );
            Err(AssemblerFailure::TooManyErrors {
                diagnostics: std::mem::take(&mut self.items),
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn into_inner(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
fn example(n: usize) -> Diagnostic {
    Diagnostic {
        location: Location::new("prog.asm", n),
        kind: DiagnosticKind::UnknownCommand,
        source_line: Some("frobnicate".to_string()),
        message: "frobnicate is an unknown command".to_string(),
        expected: "a command".to_string(),
    }
}

#[test]
fn test_diagnostic_display() {
    assert_eq!(
        example(3).to_string(),
        "prog.asm:3: unknown command: frobnicate is an unknown command"
    );
}

#[test]
fn test_abort_on_the_diagnostic_after_the_limit() {
    let mut diagnostics = Diagnostics::default();
    for n in 1..=MAX_ERRORS {
        assert!(diagnostics.report(example(n)).is_ok());
    }
    assert_eq!(diagnostics.len(), MAX_ERRORS);
    match diagnostics.report(example(MAX_ERRORS + 1)) {
        Err(AssemblerFailure::TooManyErrors { diagnostics }) => {
            assert_eq!(diagnostics.len(), MAX_ERRORS + 1);
            assert_eq!(diagnostics[0], example(1));
        }
        other => panic!("expected to give up, got {other:?}"),
    }
}
