//! Pass 1: scans the source, validates each instruction, records
//! declarations and builds the constant pool.
use tracing::{event, span, Level};

use base::prelude::Opcode;

use super::super::context::{AlreadyDeclared, AssemblyContext};
use super::super::diagnostics::{Diagnostic, DiagnosticKind};
use super::super::grammar::{parse_command, validate, Command, GrammarError};
use super::super::lexeme::{classify, Lexeme, LexemeKind, MalformedReason, Prefix};
use super::super::lexer::{split_words, strip_comment};
use super::super::source::SourceFile;
use super::super::types::{AssemblerFailure, Location};

/// An instruction which passed validation and will be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SourceInstruction {
    pub(super) location: Location,
    /// The source text, without its comment.
    pub(super) text: String,
    pub(super) command: Command,
    pub(super) opcode: Opcode,
    /// Lexemes of the words following the command.
    pub(super) operands: Vec<Lexeme>,
}

impl SourceInstruction {
    pub(super) fn diagnostic(
        &self,
        kind: DiagnosticKind,
        message: String,
        expected: &str,
    ) -> Diagnostic {
        Diagnostic {
            location: self.location.clone(),
            kind,
            source_line: Some(self.text.clone()),
            message,
            expected: expected.to_string(),
        }
    }
}

struct Line<'a> {
    location: Location,
    text: &'a str,
}

impl Line<'_> {
    fn diagnostic(&self, kind: DiagnosticKind, message: String, expected: &str) -> Diagnostic {
        Diagnostic {
            location: self.location.clone(),
            kind,
            source_line: Some(self.text.to_string()),
            message,
            expected: expected.to_string(),
        }
    }
}

/// The key under which the payload of a `write` is kept in the
/// constant pool.
pub(super) fn constant_key(payload: &Lexeme) -> String {
    match payload.kind {
        LexemeKind::StringLiteral => format!("\"{}\"", payload.payload),
        LexemeKind::Label => format!("LABEL:{}", payload.payload),
        _ => payload.payload.clone(),
    }
}

/// Classifies the payload of a `write`.  A bare word which is not a
/// number, symbol or label reference is taken to be a string.
fn classify_write_payload(word: &str) -> Lexeme {
    let lexeme = classify(Some(word));
    let keeps_its_form = word.starts_with('"')
        || lexeme.prefix != Prefix::Direct
        || matches!(
            lexeme.kind,
            LexemeKind::Number
                | LexemeKind::Operator
                | LexemeKind::Syscall
                | LexemeKind::Color
                | LexemeKind::KeyboardMode
                | LexemeKind::Label
                | LexemeKind::Malformed(MalformedReason::NameFormat)
        );
    if keeps_its_form {
        lexeme
    } else {
        classify(Some(&format!("\"{word}\"")))
    }
}

fn diagnostic_kind(e: &GrammarError) -> DiagnosticKind {
    match e {
        GrammarError::UnknownCommand(_) => DiagnosticKind::UnknownCommand,
        GrammarError::UnexpectedEnd { .. } => DiagnosticKind::MissingOperand,
        GrammarError::Mismatch { found, .. }
            if found.kind == LexemeKind::Malformed(MalformedReason::NameFormat) =>
        {
            DiagnosticKind::MalformedIdentifier
        }
        GrammarError::Mismatch { .. } | GrammarError::TrailingOperand { .. } => {
            DiagnosticKind::SyntaxMismatch
        }
    }
}

fn known_commands() -> String {
    let names: Vec<&str> = Command::ALL.iter().map(|c| c.name()).collect();
    format!("one of the commands {}", names.join(", "))
}

/// Adds the payload of a `write` to the constant pool.  Returns
/// false if the instruction must be dropped.
fn pool_write_payload(
    line: &Line<'_>,
    payload: &Lexeme,
    ctx: &mut AssemblyContext<'_>,
) -> Result<bool, AssemblerFailure> {
    let key = constant_key(payload);
    if ctx.has_constant(&key) {
        return Ok(true);
    }
    let value: String = match payload.kind {
        LexemeKind::StringLiteral | LexemeKind::Number => payload.payload.clone(),
        LexemeKind::Label => match ctx.label(&payload.payload) {
            Some(label) => label.address.to_string(),
            None => {
                ctx.diagnostics.report(line.diagnostic(
                    DiagnosticKind::UndeclaredLabelInWrite,
                    format!("label {} has not been declared yet", payload.payload),
                    "Label must be defined before use in write",
                ))?;
                return Ok(false);
            }
        },
        _ => match ctx.symtab().lookup(&payload.payload) {
            Some(value) => value.to_string(),
            None => {
                // Each write of it is diagnosed in pass 2.
                ctx.intern_unresolved_constant(&key);
                return Ok(true);
            }
        },
    };
    ctx.intern_constant(&key, value);
    Ok(true)
}

fn declare(
    line: &Line<'_>,
    command: Command,
    name: &str,
    ctx: &mut AssemblyContext<'_>,
) -> Result<(), AssemblerFailure> {
    let (what, result) = if command == Command::Label {
        ("label", ctx.declare_label(name))
    } else {
        ("variable", ctx.declare_variable(name))
    };
    match result {
        Ok(_) => Ok(()),
        Err(AlreadyDeclared { previous }) => ctx.diagnostics.report(line.diagnostic(
            DiagnosticKind::DuplicateDeclaration,
            format!("{what} {name} is already declared (at address {previous})"),
            &format!("a {what} name which is not already in use"),
        )),
    }
}

/// Scans one line.  Returns the instruction it holds, if there is
/// one which should be emitted.
fn scan_line(
    location: Location,
    raw: &str,
    ctx: &mut AssemblyContext<'_>,
) -> Result<Option<SourceInstruction>, AssemblerFailure> {
    let text = strip_comment(raw).trim();
    if text.is_empty() {
        return Ok(None);
    }
    let line = Line { location, text };
    let words = match split_words(text) {
        Ok(words) => words,
        Err(e) => {
            ctx.diagnostics.report(line.diagnostic(
                DiagnosticKind::Tokenizer,
                e.to_string(),
                "Invalid quoting or escape sequence",
            ))?;
            return Ok(None);
        }
    };
    let Some((&first, rest)) = words.split_first() else {
        return Ok(None);
    };
    let command = match parse_command(first) {
        Ok(command) => command,
        Err(e) => {
            ctx.diagnostics.report(line.diagnostic(
                diagnostic_kind(&e),
                e.to_string(),
                &known_commands(),
            ))?;
            return Ok(None);
        }
    };
    let operands: Vec<Lexeme> = rest
        .iter()
        .enumerate()
        .map(|(i, &word)| {
            if i == 0 && command == Command::Write {
                classify_write_payload(word)
            } else {
                classify(Some(word))
            }
        })
        .collect();
    if let Err(e) = validate(command, &operands) {
        ctx.diagnostics.report(line.diagnostic(
            diagnostic_kind(&e),
            format!("unexpected arguments for command {command}: {e}"),
            command.rule().syntax,
        ))?;
        return Ok(None);
    }

    let Some(opcode) = command.opcode() else {
        declare(&line, command, &operands[0].payload, ctx)?;
        return Ok(None);
    };
    if command == Command::Write && !pool_write_payload(&line, &operands[0], ctx)? {
        return Ok(None);
    }
    Ok(Some(SourceInstruction {
        location: line.location,
        text: text.to_string(),
        command,
        opcode,
        operands,
    }))
}

/// Scans every line of every source file, in order.
pub(super) fn scan(
    sources: &[SourceFile],
    ctx: &mut AssemblyContext<'_>,
) -> Result<Vec<SourceInstruction>, AssemblerFailure> {
    let span = span!(Level::DEBUG, "pass 1");
    let _enter = span.enter();
    let mut program = Vec::new();
    for file in sources {
        let file_span = span!(Level::DEBUG, "scan", file=%file.name);
        let _enter_file = file_span.enter();
        for (line_number, raw) in file.numbered_lines() {
            let location = Location::new(&file.name, line_number);
            if let Some(instruction) = scan_line(location, raw, ctx)? {
                program.push(instruction);
                ctx.advance();
            }
        }
        event!(
            Level::DEBUG,
            "after {} the next instruction address is {}",
            file.name,
            ctx.next_address()
        );
    }
    Ok(program)
}
