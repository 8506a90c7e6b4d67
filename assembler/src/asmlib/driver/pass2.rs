//! Pass 2: resolves the operands of each instruction to numbers.
use std::fmt::{self, Display, Formatter};

use tracing::{event, span, Level};

use base::prelude::{Address, Opcode};

use super::super::context::{AssemblyContext, Constant};
use super::super::diagnostics::DiagnosticKind;
use super::super::grammar::Command;
use super::super::lexeme::{Lexeme, LexemeKind, Prefix};
use super::super::types::{AssemblerFailure, Location};
use super::pass1::{constant_key, SourceInstruction};
use super::AssemblyOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
enum OperandValue {
    /// A number written in the source, kept as it was written.
    Digits(String),
    Address(Address),
    Symbol(u32),
    /// The operand could not be resolved; a diagnostic has been
    /// issued.
    Unresolved,
}

/// A resolved operand, as it appears in the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Operand {
    prefix: Prefix,
    value: OperandValue,
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.value {
            OperandValue::Digits(digits) => write!(f, "{}{digits}", self.prefix),
            OperandValue::Address(address) => write!(f, "{}{address}", self.prefix),
            OperandValue::Symbol(value) => write!(f, "{}{value}", self.prefix),
            OperandValue::Unresolved => f.write_str("0"),
        }
    }
}

/// One line of the code section of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedInstruction {
    pub address: Address,
    pub location: Location,
    opcode: Opcode,
    operands: Vec<Operand>,
    debug: Option<String>,
}

impl EmittedInstruction {
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The opcode followed by the resolved operands.
    #[must_use]
    pub fn code(&self) -> String {
        let mut code = self.opcode.to_string();
        for operand in &self.operands {
            code.push(' ');
            code.push_str(&operand.to_string());
        }
        code
    }

    /// The source form of the instruction, if debug information was
    /// requested.
    #[must_use]
    pub fn debug(&self) -> Option<&str> {
        self.debug.as_deref()
    }
}

struct Unresolved {
    kind: DiagnosticKind,
    message: String,
    expected: &'static str,
}

impl Unresolved {
    fn new(kind: DiagnosticKind, message: String, expected: &'static str) -> Unresolved {
        Unresolved {
            kind,
            message,
            expected,
        }
    }
}

fn variable_address(
    name: &str,
    here: Address,
    ctx: &AssemblyContext<'_>,
) -> Result<OperandValue, Unresolved> {
    let Some(variable) = ctx.variable(name) else {
        return Err(Unresolved::new(
            DiagnosticKind::UndeclaredIdentifier,
            format!("variable {name} is not declared"),
            "Variable should be declared before usage",
        ));
    };
    if here < variable.decl_address {
        return Err(Unresolved::new(
            DiagnosticKind::UseBeforeDeclaration,
            format!(
                "variable {name} is used at address {here} but is only declared at {}",
                variable.decl_address
            ),
            "Variable should be defined before use",
        ));
    }
    variable.address.map(OperandValue::Address).ok_or_else(|| {
        Unresolved::new(
            DiagnosticKind::UndeclaredIdentifier,
            format!("variable {name} has no memory allocated"),
            "Variable should be declared before usage",
        )
    })
}

fn label_address(name: &str, ctx: &AssemblyContext<'_>) -> Result<OperandValue, Unresolved> {
    ctx.label(name)
        .map(|label| OperandValue::Address(label.address))
        .ok_or_else(|| {
            Unresolved::new(
                DiagnosticKind::UndeclaredIdentifier,
                format!("label {name} is not declared"),
                "a declared label",
            )
        })
}

fn constant_address(lexeme: &Lexeme, ctx: &AssemblyContext<'_>) -> Result<OperandValue, Unresolved> {
    const EXPECTED: &str = "a quoted string, a declared label, a known symbol or a number";
    let key = constant_key(lexeme);
    match ctx.constant(&key) {
        Some(constant) if !constant.resolved => Err(Unresolved::new(
            DiagnosticKind::UnresolvedConstant,
            format!("{} has no known value", lexeme.payload),
            EXPECTED,
        )),
        Some(Constant {
            address: Some(address),
            ..
        }) => Ok(OperandValue::Address(*address)),
        _ => Err(Unresolved::new(
            DiagnosticKind::UnresolvedConstant,
            format!("constant {key} is not in the constant pool"),
            EXPECTED,
        )),
    }
}

fn evaluate(
    lexeme: &Lexeme,
    is_write_payload: bool,
    here: Address,
    ctx: &AssemblyContext<'_>,
) -> Result<OperandValue, Unresolved> {
    let name = lexeme.payload.as_str();
    match lexeme.kind {
        _ if is_write_payload => constant_address(lexeme, ctx),
        LexemeKind::Number => Ok(OperandValue::Digits(lexeme.payload.clone())),
        LexemeKind::StringLiteral => constant_address(lexeme, ctx),
        LexemeKind::Register
        | LexemeKind::Operator
        | LexemeKind::Syscall
        | LexemeKind::Color
        | LexemeKind::KeyboardMode => ctx
            .symtab()
            .lookup(name)
            .map(OperandValue::Symbol)
            .ok_or_else(|| {
                Unresolved::new(
                    DiagnosticKind::UndeclaredSymbol,
                    format!("Symbol {name} is unknown"),
                    "a symbol declared in the include directory",
                )
            }),
        LexemeKind::Variable => variable_address(name, here, ctx),
        LexemeKind::Label => label_address(name, ctx),
        LexemeKind::Name => {
            if ctx.variable(name).is_some() {
                variable_address(name, here, ctx)
            } else if ctx.label(name).is_some() {
                label_address(name, ctx)
            } else {
                Err(Unresolved::new(
                    DiagnosticKind::UndeclaredIdentifier,
                    format!("{name} is neither a declared variable nor a declared label"),
                    "a declared variable or label",
                ))
            }
        }
        LexemeKind::Comment
        | LexemeKind::ToKeyword
        | LexemeKind::Command
        | LexemeKind::Malformed(_) => Err(Unresolved::new(
            DiagnosticKind::SyntaxMismatch,
            format!("a {} cannot be used as an operand", lexeme.kind),
            "an operand",
        )),
    }
}

fn debug_field(instruction: &SourceInstruction) -> String {
    let mut field = instruction.command.name().to_string();
    for (index, lexeme) in instruction.operands.iter().enumerate() {
        field.push(' ');
        field.push_str(&lexeme.debug_form(instruction.command == Command::Write && index == 0));
    }
    field
}

fn emit_one(
    instruction: &SourceInstruction,
    address: Address,
    ctx: &mut AssemblyContext<'_>,
    debug_info: bool,
) -> Result<EmittedInstruction, AssemblerFailure> {
    let mut operands = Vec::with_capacity(instruction.operands.len());
    for (index, lexeme) in instruction.operands.iter().enumerate() {
        if lexeme.kind == LexemeKind::ToKeyword {
            continue;
        }
        let is_write_payload = instruction.command == Command::Write && index == 0;
        let value = match evaluate(lexeme, is_write_payload, address, ctx) {
            Ok(value) => value,
            Err(Unresolved {
                kind,
                message,
                expected,
            }) => {
                ctx.diagnostics
                    .report(instruction.diagnostic(kind, message, expected))?;
                OperandValue::Unresolved
            }
        };
        operands.push(Operand {
            prefix: lexeme.prefix,
            value,
        });
    }
    Ok(EmittedInstruction {
        address,
        location: instruction.location.clone(),
        opcode: instruction.opcode,
        operands,
        debug: debug_info.then(|| debug_field(instruction)),
    })
}

/// Resolves the operands of every instruction of `program`.  Memory
/// must already have been allocated.
pub(super) fn emit(
    program: &[SourceInstruction],
    ctx: &mut AssemblyContext<'_>,
    options: AssemblyOptions,
) -> Result<Vec<EmittedInstruction>, AssemblerFailure> {
    let span = span!(Level::DEBUG, "pass 2");
    let _enter = span.enter();
    let mut address = options.mode.origin();
    let mut emitted = Vec::with_capacity(program.len());
    for instruction in program {
        let output = emit_one(instruction, address, ctx, options.debug_info)?;
        event!(Level::TRACE, "{address}: {}", output.code());
        emitted.push(output);
        address = address.successor();
    }
    Ok(emitted)
}
