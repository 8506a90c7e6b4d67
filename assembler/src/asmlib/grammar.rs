//! Operand shapes of each command.
//!
//! Every command takes a fixed number of words (the command itself
//! included).  For each operand position, a command's rule lists the
//! lexeme kinds which may appear there, and for each kind, the
//! addressing-mode prefixes it may carry.
use std::fmt::{self, Display, Formatter};

use base::prelude::Opcode;

use super::lexeme::{Lexeme, LexemeKind, Prefix};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Command {
    Write,
    Copy,
    Label,
    Var,
    Jump,
    JumpIf,
    JumpIfNot,
    JumpErr,
    CpuExec,
    DebugOn,
    DebugOff,
}

impl Command {
    pub(crate) const ALL: [Command; 11] = [
        Command::Write,
        Command::Copy,
        Command::Label,
        Command::Jump,
        Command::JumpIf,
        Command::JumpIfNot,
        Command::JumpErr,
        Command::CpuExec,
        Command::Var,
        Command::DebugOn,
        Command::DebugOff,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Command::Write => "write",
            Command::Copy => "copy",
            Command::Label => "label",
            Command::Var => "var",
            Command::Jump => "jump",
            Command::JumpIf => "jump_if",
            Command::JumpIfNot => "jump_if_not",
            Command::JumpErr => "jump_err",
            Command::CpuExec => "cpu_exec",
            Command::DebugOn => "DEBUG_ON",
            Command::DebugOff => "DEBUG_OFF",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Number of words in an instruction using this command,
    /// counting the command itself.
    pub(crate) fn token_count(self) -> usize {
        1 + self.rule().operands.len()
    }

    /// The opcode emitted for this command.  Declarations emit
    /// nothing and so have no opcode.
    pub(crate) fn opcode(self) -> Option<Opcode> {
        match self {
            Command::Write | Command::Copy => Some(Opcode::Copy),
            Command::Jump => Some(Opcode::Jump),
            Command::JumpIf => Some(Opcode::JumpIf),
            Command::JumpIfNot => Some(Opcode::JumpIfNot),
            Command::JumpErr => Some(Opcode::JumpErr),
            Command::CpuExec => Some(Opcode::CpuExec),
            Command::DebugOn => Some(Opcode::DebugOn),
            Command::DebugOff => Some(Opcode::DebugOff),
            Command::Label | Command::Var => None,
        }
    }

    pub(crate) fn rule(self) -> &'static CommandRule {
        match self {
            Command::Write => &WRITE,
            Command::Copy => &COPY,
            Command::Label => &LABEL,
            Command::Var => &VAR,
            Command::Jump => &JUMP,
            Command::JumpIf => &JUMP_IF,
            Command::JumpIfNot => &JUMP_IF_NOT,
            Command::JumpErr => &JUMP_ERR,
            Command::CpuExec => &CPU_EXEC,
            Command::DebugOn => &DEBUG_ON,
            Command::DebugOff => &DEBUG_OFF,
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One permitted lexeme kind at an operand position, with the
/// prefixes it may carry there.
#[derive(Debug)]
pub(crate) struct Slot {
    kind: LexemeKind,
    prefixes: &'static [Prefix],
}

impl Slot {
    const fn new(kind: LexemeKind, prefixes: &'static [Prefix]) -> Slot {
        Slot { kind, prefixes }
    }

    fn admits(&self, lexeme: &Lexeme) -> bool {
        lexeme.kind == self.kind && self.prefixes.contains(&lexeme.prefix)
    }
}

#[derive(Debug)]
pub(crate) struct CommandRule {
    /// For each operand, the slots any one of which it must fill.
    operands: &'static [&'static [Slot]],
    /// Shown to the user when an instruction does not match.
    pub(crate) syntax: &'static str,
}

const DIRECT: &[Prefix] = &[Prefix::Direct];
const INDIRECT: &[Prefix] = &[Prefix::Indirect];
const DIRECT_OR_INDIRECT: &[Prefix] = &[Prefix::Direct, Prefix::Indirect];
const ANY_PREFIX: &[Prefix] = &[Prefix::Direct, Prefix::Indirect, Prefix::DoubleIndirect];

const TO: &[Slot] = &[Slot::new(LexemeKind::ToKeyword, DIRECT)];

const WRITE_PAYLOAD: &[Slot] = &[
    Slot::new(LexemeKind::StringLiteral, DIRECT),
    Slot::new(LexemeKind::Number, DIRECT),
    Slot::new(LexemeKind::Operator, DIRECT),
    Slot::new(LexemeKind::Syscall, DIRECT),
    Slot::new(LexemeKind::Color, DIRECT),
    Slot::new(LexemeKind::KeyboardMode, DIRECT),
    Slot::new(LexemeKind::Label, DIRECT),
];

const WRITE_TARGET: &[Slot] = &[
    Slot::new(LexemeKind::Number, DIRECT_OR_INDIRECT),
    Slot::new(LexemeKind::Register, DIRECT_OR_INDIRECT),
    Slot::new(LexemeKind::Variable, DIRECT_OR_INDIRECT),
    Slot::new(LexemeKind::Name, DIRECT),
];

const COPY_OPERAND: &[Slot] = &[
    Slot::new(LexemeKind::Number, ANY_PREFIX),
    Slot::new(LexemeKind::Register, ANY_PREFIX),
    Slot::new(LexemeKind::Variable, ANY_PREFIX),
    Slot::new(LexemeKind::Name, DIRECT),
];

const JUMP_TARGET: &[Slot] = &[
    Slot::new(LexemeKind::Number, DIRECT_OR_INDIRECT),
    Slot::new(LexemeKind::Register, INDIRECT),
    Slot::new(LexemeKind::Label, DIRECT),
    Slot::new(LexemeKind::Variable, INDIRECT),
    Slot::new(LexemeKind::Name, DIRECT),
];

const DECLARED_NAME: &[Slot] = &[Slot::new(LexemeKind::Name, DIRECT)];

static WRITE: CommandRule = CommandRule {
    operands: &[WRITE_PAYLOAD, TO, WRITE_TARGET],
    syntax: "write \"some string\" to address OR write OP_* to address",
};

static COPY: CommandRule = CommandRule {
    operands: &[COPY_OPERAND, TO, COPY_OPERAND],
    syntax: "copy someAddress to otherAddress",
};

static LABEL: CommandRule = CommandRule {
    operands: &[DECLARED_NAME],
    syntax: "label name",
};

static VAR: CommandRule = CommandRule {
    operands: &[DECLARED_NAME],
    syntax: "var name",
};

static JUMP: CommandRule = CommandRule {
    operands: &[JUMP_TARGET],
    syntax: "jump label:someName",
};

static JUMP_IF: CommandRule = CommandRule {
    operands: &[JUMP_TARGET],
    syntax: "jump_if label:someName",
};

static JUMP_IF_NOT: CommandRule = CommandRule {
    operands: &[JUMP_TARGET],
    syntax: "jump_if_not label:someName",
};

static JUMP_ERR: CommandRule = CommandRule {
    operands: &[JUMP_TARGET],
    syntax: "jump_err label:someName",
};

static CPU_EXEC: CommandRule = CommandRule {
    operands: &[],
    syntax: "cpu_exec",
};

static DEBUG_ON: CommandRule = CommandRule {
    operands: &[],
    syntax: "DEBUG_ON",
};

static DEBUG_OFF: CommandRule = CommandRule {
    operands: &[],
    syntax: "DEBUG_OFF",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GrammarError {
    UnknownCommand(String),
    /// The instruction has fewer words than its command needs.
    UnexpectedEnd { expected: usize, found: usize },
    /// Operand `position` (counting from 1) has the wrong shape.
    Mismatch { position: usize, found: Lexeme },
    TrailingOperand { word: String },
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UnknownCommand(name) => write!(f, "{name} is an unknown command"),
            GrammarError::UnexpectedEnd { expected, found } => write!(
                f,
                "instruction is missing one or more arguments (expected {expected} words, found {found})"
            ),
            GrammarError::Mismatch { position, found } => write!(
                f,
                "operand {position} cannot be {}{} '{}'",
                match found.prefix {
                    Prefix::Direct => "",
                    Prefix::Indirect => "indirect ",
                    Prefix::DoubleIndirect => "double-indirect ",
                },
                found.kind,
                found.debug_form(false),
            ),
            GrammarError::TrailingOperand { word } => {
                write!(f, "unexpected extra word '{word}' at the end of the instruction")
            }
        }
    }
}

/// Identifies the command named by the first word of an instruction.
pub(crate) fn parse_command(word: &str) -> Result<Command, GrammarError> {
    Command::from_name(word).ok_or_else(|| GrammarError::UnknownCommand(word.to_string()))
}

/// Checks that `operands` (the lexemes following the command word)
/// have the shape the command requires.
pub(crate) fn validate(command: Command, operands: &[Lexeme]) -> Result<(), GrammarError> {
    let rule = command.rule();
    let needed = rule.operands.len();
    if operands.len() < needed {
        return Err(GrammarError::UnexpectedEnd {
            expected: command.token_count(),
            found: operands.len() + 1,
        });
    }
    if let Some(extra) = operands.get(needed) {
        return Err(GrammarError::TrailingOperand {
            word: extra.debug_form(false),
        });
    }
    for (index, (slots, lexeme)) in rule.operands.iter().zip(operands).enumerate() {
        if !slots.iter().any(|slot| slot.admits(lexeme)) {
            return Err(GrammarError::Mismatch {
                position: index + 1,
                found: lexeme.clone(),
            });
        }
    }
    Ok(())
}
