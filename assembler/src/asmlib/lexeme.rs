//! Classification of words into lexemes.
//!
//! Each operand word becomes a [`Lexeme`]: an addressing-mode prefix,
//! a kind and the text the kind applies to.  Classification only
//! depends on fixed keyword and prefix tables; it never consults the
//! symbol table, so a word like `OP_NONSENSE` is an operator lexeme
//! even though no such operator exists.
use std::fmt::{self, Display, Formatter};

use super::grammar::Command;
use super::lexer::COMMENT_MARKER;
use super::rx::is_identifier;

#[cfg(test)]
mod tests;

/// Registers which are not named with one of the register prefixes.
const NAMED_REGISTERS: &[&str] = &[
    "DISPLAY_BUFFER",
    "DISPLAY_COLOR",
    "DISPLAY_BACKGROUND",
    "KEYBOARD_BUFFER",
    "PROGRAM_COUNTER",
];

const REGISTER_PREFIXES: &[&str] = &["REG_", "INFO_", "FREE_"];

const KEYBOARD_MODES: &[&str] = &[
    "KEYBOARD_READ_LINE",
    "KEYBOARD_READ_LINE_SILENTLY",
    "KEYBOARD_READ_CHAR",
    "KEYBOARD_READ_CHAR_SILENTLY",
];

pub(crate) const TO_KEYWORD: &str = "to";
const VARIABLE_SIGIL: &str = "var:";
const LABEL_SIGIL: &str = "label:";

/// Addressing mode of an operand.  The assembler does not interpret
/// the prefix; it is passed through to the CPU attached to the
/// resolved value of the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum Prefix {
    #[default]
    Direct,
    /// Written `*`.
    Indirect,
    /// Written `@`.
    DoubleIndirect,
}

impl Prefix {
    fn from_sigil(ch: char) -> Option<Prefix> {
        match ch {
            '*' => Some(Prefix::Indirect),
            '@' => Some(Prefix::DoubleIndirect),
            _ => None,
        }
    }

    pub(crate) fn sigil(self) -> &'static str {
        match self {
            Prefix::Direct => "",
            Prefix::Indirect => "*",
            Prefix::DoubleIndirect => "@",
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.sigil())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MalformedReason {
    /// The text after `var:` or `label:` is not a valid name.
    NameFormat,
    /// The word does not look like anything we know.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum LexemeKind {
    /// A missing word, or a comment.
    Comment,
    StringLiteral,
    Number,
    ToKeyword,
    Variable,
    Label,
    Operator,
    Syscall,
    Register,
    Color,
    KeyboardMode,
    Command,
    /// A bare identifier, resolved later against the variables and
    /// then the labels.
    Name,
    Malformed(MalformedReason),
}

impl Display for LexemeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexemeKind::Comment => "end of instruction",
            LexemeKind::StringLiteral => "string",
            LexemeKind::Number => "number",
            LexemeKind::ToKeyword => "'to'",
            LexemeKind::Variable => "variable",
            LexemeKind::Label => "label",
            LexemeKind::Operator => "operator",
            LexemeKind::Syscall => "syscall",
            LexemeKind::Register => "register",
            LexemeKind::Color => "color",
            LexemeKind::KeyboardMode => "keyboard mode",
            LexemeKind::Command => "command",
            LexemeKind::Name => "name",
            LexemeKind::Malformed(MalformedReason::NameFormat) => "badly formed name",
            LexemeKind::Malformed(MalformedReason::Unknown) => "unrecognised word",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Lexeme {
    pub(crate) prefix: Prefix,
    pub(crate) kind: LexemeKind,
    /// The identifier or literal text, without sigils or quotes.
    pub(crate) payload: String,
}

impl Lexeme {
    fn new(prefix: Prefix, kind: LexemeKind, payload: &str) -> Lexeme {
        Lexeme {
            prefix,
            kind,
            payload: payload.to_string(),
        }
    }

    /// Returns the human-readable form of the lexeme used in the
    /// debug field of the image.  Numbers written by `write` are
    /// shown quoted, since they end up in the constant pool just as
    /// strings do.
    pub(crate) fn debug_form(&self, is_write_payload: bool) -> String {
        let sigil = self.prefix.sigil();
        match self.kind {
            LexemeKind::StringLiteral => format!("\"{}\"", self.payload),
            LexemeKind::Number if is_write_payload => format!("\"{}\"", self.payload),
            LexemeKind::Variable => format!("{sigil}{VARIABLE_SIGIL}{}", self.payload),
            LexemeKind::Label => format!("{sigil}{LABEL_SIGIL}{}", self.payload),
            _ => format!("{sigil}{}", self.payload),
        }
    }
}

fn has_any_prefix(word: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| word.starts_with(p))
}

fn named(word: &str, kind: LexemeKind, prefix: Prefix, full: &str) -> Lexeme {
    if is_identifier(word) {
        Lexeme::new(prefix, kind, word)
    } else {
        Lexeme::new(prefix, LexemeKind::Malformed(MalformedReason::NameFormat), full)
    }
}

/// Classifies a word.  `None` stands for a word which is missing
/// from the end of an instruction.  The first matching rule wins.
pub(crate) fn classify(word: Option<&str>) -> Lexeme {
    let word = match word {
        None => {
            return Lexeme::new(Prefix::Direct, LexemeKind::Comment, "");
        }
        Some(w) if w.is_empty() || w.starts_with(COMMENT_MARKER) => {
            return Lexeme::new(Prefix::Direct, LexemeKind::Comment, "");
        }
        Some(w) => w,
    };

    let (prefix, word) = match word.chars().next().and_then(Prefix::from_sigil) {
        Some(prefix) => (prefix, &word[1..]),
        None => (Prefix::Direct, word),
    };

    if word.len() >= 2 && word.starts_with('"') && word.ends_with('"') {
        return Lexeme::new(prefix, LexemeKind::StringLiteral, &word[1..word.len() - 1]);
    }
    if word == TO_KEYWORD {
        return Lexeme::new(prefix, LexemeKind::ToKeyword, word);
    }
    if !word.is_empty() && word.chars().all(|ch| ch.is_ascii_digit()) {
        return Lexeme::new(prefix, LexemeKind::Number, word);
    }
    if let Some(name) = word.strip_prefix(VARIABLE_SIGIL) {
        return named(name, LexemeKind::Variable, prefix, word);
    }
    if let Some(name) = word.strip_prefix(LABEL_SIGIL) {
        return named(name, LexemeKind::Label, prefix, word);
    }
    let kind = if word.starts_with("OP_") {
        LexemeKind::Operator
    } else if word.starts_with("SYS_CALL_") {
        LexemeKind::Syscall
    } else if has_any_prefix(word, REGISTER_PREFIXES) || NAMED_REGISTERS.contains(&word) {
        LexemeKind::Register
    } else if word.starts_with("COLOR_") {
        LexemeKind::Color
    } else if KEYBOARD_MODES.contains(&word) {
        LexemeKind::KeyboardMode
    } else if Command::from_name(word).is_some() {
        LexemeKind::Command
    } else if is_identifier(word) {
        LexemeKind::Name
    } else {
        LexemeKind::Malformed(MalformedReason::Unknown)
    };
    Lexeme::new(prefix, kind, word)
}
