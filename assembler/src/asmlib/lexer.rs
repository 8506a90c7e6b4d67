//! Splits a line of assembly source into words.
//!
//! Words are separated by whitespace.  A run of characters enclosed
//! in double (or single) quotes is a single word even when it
//! contains whitespace, and the quotes are kept as part of the word,
//! so that later stages can tell a string literal from a bare word.
use std::fmt::{self, Display, Formatter};

use logos::Logos;


/// Marks the start of a comment, which extends to the end of the
/// line.
pub(crate) const COMMENT_MARKER: &str = "//";

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Word {
    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    Quoted,

    #[regex(r#"[^ \t\r\n\f"'][^ \t\r\n\f]*"#)]
    Bare,

    #[regex(r#""[^"]*"#)]
    #[regex(r"'[^']*")]
    Unterminated,
}

/// A quotation mark was opened but never closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnbalancedQuote {
    /// Byte offset of the opening quote within the line.
    pub(crate) column: usize,
}

impl Display for UnbalancedQuote {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Columns are counted from 0 internally, but from 1 in messages.
        write!(f, "no closing quotation for quote at column {}", self.column + 1)
    }
}

/// Removes a trailing `//` comment from `line`.  A `//` inside a
/// quoted string does not start a comment.
pub(crate) fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (pos, ch) in line.char_indices() {
        match quote {
            Some(q) if ch == q => {
                quote = None;
            }
            Some(_) => (),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
            }
            None if line[pos..].starts_with(COMMENT_MARKER) => {
                return &line[..pos];
            }
            None => (),
        }
    }
    line
}

/// Splits `line` into words, respecting quotes.
pub(crate) fn split_words(line: &str) -> Result<Vec<&str>, UnbalancedQuote> {
    let mut words = Vec::new();
    let mut lex = Word::lexer(line);
    while let Some(item) = lex.next() {
        match item {
            Ok(Word::Quoted | Word::Bare) => {
                words.push(lex.slice());
            }
            Ok(Word::Unterminated) | Err(()) => {
                return Err(UnbalancedQuote {
                    column: lex.span().start,
                });
            }
        }
    }
    Ok(words)
}
