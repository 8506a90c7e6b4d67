use std::{ops::Deref, sync::OnceLock};

use regex::Regex;

/// A regular expression which is compiled the first time it is used.
pub(crate) struct LazyRegex {
    once: OnceLock<Regex>,
    pattern: &'static str,
}

impl LazyRegex {
    pub(crate) const fn new(pattern: &'static str) -> Self {
        LazyRegex {
            once: OnceLock::new(),
            pattern,
        }
    }
}

impl Deref for LazyRegex {
    type Target = Regex;

    fn deref(&self) -> &Regex {
        self.once.get_or_init(|| match Regex::new(self.pattern) {
            Ok(r) => r,
            Err(e) => {
                panic!("'{}' is not a valid regular expression: {e}", self.pattern);
            }
        })
    }
}

/// Names of labels and variables: a letter followed by letters,
/// digits and underscores.
static IDENTIFIER: LazyRegex = LazyRegex::new(r"^[A-Za-z][A-Za-z0-9_]*$");

pub(crate) fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

#[test]
fn test_is_identifier() {
    assert!(is_identifier("x"));
    assert!(is_identifier("loop_2"));
    assert!(is_identifier("Main"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("2nd"));
    assert!(!is_identifier("_hidden"));
    assert!(!is_identifier("has-dash"));
    assert!(!is_identifier("trailing\n"));
}
