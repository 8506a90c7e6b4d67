use test_strategy::proptest;

use super::*;

fn lexeme(prefix: Prefix, kind: LexemeKind, payload: &str) -> Lexeme {
    Lexeme {
        prefix,
        kind,
        payload: payload.to_string(),
    }
}

fn direct(kind: LexemeKind, payload: &str) -> Lexeme {
    lexeme(Prefix::Direct, kind, payload)
}

#[test]
fn test_missing_and_comment_words() {
    assert_eq!(classify(None), direct(LexemeKind::Comment, ""));
    assert_eq!(classify(Some("")), direct(LexemeKind::Comment, ""));
    assert_eq!(classify(Some("//x")), direct(LexemeKind::Comment, ""));
}

#[test]
fn test_string_literal() {
    assert_eq!(
        classify(Some(r#""hello world""#)),
        direct(LexemeKind::StringLiteral, "hello world")
    );
    assert_eq!(classify(Some(r#""""#)), direct(LexemeKind::StringLiteral, ""));
}

#[test]
fn test_to_keyword() {
    assert_eq!(classify(Some("to")), direct(LexemeKind::ToKeyword, "to"));
    // Only the exact word is a keyword.
    assert_eq!(classify(Some("TO")), direct(LexemeKind::Name, "TO"));
    assert_eq!(classify(Some("top")), direct(LexemeKind::Name, "top"));
}

#[test]
fn test_numbers_keep_their_digits() {
    assert_eq!(classify(Some("100")), direct(LexemeKind::Number, "100"));
    assert_eq!(classify(Some("007")), direct(LexemeKind::Number, "007"));
    assert_eq!(
        classify(Some("12a")).kind,
        LexemeKind::Malformed(MalformedReason::Unknown)
    );
}

#[test]
fn test_prefixes() {
    assert_eq!(
        classify(Some("*100")),
        lexeme(Prefix::Indirect, LexemeKind::Number, "100")
    );
    assert_eq!(
        classify(Some("@var:x")),
        lexeme(Prefix::DoubleIndirect, LexemeKind::Variable, "x")
    );
    assert_eq!(
        classify(Some("*REG_A")),
        lexeme(Prefix::Indirect, LexemeKind::Register, "REG_A")
    );
}

#[test]
fn test_variables_and_labels() {
    assert_eq!(classify(Some("var:count")), direct(LexemeKind::Variable, "count"));
    assert_eq!(classify(Some("label:top_1")), direct(LexemeKind::Label, "top_1"));
    assert_eq!(
        classify(Some("var:1st")),
        direct(LexemeKind::Malformed(MalformedReason::NameFormat), "var:1st")
    );
    assert_eq!(
        classify(Some("label:")),
        direct(LexemeKind::Malformed(MalformedReason::NameFormat), "label:")
    );
}

#[test]
fn test_symbol_kinds() {
    assert_eq!(classify(Some("OP_ADD")).kind, LexemeKind::Operator);
    assert_eq!(classify(Some("SYS_CALL_PRINT")).kind, LexemeKind::Syscall);
    assert_eq!(classify(Some("REG_A")).kind, LexemeKind::Register);
    assert_eq!(classify(Some("INFO_TIME")).kind, LexemeKind::Register);
    assert_eq!(classify(Some("FREE_1")).kind, LexemeKind::Register);
    assert_eq!(classify(Some("DISPLAY_BUFFER")).kind, LexemeKind::Register);
    assert_eq!(classify(Some("PROGRAM_COUNTER")).kind, LexemeKind::Register);
    assert_eq!(classify(Some("COLOR_RED")).kind, LexemeKind::Color);
    assert_eq!(classify(Some("KEYBOARD_READ_CHAR")).kind, LexemeKind::KeyboardMode);
    // Not one of the fixed keyboard modes, so it is only a name.
    assert_eq!(classify(Some("KEYBOARD_READ_WORD")).kind, LexemeKind::Name);
}

#[test]
fn test_commands_and_names() {
    assert_eq!(classify(Some("copy")), direct(LexemeKind::Command, "copy"));
    assert_eq!(classify(Some("DEBUG_ON")), direct(LexemeKind::Command, "DEBUG_ON"));
    assert_eq!(classify(Some("counter")), direct(LexemeKind::Name, "counter"));
    assert_eq!(
        classify(Some("not-a-name")),
        direct(LexemeKind::Malformed(MalformedReason::Unknown), "not-a-name")
    );
}

#[test]
fn test_lone_sigil_is_malformed() {
    assert_eq!(
        classify(Some("*")),
        lexeme(Prefix::Indirect, LexemeKind::Malformed(MalformedReason::Unknown), "")
    );
}

#[test]
fn test_debug_form() {
    assert_eq!(classify(Some(r#""hi""#)).debug_form(true), r#""hi""#);
    assert_eq!(classify(Some("42")).debug_form(true), r#""42""#);
    assert_eq!(classify(Some("42")).debug_form(false), "42");
    assert_eq!(classify(Some("*42")).debug_form(false), "*42");
    assert_eq!(classify(Some("*var:x")).debug_form(false), "*var:x");
    assert_eq!(classify(Some("label:top")).debug_form(false), "label:top");
    assert_eq!(classify(Some("to")).debug_form(false), "to");
    assert_eq!(classify(Some("REG_A")).debug_form(false), "REG_A");
}

#[proptest]
fn prefix_is_orthogonal_to_kind(
    #[strategy("[a-z0-9_:\"A-Z]{1,12}")] word: String,
    #[strategy(0..3usize)] which: usize,
) {
    let (sigil, prefix) = [
        ("", Prefix::Direct),
        ("*", Prefix::Indirect),
        ("@", Prefix::DoubleIndirect),
    ][which];
    let plain = classify(Some(&word));
    if plain.prefix == Prefix::Direct && !matches!(plain.kind, LexemeKind::Comment) {
        let prefixed = classify(Some(&format!("{sigil}{word}")));
        assert_eq!(prefixed.kind, plain.kind);
        assert_eq!(prefixed.payload, plain.payload);
        assert_eq!(prefixed.prefix, prefix);
    }
}

#[proptest]
fn variable_names_round_trip(#[strategy("[A-Za-z][A-Za-z0-9_]{0,10}")] name: String) {
    let lex = classify(Some(&format!("var:{name}")));
    assert_eq!(lex.kind, LexemeKind::Variable);
    assert_eq!(lex.payload, name);
}
