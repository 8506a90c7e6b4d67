use super::super::lexeme::classify;
use super::*;

fn check(line: &str) -> Result<Command, GrammarError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = parse_command(words[0])?;
    let operands: Vec<Lexeme> = words[1..].iter().map(|w| classify(Some(w))).collect();
    validate(command, &operands).map(|()| command)
}

#[test]
fn test_command_names_round_trip() {
    for command in Command::ALL {
        assert_eq!(Command::from_name(command.name()), Some(command));
    }
    assert_eq!(Command::from_name("COPY"), None);
}

#[test]
fn test_token_counts() {
    assert_eq!(Command::Write.token_count(), 4);
    assert_eq!(Command::Copy.token_count(), 4);
    assert_eq!(Command::Label.token_count(), 2);
    assert_eq!(Command::Var.token_count(), 2);
    assert_eq!(Command::Jump.token_count(), 2);
    assert_eq!(Command::JumpIf.token_count(), 2);
    assert_eq!(Command::JumpIfNot.token_count(), 2);
    assert_eq!(Command::JumpErr.token_count(), 2);
    assert_eq!(Command::CpuExec.token_count(), 1);
    assert_eq!(Command::DebugOn.token_count(), 1);
    assert_eq!(Command::DebugOff.token_count(), 1);
}

#[test]
fn test_opcodes() {
    assert_eq!(Command::Write.opcode(), Some(Opcode::Copy));
    assert_eq!(Command::Copy.opcode(), Some(Opcode::Copy));
    assert_eq!(Command::JumpErr.opcode(), Some(Opcode::JumpErr));
    assert_eq!(Command::DebugOff.opcode(), Some(Opcode::DebugOff));
    assert_eq!(Command::Label.opcode(), None);
    assert_eq!(Command::Var.opcode(), None);
}

#[test]
fn test_valid_instructions() {
    for line in [
        r#"write "hi" to 100"#,
        "write 42 to *REG_A",
        "write OP_ADD to var:x",
        "write label:top to result",
        "copy 1 to 2",
        "copy @var:x to *REG_B",
        "copy *100 to @200",
        "copy REG_A to counter",
        "jump label:top",
        "jump_if *REG_A",
        "jump_if_not *var:target",
        "jump_err 77",
        "jump done",
        "label top",
        "var counter",
        "cpu_exec",
        "DEBUG_ON",
        "DEBUG_OFF",
    ] {
        if let Err(e) = check(line) {
            panic!("'{line}' should be valid but: {e}");
        }
    }
}

#[test]
fn test_write_payload_takes_no_prefix() {
    assert_eq!(
        check("write *5 to 6"),
        Err(GrammarError::Mismatch {
            position: 1,
            found: classify(Some("*5")),
        })
    );
}

#[test]
fn test_write_target_rejects_double_indirect() {
    assert!(matches!(
        check("write 5 to @6"),
        Err(GrammarError::Mismatch { position: 3, .. })
    ));
}

#[test]
fn test_missing_to_keyword() {
    assert!(matches!(
        check("copy 1 2 3"),
        Err(GrammarError::Mismatch { position: 2, .. })
    ));
}

#[test]
fn test_direct_register_is_not_a_jump_target() {
    assert!(matches!(
        check("jump REG_A"),
        Err(GrammarError::Mismatch { position: 1, .. })
    ));
}

#[test]
fn test_label_declaration_needs_a_bare_name() {
    assert!(check("label label:x").is_err());
    assert!(check("label OP_X").is_err());
    assert!(check("var *x").is_err());
}

#[test]
fn test_unexpected_end() {
    assert_eq!(
        check("copy 1 to"),
        Err(GrammarError::UnexpectedEnd {
            expected: 4,
            found: 3
        })
    );
    assert_eq!(
        check("jump"),
        Err(GrammarError::UnexpectedEnd {
            expected: 2,
            found: 1
        })
    );
}

#[test]
fn test_trailing_operand() {
    assert_eq!(
        check("cpu_exec now"),
        Err(GrammarError::TrailingOperand {
            word: "now".to_string()
        })
    );
}

#[test]
fn test_unknown_command() {
    assert_eq!(
        check("move 1 to 2"),
        Err(GrammarError::UnknownCommand("move".to_string()))
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        check("jump REG_A").unwrap_err().to_string(),
        "operand 1 cannot be register 'REG_A'"
    );
    assert_eq!(
        check("write *5 to 6").unwrap_err().to_string(),
        "operand 1 cannot be indirect number '*5'"
    );
}
