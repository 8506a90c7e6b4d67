use std::path::PathBuf;

use super::*;

fn assembled(body: &str) -> Result<(Assembly, PathBuf), Fail> {
    assemble_sources(
        &[SourceFile::new("prog.asm", body)],
        &SymbolTable::new(),
        AssemblyOptions::default(),
    )
    .map(|assembly| (assembly, PathBuf::from("build/kernel.disk")))
    .map_err(Fail::AsmFail)
}

fn texts<'a>(outcome: &'a Outcome<'_>) -> Vec<&'a str> {
    outcome.messages.iter().map(|m| m.text.as_str()).collect()
}

#[test]
fn test_success_names_the_image() {
    let result = assembled("cpu_exec");
    let outcome = outcome(&result);
    assert_eq!(outcome.status, 0);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(
        outcome.messages,
        vec![Message::stdout(
            Color::Green,
            "Compilation succeeded. Output image: build/kernel.disk".to_string()
        )]
    );
}

#[test]
fn test_status_is_the_diagnostic_count() {
    let result = assembled("jump nowhere\ncpu_exec\njump elsewhere");
    let outcome = outcome(&result);
    assert_eq!(outcome.status, 2);
    assert_eq!(outcome.diagnostics.len(), 2);
    assert_eq!(texts(&outcome), vec!["Compilation failed: 2 error(s)."]);
}

#[test]
fn test_abort_after_too_many_errors() {
    let result = assembled(&"frobnicate\n".repeat(25));
    let outcome = outcome(&result);
    assert_eq!(outcome.status, 21);
    assert_eq!(outcome.diagnostics.len(), 21);
    assert_eq!(
        outcome.messages,
        vec![Message::stderr(
            "Too many compilation errors, aborting".to_string()
        )]
    );
}

#[test]
fn test_capacity_warning_leaves_status_alone() {
    let result = assembled(&"cpu_exec\n".repeat(1000));
    let outcome = outcome(&result);
    assert_eq!(outcome.status, 0);
    assert_eq!(
        texts(&outcome),
        vec![
            "Compilation succeeded. Output image: build/kernel.disk",
            "Not enough RAM. RAM size: 1024, last used: 1041",
        ]
    );

    let result = assembled(&format!("{}jump nowhere\n", "cpu_exec\n".repeat(1000)));
    let outcome = super::outcome(&result);
    assert_eq!(outcome.status, 1);
    assert_eq!(
        texts(&outcome),
        vec![
            "Compilation failed: 1 error(s).",
            "Not enough RAM. RAM size: 1024, last used: 1042",
        ]
    );
}

#[test]
fn test_initialisation_failure() {
    let result: Result<(Assembly, PathBuf), Fail> = Err(Fail::InitialisationFailure(
        "missing.asm is not a valid source file".to_string(),
    ));
    let outcome = outcome(&result);
    assert_eq!(outcome.status, 1);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(texts(&outcome), vec!["missing.asm is not a valid source file"]);
}

#[test]
fn test_missing_input_is_rejected() {
    match check_inputs(&[PathBuf::from("/nonexistent/prog.asm")]) {
        Err(Fail::InitialisationFailure(msg)) => {
            assert_eq!(msg, "/nonexistent/prog.asm is not a valid source file");
        }
        other => panic!("expected the input to be rejected, got {other:?}"),
    }
}
