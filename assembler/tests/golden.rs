use std::fs;
use std::path::{Path, PathBuf};

use base::prelude::ImageMode;
use vmasm::*;

fn get_test_input_file_name(relative_to_manifest: &str) -> PathBuf {
    let mut location = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    location.push(relative_to_manifest);
    if location.exists() {
        location
    } else {
        panic!(
            "Cannot find input {relative_to_manifest}: {} does not exist",
            location.display()
        );
    }
}

fn get_temp_output_file_name() -> tempfile::TempPath {
    tempfile::Builder::new()
        .suffix(".disk")
        .tempfile()
        .expect("should be able to create a temporary file")
        .into_temp_path()
}

fn test_symbols() -> SymbolTable {
    SymbolTable::load_include_dir(&get_test_input_file_name("testdata/include"))
        .expect("test declarations should be readable")
}

fn files_are_identical(expected: &Path, got: &Path) -> Result<(), String> {
    fn must_read(name: &Path) -> String {
        fs::read_to_string(name)
            .unwrap_or_else(|e| panic!("should be able to read test file {}: {e}", name.display()))
    }

    let expected_text = must_read(expected);
    let got_text = must_read(got);
    for (n, (expected_line, got_line)) in expected_text.lines().zip(got_text.lines()).enumerate() {
        if expected_line != got_line {
            return Err(format!(
                "difference at line {}: expected {expected_line:?} but got {got_line:?}",
                n + 1
            ));
        }
    }
    if expected_text.len() != got_text.len() {
        return Err(format!(
            "wrong file length: {} is {} bytes but {} is {} bytes",
            expected.display(),
            expected_text.len(),
            got.display(),
            got_text.len()
        ));
    }
    Ok(())
}

fn assembler_golden_output_test(
    input_relative_path: &str,
    golden_output_relative_path: &str,
    options: AssemblyOptions,
) -> Result<(), String> {
    let input = get_test_input_file_name(input_relative_path);
    let golden = get_test_input_file_name(golden_output_relative_path);
    let actual_output = get_temp_output_file_name();

    match assemble_files(&[input], &test_symbols(), options, &actual_output) {
        Ok(assembly) if !assembly.succeeded() => Err(format!(
            "{input_relative_path} should assemble cleanly, but: {:?}",
            assembly.diagnostics
        )),
        Ok(_) => files_are_identical(&golden, &actual_output).map_err(|e| {
            format!(
                "{} and {} are not identical: {e}",
                golden.display(),
                actual_output.display()
            )
        }),
        Err(e) => Err(format!("failed to assemble {input_relative_path}: {e}")),
    }
}

#[test]
fn golden_output_assembling_hello_kernel_image() {
    assembler_golden_output_test(
        "testdata/hello.asm",
        "testdata/hello.disk",
        AssemblyOptions {
            mode: ImageMode::Kernel,
            debug_info: true,
        },
    )
    .expect("actual and golden outputs should have been identical");
}

#[test]
fn golden_output_assembling_hello_user_image() {
    assembler_golden_output_test(
        "testdata/hello.asm",
        "testdata/hello-user.disk",
        AssemblyOptions {
            mode: ImageMode::User,
            debug_info: false,
        },
    )
    .expect("actual and golden outputs should have been identical");
}

#[test]
fn image_is_written_despite_errors() {
    let input = get_test_input_file_name("testdata/broken.asm");
    let actual_output = get_temp_output_file_name();
    let assembly = assemble_files(
        &[input],
        &test_symbols(),
        AssemblyOptions {
            mode: ImageMode::Kernel,
            debug_info: false,
        },
        &actual_output,
    )
    .expect("assembly should run to completion");

    let kinds: Vec<DiagnosticKind> = assembly.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::UnknownCommand,
            DiagnosticKind::UndeclaredSymbol,
            DiagnosticKind::UndeclaredIdentifier,
        ]
    );
    let image = fs::read_to_string(&actual_output).expect("image should have been written");
    assert_eq!(image, "1 45 46\n1 0 2\n3 0\n0\nok\n\n");
}

#[test]
fn output_directory_is_created() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let output = dir.path().join("build").join("kernel.disk");
    let input = get_test_input_file_name("testdata/hello.asm");
    assemble_files(&[input], &test_symbols(), AssemblyOptions::default(), &output)
        .expect("assembly should succeed");
    assert!(output.is_file());
}

#[test]
fn missing_input_is_an_io_failure() {
    let output = get_temp_output_file_name();
    match assemble_files(
        &[PathBuf::from("/nonexistent/prog.asm")],
        &SymbolTable::new(),
        AssemblyOptions::default(),
        &output,
    ) {
        Err(AssemblerFailure::Io(IoFailed {
            action: IoAction::Read,
            ..
        })) => (),
        other => panic!("expected a read failure, got {other:?}"),
    }
}
