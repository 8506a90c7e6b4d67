use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::ArgAction::{Set, SetTrue};
use clap::Parser;
use clap::builder::{BoolishValueParser, FalseyValueParser};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;

use base::prelude::ImageMode;
use vmasm::*;

/// Assembler for the virtual CPU
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Files from which assembly source is read.  They are assembled
    /// as a single program, in the order given.
    #[clap(required = true)]
    inputs: Vec<PathBuf>,

    /// Generate a user-space image instead of a kernel image.
    #[clap(action = SetTrue, long, env = "USER_SPACE", value_parser = FalseyValueParser::new())]
    user_space: bool,

    /// Follow each instruction in the image with a comment showing
    /// its source form.
    #[clap(action = Set, long, env = "DEBUG_INFO", default_value = "true",
           value_parser = BoolishValueParser::new())]
    debug_info: bool,

    /// File to which the image is written (by default,
    /// build/kernel.disk or build/user.disk)
    #[clap(action = Set, short = 'o', long)]
    output: Option<PathBuf>,

    /// Directory containing operations.sh, syscalls.sh and
    /// registers.sh.
    #[clap(action = Set, long, default_value = "include")]
    include_dir: PathBuf,
}

#[derive(Debug)]
enum Fail {
    /// We initialised the assembler but then it failed.
    AsmFail(AssemblerFailure),
    /// We were not able to correctly initialise the assembler.
    InitialisationFailure(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::AsmFail(assembler_failure) => assembler_failure.fmt(f),
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl Error for Fail {}

fn get_colour_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn write_coloured(stream: &mut StandardStream, colour: Color, text: &str) -> io::Result<()> {
    stream.set_color(ColorSpec::new().set_fg(Some(colour)))?;
    writeln!(stream, "{text}")?;
    stream.reset()
}

fn write_diagnostic(stream: &mut StandardStream, diagnostic: &Diagnostic) -> io::Result<()> {
    write_coloured(
        stream,
        Color::Yellow,
        &format!("Compilation error ({}) at {}", diagnostic.kind, diagnostic.location),
    )?;
    if let Some(line) = &diagnostic.source_line {
        write_coloured(stream, Color::Red, line)?;
    }
    write_coloured(stream, Color::Red, &diagnostic.message)?;
    writeln!(stream, "Expected syntax:")?;
    write_coloured(stream, Color::Green, &diagnostic.expected)?;
    writeln!(stream)
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    let mut stderr = StandardStream::stderr(get_colour_choice(io::stderr().is_terminal()));
    for diagnostic in diagnostics {
        if let Err(e) = write_diagnostic(&mut stderr, diagnostic) {
            event!(Level::ERROR, "failed to report diagnostic: {e}");
            return;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Stdout,
    Stderr,
}

/// A line printed once assembly is over.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Message {
    destination: Destination,
    colour: Option<Color>,
    text: String,
}

impl Message {
    fn stdout(colour: Color, text: String) -> Message {
        Message {
            destination: Destination::Stdout,
            colour: Some(colour),
            text,
        }
    }

    fn stderr(text: String) -> Message {
        Message {
            destination: Destination::Stderr,
            colour: None,
            text,
        }
    }

    fn print(&self) {
        let mut stream = match self.destination {
            Destination::Stdout => {
                StandardStream::stdout(get_colour_choice(io::stdout().is_terminal()))
            }
            Destination::Stderr => {
                StandardStream::stderr(get_colour_choice(io::stderr().is_terminal()))
            }
        };
        let result = match self.colour {
            Some(colour) => write_coloured(&mut stream, colour, &self.text),
            None => writeln!(stream, "{}", self.text),
        };
        if let Err(e) = result {
            event!(Level::ERROR, "failed to write message: {e}");
        }
    }
}

/// What the user is told when assembly is over, and the process
/// exit status.
#[derive(Debug)]
struct Outcome<'a> {
    status: i32,
    diagnostics: &'a [Diagnostic],
    messages: Vec<Message>,
}

fn exit_status(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn outcome(result: &Result<(Assembly, PathBuf), Fail>) -> Outcome<'_> {
    match result {
        Err(Fail::AsmFail(failure @ AssemblerFailure::TooManyErrors { .. })) => Outcome {
            status: exit_status(failure.diagnostics().len()),
            diagnostics: failure.diagnostics(),
            messages: vec![Message::stderr(
                "Too many compilation errors, aborting".to_string(),
            )],
        },
        Err(e) => Outcome {
            status: 1,
            diagnostics: &[],
            messages: vec![Message::stderr(e.to_string())],
        },
        Ok((assembly, output)) => {
            let mut messages = Vec::new();
            let status = if assembly.succeeded() {
                messages.push(Message::stdout(
                    Color::Green,
                    format!("Compilation succeeded. Output image: {}", output.display()),
                ));
                0
            } else {
                messages.push(Message::stdout(
                    Color::Red,
                    format!(
                        "Compilation failed: {} error(s).",
                        assembly.diagnostics.len()
                    ),
                ));
                exit_status(assembly.diagnostics.len())
            };
            if assembly.exceeds_capacity() {
                messages.push(Message::stdout(
                    Color::Yellow,
                    format!(
                        "Not enough RAM. RAM size: {}, last used: {}",
                        assembly.options.mode.capacity(),
                        assembly.next_free
                    ),
                ));
            }
            Outcome {
                status,
                diagnostics: &assembly.diagnostics,
                messages,
            }
        }
    }
}

fn check_inputs(inputs: &[PathBuf]) -> Result<(), Fail> {
    match inputs.iter().find(|path| !path.is_file()) {
        Some(path) => Err(Fail::InitialisationFailure(format!(
            "{} is not a valid source file",
            path.display()
        ))),
        None => Ok(()),
    }
}

fn run_assembler() -> Result<(Assembly, PathBuf), Fail> {
    let cli = Cli::parse();

    // See
    // https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/filter/struct.EnvFilter.html
    // for instructions on how to select which trace messages get
    // printed.
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            return Err(Fail::InitialisationFailure(format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            )));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    check_inputs(&cli.inputs)?;
    let mode = if cli.user_space {
        ImageMode::User
    } else {
        ImageMode::Kernel
    };
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(mode.default_output()));
    let options = AssemblyOptions {
        mode,
        debug_info: cli.debug_info,
    };

    let span = span!(Level::ERROR, "assemble", inputs=?cli.inputs, output=%output.display());
    let _enter = span.enter();
    let symtab = SymbolTable::load_include_dir(&cli.include_dir).map_err(Fail::AsmFail)?;
    let result = assemble_files(&cli.inputs, &symtab, options, &output).map_err(Fail::AsmFail);
    match &result {
        Err(e) => {
            event!(Level::ERROR, "assembly failed: {e}");
        }
        Ok(assembly) if !assembly.succeeded() => {
            event!(
                Level::INFO,
                "assembly completed with {} diagnostics",
                assembly.diagnostics.len()
            );
        }
        Ok(_) => {
            event!(Level::INFO, "assembly succeeded");
        }
    }
    result.map(|assembly| (assembly, output))
}

fn main() {
    let result = run_assembler();
    let outcome = outcome(&result);
    report_diagnostics(outcome.diagnostics);
    for message in &outcome.messages {
        message.print();
    }
    std::process::exit(outcome.status);
}

#[cfg(test)]
mod tests;
