//! Command implementations.
//!
//! Each command returns `Ok(code)` with the status to exit with on success
//! and `Err(code)` after reporting a failure on stderr.

use crate::cli::{Format, RunArgs};
use crate::stats::{self, StatsItem};
use ipp_common::{Program, RawProgram, ReturnCode};
use ipp_vm::io::{LineReader, StreamWriter};
use ipp_vm::{Streams, VM};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

fn exit_code(code: ReturnCode) -> i32 {
    code.code()
}

fn read_text(path: &Path) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        exit_code(ReturnCode::InputFile)
    })
}

/// Turn program text into instruction records.
pub fn decode(text: &str, format: Format) -> Result<RawProgram, i32> {
    let format = match format {
        Format::Auto if text.trim_start().starts_with('{') => Format::Json,
        Format::Auto => Format::Source,
        other => other,
    };
    debug!(?format, "decoding program");

    match format {
        Format::Source => ipp_assembler::assemble(text).map_err(|e| {
            eprintln!("error: {e}");
            exit_code(e.return_code())
        }),
        _ => serde_json::from_str(text).map_err(|e| {
            eprintln!("error: malformed program document: {e}");
            exit_code(ReturnCode::MalformedDocument)
        }),
    }
}

/// Read, decode and load a program file.
pub fn load_program(path: &Path, format: Format) -> Result<Program, i32> {
    let text = read_text(path)?;
    let records = decode(&text, format)?;
    ipp_loader::load(&records).map_err(|errors| {
        for e in &errors {
            eprintln!("error: {e}");
        }
        errors
            .first()
            .map_or(exit_code(ReturnCode::Internal), |e| exit_code(e.return_code()))
    })
}

/// Load and execute a program.
pub fn run(args: &RunArgs, stats_items: &[StatsItem]) -> Result<i32, i32> {
    if args.stats.is_none() && args.wants_stats() {
        eprintln!("error: statistics options require --stats FILE");
        return Err(exit_code(ReturnCode::Parameter));
    }

    let program = load_program(&args.program, args.format)?;
    info!(
        instructions = program.len(),
        labels = program.labels().len(),
        "program loaded"
    );

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot open input '{}': {e}", path.display());
                exit_code(ReturnCode::InputFile)
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let mut input = LineReader::new(reader);
    let mut output = StreamWriter::new(BufWriter::new(io::stdout()));
    let mut diagnostic = StreamWriter::new(io::stderr());

    let mut vm = VM::new(
        &program,
        Streams {
            input: &mut input,
            output: &mut output,
            diagnostic: &mut diagnostic,
        },
    );
    let result = vm.execute();
    let collected = vm.stats().clone();
    debug!(executed = collected.executed(), "execution finished");

    if let Some(path) = &args.stats {
        fs::write(path, stats::render(stats_items, &collected)).map_err(|e| {
            eprintln!("error: cannot write statistics to '{}': {e}", path.display());
            exit_code(ReturnCode::OutputFile)
        })?;
    }

    match result {
        Ok(done) => Ok(done.code()),
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(exit_code(e.return_code()))
        }
    }
}

/// Load a program and report its size.
pub fn check(path: &Path, format: Format) -> Result<i32, i32> {
    let program = load_program(path, format)?;
    println!(
        "ok: {} instructions, {} labels",
        program.len(),
        program.labels().len()
    );
    Ok(0)
}

/// Translate IPPcode24 source into a JSON program document.
pub fn parse(source: &Path, output: Option<&Path>) -> Result<i32, i32> {
    let text = read_text(source)?;
    let records = decode(&text, Format::Source)?;
    let json = serde_json::to_string_pretty(&records).map_err(|e| {
        eprintln!("error: cannot serialize program: {e}");
        exit_code(ReturnCode::Internal)
    })?;

    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n")).map_err(|e| {
                eprintln!("error: cannot write '{}': {e}", path.display());
                exit_code(ReturnCode::OutputFile)
            })?;
            eprintln!(
                "parsed {} instructions to {}",
                records.instructions.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(0)
}

/// Print a program as canonical source.
pub fn disassemble(path: &Path, format: Format) -> Result<i32, i32> {
    let program = load_program(path, format)?;
    print!("{}", ipp_assembler::disassemble(&program));
    Ok(0)
}
