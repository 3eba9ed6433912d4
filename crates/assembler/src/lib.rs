//! IPPcode24 assembler: source text ↔ instruction records.
//!
//! The assembler checks lexical and syntactic correctness only. It numbers
//! instructions 1, 2, 3, ... in line order and hands the loader the same
//! record shape a JSON program document would.
//!
//! # Usage
//!
//! ```
//! use ipp_assembler::{assemble, disassemble};
//!
//! let text = ".IPPcode24\nDEFVAR GF@x\nMOVE GF@x int@42\nWRITE GF@x\n";
//! let records = assemble(text).unwrap();
//! let program = ipp_loader::load(&records).unwrap();
//! assert_eq!(disassemble(&program), text);
//! ```
//!
//! # Source format
//!
//! - The first code line must be `.IPPcode24` (case-insensitive).
//! - `#` starts a comment running to the end of the line.
//! - One instruction per line: a mnemonic (case-insensitive) followed by
//!   its operands separated by whitespace.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use ipp_common::{Program, RawProgram};
use lexer::{strip_comment, tokenize_line};
use parser::parse_line;
use tracing::debug;

/// Header line every source file starts with.
pub const HEADER: &str = ".IPPcode24";

/// Assemble source text into instruction records.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<RawProgram, AsmError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, strip_comment(line).trim()))
        .filter(|(_, line)| !line.is_empty());

    match lines.next() {
        Some((_, header)) if header.eq_ignore_ascii_case(HEADER) => {}
        _ => return Err(AsmError::MissingHeader),
    }

    let mut instructions = Vec::new();
    for (line_num, line) in lines {
        let tokens = tokenize_line(line, line_num)?;
        let order = instructions.len() as u32 + 1;
        if let Some(record) = parse_line(&tokens, line_num, order)? {
            instructions.push(record);
        }
    }

    debug!(instructions = instructions.len(), "assembled source");
    Ok(RawProgram::new(instructions))
}

/// Disassemble a loaded program into canonical source text.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}
