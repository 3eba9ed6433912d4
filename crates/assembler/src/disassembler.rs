//! Disassembler: loaded program → canonical IPPcode24 text.
//!
//! Output is the header followed by one instruction per line in ascending
//! order. No indentation, no comments, no blank lines. Orders are not
//! written; reassembling numbers the lines from 1.

use crate::HEADER;
use ipp_common::value::parse_escape;
use ipp_common::{Argument, ArgumentKind, DataType, Program};

/// Disassemble a program into canonical source text.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for instr in program.iter() {
        out.push_str(instr.opcode.mnemonic());
        for arg in &instr.args {
            out.push(' ');
            out.push_str(&render_argument(arg));
        }
        out.push('\n');
    }

    out
}

fn render_argument(arg: &Argument) -> String {
    match arg.kind() {
        ArgumentKind::Variable | ArgumentKind::Name => arg.raw.trim().to_string(),
        ArgumentKind::Literal => match arg.data_type {
            DataType::Bool => format!("bool@{}", arg.raw == "true"),
            DataType::Nil => "nil@nil".to_string(),
            DataType::String => format!("string@{}", escape_string(&arg.raw)),
            other => format!("{other}@{}", arg.raw.trim()),
        },
    }
}

/// Escape characters that cannot appear inside a source word.
///
/// Backslashes that already start an escape are kept; stray ones become
/// `\092`. Codes above 999 use the `\u{h}` form.
fn escape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.char_indices() {
        let stray_backslash = c == '\\' && parse_escape(&raw[i + 1..]).is_none();
        if !(stray_backslash || c == '#' || c.is_whitespace()) {
            out.push(c);
            continue;
        }
        let code = u32::from(c);
        if code <= 999 {
            out.push_str(&format!("\\{code:03}"));
        } else {
            out.push_str(&format!("\\u{{{code:x}}}"));
        }
    }
    out
}
