//! Error types for the IPPcode24 assembler.

use ipp_common::{Opcode, OperandKind, ReturnCode};
use thiserror::Error;

/// Errors produced while translating source text into instruction records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The first code line is not `.IPPcode24`.
    #[error("missing or incorrect .IPPcode24 header")]
    MissingHeader,

    /// A line starts with a word that is not an opcode mnemonic.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// A word is not a variable, literal, type name or label.
    #[error("line {line}: invalid token '{token}'")]
    InvalidToken { line: usize, token: String },

    /// Wrong number of operands for the opcode.
    #[error("line {line}: {opcode} expects {expected} operand(s), found {found}")]
    OperandCount {
        line: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// An operand has the wrong form for its position.
    #[error("line {line}: {opcode} operand {position} expects {expected:?}, found '{token}'")]
    OperandMismatch {
        line: usize,
        opcode: Opcode,
        position: usize,
        expected: OperandKind,
        token: String,
    },
}

impl AsmError {
    /// Exit code for this error.
    pub fn return_code(&self) -> ReturnCode {
        match self {
            AsmError::MissingHeader => ReturnCode::MissingHeader,
            AsmError::UnknownOpcode { .. } => ReturnCode::UnknownOpcode,
            _ => ReturnCode::SourceSyntax,
        }
    }
}
