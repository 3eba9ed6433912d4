//! Runtime errors for the IPPcode24 VM.
//!
//! Every error includes the order of the instruction being executed (`at`).
//! All of them are fatal: execution stops at the point of violation and
//! nothing already applied is rolled back.

use crate::frames::FrameError;
use ipp_common::{Opcode, ReturnCode, ValueError};
use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An argument is missing or has the wrong form. The loader rejects such
    /// programs, so this only arises for hand-built instructions.
    #[error("malformed argument {position} at instruction {at}")]
    MalformedArgument { at: u32, position: usize },

    /// A literal does not coerce to its declared type.
    #[error("instruction {at}: {source}")]
    InvalidLiteral { at: u32, source: ValueError },

    /// CALL or a jump names a label that is not defined.
    #[error("undefined label '{label}' at instruction {at}")]
    UndefinedLabel { at: u32, label: String },

    /// Operand classes do not satisfy the operator's preconditions.
    #[error("wrong operand types for {opcode} at instruction {at}")]
    OperandType { at: u32, opcode: Opcode },

    /// IDIV by zero.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: u32 },

    /// EXIT status outside 0..=9.
    #[error("exit code {code} out of range at instruction {at}")]
    InvalidExitCode { at: u32, code: i64 },

    /// FLOAT2INT of a value with no integer counterpart.
    #[error("float {value} has no integer value at instruction {at}")]
    FloatNotIntegral { at: u32, value: String },

    /// Frame or variable access failure.
    #[error("instruction {at}: {source}")]
    Frame { at: u32, source: FrameError },

    /// RETURN with an empty call stack.
    #[error("RETURN with empty call stack at instruction {at}")]
    EmptyCallStack { at: u32 },

    /// POPS with an empty data stack.
    #[error("POPS with empty data stack at instruction {at}")]
    EmptyDataStack { at: u32 },

    /// String index outside `[0, length)`.
    #[error("index {index} out of range (length {length}) at instruction {at}")]
    StringIndex { at: u32, index: i64, length: usize },

    /// INT2CHAR argument is not a Unicode scalar value.
    #[error("invalid code point {value} at instruction {at}")]
    InvalidCodePoint { at: u32, value: i64 },

    /// SETCHAR with an empty replacement string.
    #[error("SETCHAR with empty replacement at instruction {at}")]
    EmptyReplacement { at: u32 },

    /// Writing to an output stream failed.
    #[error("output failed at instruction {at}: {message}")]
    Output { at: u32, message: String },
}

impl RuntimeError {
    /// Exit code for this error.
    pub fn return_code(&self) -> ReturnCode {
        match self {
            RuntimeError::MalformedArgument { .. } | RuntimeError::InvalidLiteral { .. } => {
                ReturnCode::InvalidStructure
            }
            RuntimeError::UndefinedLabel { .. } => ReturnCode::Semantic,
            RuntimeError::OperandType { .. } => ReturnCode::OperandType,
            RuntimeError::DivisionByZero { .. }
            | RuntimeError::InvalidExitCode { .. }
            | RuntimeError::FloatNotIntegral { .. } => ReturnCode::OperandValue,
            RuntimeError::Frame { source, .. } => source.return_code(),
            RuntimeError::EmptyCallStack { .. } | RuntimeError::EmptyDataStack { .. } => {
                ReturnCode::MissingValue
            }
            RuntimeError::StringIndex { .. }
            | RuntimeError::InvalidCodePoint { .. }
            | RuntimeError::EmptyReplacement { .. } => ReturnCode::StringOperation,
            RuntimeError::Output { .. } => ReturnCode::Internal,
        }
    }
}
