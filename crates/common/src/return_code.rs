//! Process exit codes.
//!
//! Each fatal error kind maps to exactly one code. Only the CLI turns a code
//! into a process exit; library crates return typed errors.

/// Exit status taxonomy.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    Ok = 0,
    /// Missing or conflicting command-line parameters.
    Parameter = 10,
    /// An input file could not be opened or read.
    InputFile = 11,
    /// An output file could not be written.
    OutputFile = 12,
    /// Source text lacks the `.IPPcode24` header.
    MissingHeader = 21,
    /// Source text names an opcode that does not exist.
    UnknownOpcode = 22,
    /// Lexical or syntax error in source text.
    SourceSyntax = 23,
    /// The program document is not well-formed.
    MalformedDocument = 31,
    /// Malformed instruction or argument shape.
    InvalidStructure = 32,
    Semantic = 52,
    OperandType = 53,
    VariableAccess = 54,
    FrameAccess = 55,
    MissingValue = 56,
    OperandValue = 57,
    StringOperation = 58,
    Internal = 99,
}

impl ReturnCode {
    /// Numeric process exit status.
    pub fn code(self) -> i32 {
        self as i32
    }
}
