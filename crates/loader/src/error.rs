//! Load errors for the IPPcode24 loader.
//!
//! Every error names the instruction it concerns: by `order` once the order
//! is known, otherwise by `index` (position in arrival order, 0-based).
//! The loader collects ALL errors, not just the first.

use ipp_common::{DataType, Opcode, OperandKind, ReturnCode, ValueError};
use thiserror::Error;

/// Errors found while loading a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    // --- Document shape ---
    /// The document declares a language other than IPPcode24.
    #[error("unsupported language '{found}'")]
    LanguageMismatch { found: String },

    /// A non-instruction element appears in the instruction list.
    #[error("unexpected element '{element}' at index {index}")]
    UnexpectedElement { index: usize, element: String },

    /// Instruction has no order.
    #[error("instruction at index {index} has no order")]
    MissingOrder { index: usize },

    /// Order is not a positive integer.
    #[error("instruction at index {index} has invalid order '{raw}'")]
    InvalidOrder { index: usize, raw: String },

    /// Two instructions share an order.
    #[error("duplicate order {order}")]
    DuplicateOrder { order: u32 },

    /// Opcode missing or empty.
    #[error("instruction {at} has no opcode")]
    MissingOpcode { at: u32 },

    /// Opcode text names no known operation.
    #[error("instruction {at}: unknown opcode '{opcode}'")]
    UnknownOpcode { at: u32, opcode: String },

    // --- Arguments ---
    /// Argument element is not `argN` with N a positive integer.
    #[error("instruction {at}: malformed argument element '{element}'")]
    MalformedArgumentName { at: u32, element: String },

    /// Argument lacks a data-type tag, or it is empty.
    #[error("instruction {at}: argument {position} has no data type")]
    MissingDataType { at: u32, position: usize },

    /// Argument data-type tag is not recognized.
    #[error("instruction {at}: argument {position} has unknown data type '{tag}'")]
    UnknownDataType {
        at: u32,
        position: usize,
        tag: String,
    },

    /// The same argument position appears twice.
    #[error("instruction {at}: duplicate argument {position}")]
    DuplicateArgument { at: u32, position: usize },

    /// Argument positions skip a slot.
    #[error("instruction {at}: argument {missing} is missing")]
    ArgumentGap { at: u32, missing: usize },

    // --- Signatures ---
    /// Wrong number of arguments for the opcode.
    #[error("instruction {at}: {opcode} expects {expected} argument(s), found {found}")]
    ArityMismatch {
        at: u32,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// Argument form does not fit the opcode's operand slot.
    #[error("instruction {at}: {opcode} argument {position} expects {expected:?}, found {found}")]
    OperandMismatch {
        at: u32,
        opcode: Opcode,
        position: usize,
        expected: OperandKind,
        found: DataType,
    },

    /// A literal or variable argument does not parse.
    #[error("instruction {at}: argument {position}: {source}")]
    InvalidArgument {
        at: u32,
        position: usize,
        source: ValueError,
    },

    /// A `type` operand names no readable type.
    #[error("instruction {at}: unknown type name '{raw}'")]
    UnknownTypeName { at: u32, raw: String },

    /// A `label` operand is empty.
    #[error("instruction {at}: empty label")]
    EmptyLabel { at: u32 },

    // --- Labels ---
    /// The same label is defined twice.
    #[error("label '{label}' defined at {first} is redefined at {at}")]
    DuplicateLabel { label: String, first: u32, at: u32 },
}

impl LoadError {
    /// Exit code for this error.
    pub fn return_code(&self) -> ReturnCode {
        match self {
            LoadError::DuplicateLabel { .. } => ReturnCode::Semantic,
            _ => ReturnCode::InvalidStructure,
        }
    }
}
