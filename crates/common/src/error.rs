//! Value-model errors shared by the loader and the VM.

use crate::data_type::DataType;
use crate::value::ValueClass;
use thiserror::Error;

/// Errors raised while coercing literals or checking operand classes.
///
/// These carry no instruction order; callers attach one when they turn a
/// `ValueError` into their own error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// A literal's raw text does not parse as its declared data type.
    #[error("invalid {data_type} literal '{raw}'")]
    InvalidLiteral { data_type: DataType, raw: String },

    /// The data type cannot produce a value (`type`, `label`, `var`).
    #[error("data type {0} does not denote a value")]
    NotAValue(DataType),

    /// Operands of a comparison belong to incompatible classes.
    #[error("cannot compare {left} with {right}")]
    ClassMismatch { left: ValueClass, right: ValueClass },

    /// `nil` used in an ordering comparison.
    #[error("nil cannot be ordered")]
    NilOrdering,

    /// A variable reference is not of the form `GF@name`, `TF@name` or `LF@name`.
    #[error("malformed variable reference '{0}'")]
    MalformedVariable(String),
}
