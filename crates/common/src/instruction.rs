//! Validated instructions and their arguments.
//!
//! These are produced by the loader and are immutable afterwards.

use crate::data_type::DataType;
use crate::error::ValueError;
use crate::opcode::Opcode;
use crate::value::Value;
use crate::variable::VarRef;

/// A single instruction argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// 1-based slot index.
    pub position: usize,
    /// Declared data type.
    pub data_type: DataType,
    /// Text exactly as supplied.
    pub raw: String,
}

/// How an argument is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    Variable,
    Literal,
    /// `label` or `type` operand.
    Name,
}

impl Argument {
    /// Create a new argument.
    pub fn new(position: usize, data_type: DataType, raw: impl Into<String>) -> Self {
        Self {
            position,
            data_type,
            raw: raw.into(),
        }
    }

    /// Returns how this argument is interpreted.
    pub fn kind(&self) -> ArgumentKind {
        match self.data_type {
            DataType::Var => ArgumentKind::Variable,
            DataType::Label | DataType::Type => ArgumentKind::Name,
            _ => ArgumentKind::Literal,
        }
    }

    /// Parse this argument as a variable reference.
    pub fn var_ref(&self) -> Result<VarRef, ValueError> {
        VarRef::parse(&self.raw)
    }

    /// Coerce this argument as a literal value.
    pub fn literal(&self) -> Result<Value, ValueError> {
        Value::from_literal(self.data_type, &self.raw)
    }
}

/// A loaded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Unique positive order defining the instruction's place in the sequence.
    pub order: u32,
    pub opcode: Opcode,
    /// Arguments sorted by position, contiguous from 1.
    pub args: Vec<Argument>,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(order: u32, opcode: Opcode, args: Vec<Argument>) -> Self {
        Self {
            order,
            opcode,
            args,
        }
    }

    /// Argument at a 1-based position.
    pub fn arg(&self, position: usize) -> Option<&Argument> {
        position.checked_sub(1).and_then(|i| self.args.get(i))
    }
}
