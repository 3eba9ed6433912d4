//! Argument data-type tags.
//!
//! Every argument of an instruction carries one of these tags. Five of them
//! describe literal values, `var` marks a variable reference, and `label` /
//! `type` mark the two non-value operand forms.

use std::fmt;

/// The declared type of an instruction argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Bool,
    String,
    Nil,
    /// Type name operand of READ (`int`, `float`, `bool`, `string`).
    Type,
    /// Jump target operand.
    Label,
    /// Variable reference `FRAME@name`.
    Var,
}

/// All data types, in definition order.
pub const ALL_DATA_TYPES: [DataType; 8] = [
    DataType::Int,
    DataType::Float,
    DataType::Bool,
    DataType::String,
    DataType::Nil,
    DataType::Type,
    DataType::Label,
    DataType::Var,
];

impl DataType {
    /// Returns the tag as written in program documents.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Bool => "bool",
            DataType::String => "string",
            DataType::Nil => "nil",
            DataType::Type => "type",
            DataType::Label => "label",
            DataType::Var => "var",
        }
    }

    /// Look up a tag by its document name. Matching is exact.
    pub fn from_name(name: &str) -> Option<DataType> {
        ALL_DATA_TYPES.iter().find(|dt| dt.name() == name).copied()
    }

    /// Returns true for the tags that denote a literal value.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            DataType::Int | DataType::Float | DataType::Bool | DataType::String | DataType::Nil
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
