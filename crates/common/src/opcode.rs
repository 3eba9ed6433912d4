//! Opcode definitions for the IPPcode24 instruction set.
//!
//! The set is closed: the loader turns opcode text into an [`Opcode`] once,
//! so execution dispatch is an exhaustive `match` with no unknown case.

use std::fmt;

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    // Frames and calls
    /// Copy a value into a variable.
    Move,
    /// Replace the temporary frame with an empty one.
    CreateFrame,
    /// Move the temporary frame onto the local-frame stack.
    PushFrame,
    /// Move the top local frame back into the temporary frame.
    PopFrame,
    /// Declare an uninitialized variable.
    DefVar,
    /// Push the return address and jump to a label.
    Call,
    /// Pop a return address and jump to it.
    Return,

    // Data stack
    /// Push a value onto the data stack.
    PushS,
    /// Pop the data stack into a variable.
    PopS,

    // Arithmetic, relational, boolean and conversion
    Add,
    Sub,
    Mul,
    /// Integer division truncating toward zero.
    IDiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,
    /// Integer to single-character string.
    Int2Char,
    /// Code point of the character at an index.
    Stri2Int,
    Int2Float,
    Float2Int,

    // Input and output
    Read,
    Write,

    // Strings
    Concat,
    StrLen,
    GetChar,
    SetChar,

    // Types
    /// Name of a value's type, or the empty string for an unset variable.
    Type,

    // Control flow
    /// Jump target; a no-op at execution time.
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    /// Terminate with a program-chosen status.
    Exit,

    // Debugging
    /// Write a value to the diagnostic stream.
    DPrint,
    /// Dump engine state to the diagnostic stream.
    Break,
}

/// The operand form an opcode expects at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// A variable reference (destination or in-place operand).
    Var,
    /// A literal or a variable, resolved to a value before use.
    Symb,
    /// A label name.
    Label,
    /// A type name (`int`, `float`, `bool`, `string`).
    Type,
}

/// All opcodes, in definition order.
pub const ALL_OPCODES: [Opcode; 37] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::PushS,
    Opcode::PopS,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::IDiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Int2Float,
    Opcode::Float2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::StrLen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::Exit,
    Opcode::DPrint,
    Opcode::Break,
];

use OperandKind::{Label as L, Symb as S, Type as T, Var as V};

impl Opcode {
    /// Returns the canonical (uppercase) mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::PushS => "PUSHS",
            Opcode::PopS => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::IDiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Int2Float => "INT2FLOAT",
            Opcode::Float2Int => "FLOAT2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::StrLen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::Exit => "EXIT",
            Opcode::DPrint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Look up an opcode by mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(text: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(text))
            .copied()
    }

    /// Operand forms this opcode takes, in argument order.
    pub fn operands(&self) -> &'static [OperandKind] {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],

            Opcode::DefVar | Opcode::PopS => &[V],
            Opcode::Call | Opcode::Label | Opcode::Jump => &[L],
            Opcode::PushS | Opcode::Write | Opcode::Exit | Opcode::DPrint => &[S],

            Opcode::Move
            | Opcode::Not
            | Opcode::Int2Char
            | Opcode::Int2Float
            | Opcode::Float2Int
            | Opcode::StrLen
            | Opcode::Type => &[V, S],

            Opcode::Read => &[V, T],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::IDiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[V, S, S],

            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[L, S, S],
        }
    }

    /// Number of arguments this opcode takes.
    pub fn arity(&self) -> usize {
        self.operands().len()
    }

    /// Returns true if this opcode changes the instruction pointer itself.
    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            Opcode::Call
                | Opcode::Return
                | Opcode::Jump
                | Opcode::JumpIfEq
                | Opcode::JumpIfNeq
                | Opcode::Exit
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
