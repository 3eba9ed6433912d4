//! IPPcode24 common types.
//!
//! This crate provides the data model shared by the loader, the VM and the
//! assembler:
//!
//! - [`Opcode`] and [`OperandKind`]: the closed instruction set and its operand signatures
//! - [`DataType`]: argument type tags
//! - [`Instruction`] and [`Argument`]: validated instructions
//! - [`Value`]: runtime values with coercion, comparison and output rules
//! - [`VarRef`]: `FRAME@name` variable references
//! - [`RawProgram`]: unvalidated instruction records (serde)
//! - [`Program`]: ordered instructions plus the label table
//! - [`ReturnCode`]: process exit-code taxonomy

pub mod data_type;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod record;
pub mod return_code;
pub mod value;
pub mod variable;

// Re-export commonly used types at the crate root.
pub use data_type::DataType;
pub use error::ValueError;
pub use instruction::{Argument, ArgumentKind, Instruction};
pub use opcode::{Opcode, OperandKind};
pub use program::Program;
pub use record::{RawArgument, RawInstruction, RawProgram};
pub use return_code::ReturnCode;
pub use value::{Value, ValueClass};
pub use variable::{FrameTag, VarRef};
