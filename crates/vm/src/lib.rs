//! IPPcode24 virtual machine: executes loaded programs.
//!
//! The VM is a frame-based machine with:
//! - A frame store (global frame, optional temporary frame, local-frame stack)
//! - A call stack of return targets
//! - A data stack for PUSHS/POPS
//! - An instruction pointer over the program's order values
//!
//! # Usage
//!
//! ```
//! use ipp_common::{Argument, DataType, Instruction, Opcode, Program};
//! use ipp_vm::io::{LineReader, StreamWriter};
//! use ipp_vm::{run, Streams, Termination};
//! use std::collections::{BTreeMap, HashMap};
//!
//! let mut instructions = BTreeMap::new();
//! instructions.insert(
//!     1,
//!     Instruction::new(1, Opcode::Write, vec![Argument::new(1, DataType::String, "hi")]),
//! );
//! let program = Program::new(instructions, HashMap::new());
//!
//! let mut input = LineReader::new(std::io::empty());
//! let mut output = StreamWriter::new(Vec::new());
//! let mut diagnostic = StreamWriter::new(Vec::new());
//! let streams = Streams {
//!     input: &mut input,
//!     output: &mut output,
//!     diagnostic: &mut diagnostic,
//! };
//!
//! assert_eq!(run(&program, streams).unwrap(), Termination::Completed);
//! assert_eq!(output.into_inner(), b"hi".to_vec());
//! ```

pub mod error;
pub mod execute;
pub mod frames;
pub mod io;
pub mod machine;
pub mod stats;

pub use error::RuntimeError;
pub use frames::{FrameError, FrameHandle, FrameStore};
pub use machine::{Streams, Termination, VM};
pub use stats::Stats;

use ipp_common::Program;

/// Execute a program to completion.
///
/// # Errors
///
/// Returns [`RuntimeError`] on the first fatal condition (operand types,
/// frame access, string bounds, etc.). Everything written before the error
/// stays written.
pub fn run<'a>(program: &'a Program, streams: Streams<'a>) -> Result<Termination, RuntimeError> {
    let mut vm = VM::new(program, streams);
    vm.execute()
}
