//! VM state: frames, call stack, data stack, instruction pointer, streams.

use crate::error::RuntimeError;
use crate::frames::{FrameError, FrameStore};
use crate::io::{InputReader, OutputWriter};
use crate::stats::Stats;
use ipp_common::{Argument, ArgumentKind, Instruction, Program, Value, VarRef};

/// The three streams a running program talks to.
pub struct Streams<'io> {
    pub input: &'io mut dyn InputReader,
    pub output: &'io mut dyn OutputWriter,
    /// Target of DPRINT and BREAK.
    pub diagnostic: &'io mut dyn OutputWriter,
}

/// How a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Execution ran past the last instruction.
    Completed,
    /// EXIT with the given status.
    Exit(u8),
}

impl Termination {
    /// Process exit status.
    pub fn code(self) -> i32 {
        match self {
            Termination::Completed => 0,
            Termination::Exit(code) => i32::from(code),
        }
    }
}

/// The IPPcode24 virtual machine.
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) frames: FrameStore,
    /// Return targets. `None` means the CALL was the last instruction.
    pub(crate) call_stack: Vec<Option<u32>>,
    pub(crate) data_stack: Vec<Value>,
    /// Order of the next instruction; `None` once execution ran off the end.
    pub(crate) pointer: Option<u32>,
    /// Set by handlers that move the pointer themselves.
    pub(crate) jumped: bool,
    pub(crate) stats: Stats,
    pub(crate) streams: Streams<'a>,
}

impl<'a> VM<'a> {
    /// Create a VM positioned at the program's lowest order.
    pub fn new(program: &'a Program, streams: Streams<'a>) -> Self {
        Self {
            program,
            frames: FrameStore::new(),
            call_stack: Vec::new(),
            data_stack: Vec::new(),
            pointer: program.first_order(),
            jumped: false,
            stats: Stats::new(),
            streams,
        }
    }

    /// Counters collected so far.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn data_stack(&self) -> &[Value] {
        &self.data_stack
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Order of the instruction that runs next.
    pub fn pointer(&self) -> Option<u32> {
        self.pointer
    }

    /// Move the pointer and suppress the automatic advance.
    pub(crate) fn jump_to(&mut self, target: Option<u32>) {
        self.pointer = target;
        self.jumped = true;
    }

    pub(crate) fn arg<'i>(
        &self,
        instr: &'i Instruction,
        position: usize,
    ) -> Result<&'i Argument, RuntimeError> {
        instr.arg(position).ok_or(RuntimeError::MalformedArgument {
            at: instr.order,
            position,
        })
    }

    /// Parse the variable operand at `position`.
    pub(crate) fn var(&self, instr: &Instruction, position: usize) -> Result<VarRef, RuntimeError> {
        let arg = self.arg(instr, position)?;
        if arg.kind() != ArgumentKind::Variable {
            return Err(RuntimeError::MalformedArgument {
                at: instr.order,
                position,
            });
        }
        arg.var_ref().map_err(|source| RuntimeError::InvalidLiteral {
            at: instr.order,
            source,
        })
    }

    /// Raw text of a label or type operand.
    pub(crate) fn name<'i>(
        &self,
        instr: &'i Instruction,
        position: usize,
    ) -> Result<&'i str, RuntimeError> {
        let arg = self.arg(instr, position)?;
        match arg.kind() {
            ArgumentKind::Name => Ok(arg.raw.trim()),
            _ => Err(RuntimeError::MalformedArgument {
                at: instr.order,
                position,
            }),
        }
    }

    /// Value of a symbol operand: a coerced literal or a variable read.
    pub(crate) fn determine_value(
        &self,
        instr: &Instruction,
        position: usize,
    ) -> Result<Value, RuntimeError> {
        let arg = self.arg(instr, position)?;
        match arg.kind() {
            ArgumentKind::Variable => {
                let var = self.var(instr, position)?;
                self.frames
                    .read(&var)
                    .cloned()
                    .map_err(|source| frame_error(instr, source))
            }
            ArgumentKind::Literal => arg.literal().map_err(|source| RuntimeError::InvalidLiteral {
                at: instr.order,
                source,
            }),
            ArgumentKind::Name => Err(RuntimeError::MalformedArgument {
                at: instr.order,
                position,
            }),
        }
    }

    /// Store `value` into the variable operand at position 1.
    pub(crate) fn store(&mut self, instr: &Instruction, value: Value) -> Result<(), RuntimeError> {
        let var = self.var(instr, 1)?;
        self.frames
            .write(&var, value)
            .map_err(|source| frame_error(instr, source))
    }

    /// Resolve a label operand to its order.
    pub(crate) fn label_target(
        &self,
        instr: &Instruction,
        position: usize,
    ) -> Result<u32, RuntimeError> {
        let label = self.name(instr, position)?;
        self.program
            .label(label)
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                at: instr.order,
                label: label.to_string(),
            })
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.data_stack.push(value);
    }

    pub(crate) fn pop(&mut self, at: u32) -> Result<Value, RuntimeError> {
        self.data_stack
            .pop()
            .ok_or(RuntimeError::EmptyDataStack { at })
    }
}

pub(crate) fn frame_error(instr: &Instruction, source: FrameError) -> RuntimeError {
    RuntimeError::Frame {
        at: instr.order,
        source,
    }
}
