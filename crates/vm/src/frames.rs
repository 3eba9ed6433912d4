//! Frame store: the global frame, the optional temporary frame and the
//! local-frame stack.
//!
//! Variables are looked up through a [`FrameHandle`] that names which frame
//! holds them, so no reference into a frame outlives a single access. A
//! declared variable that was never assigned holds `None`.

use ipp_common::{FrameTag, ReturnCode, Value, VarRef};
use std::collections::HashMap;
use thiserror::Error;

/// One frame: variable name to value, `None` while uninitialized.
pub type Frame = HashMap<String, Option<Value>>;

/// Frame and variable access failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame {0} does not exist")]
    UndefinedFrame(FrameTag),

    #[error("POPFRAME with empty local-frame stack")]
    EmptyFrameStack,

    #[error("variable {0} is not declared")]
    Undeclared(VarRef),

    #[error("variable {0} is already declared")]
    Redeclared(VarRef),

    #[error("variable {0} is uninitialized")]
    Uninitialized(VarRef),
}

impl FrameError {
    /// Exit code for this error.
    pub fn return_code(&self) -> ReturnCode {
        match self {
            FrameError::UndefinedFrame(_) | FrameError::EmptyFrameStack => ReturnCode::FrameAccess,
            FrameError::Undeclared(_) | FrameError::Uninitialized(_) => ReturnCode::VariableAccess,
            FrameError::Redeclared(_) => ReturnCode::Semantic,
        }
    }
}

/// Identifies the frame a variable lives in at the time of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHandle {
    Global,
    Temporary,
    /// Index into the local-frame stack.
    Local(usize),
}

/// All variable storage of a running program.
#[derive(Debug, Default)]
pub struct FrameStore {
    global: Frame,
    temporary: Option<Frame>,
    locals: Vec<Frame>,
}

impl FrameStore {
    /// Create a store with an empty GF, no TF and no local frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a frame tag against the current state.
    pub fn resolve(&self, tag: FrameTag) -> Result<FrameHandle, FrameError> {
        match tag {
            FrameTag::Global => Ok(FrameHandle::Global),
            FrameTag::Temporary if self.temporary.is_some() => Ok(FrameHandle::Temporary),
            FrameTag::Local if !self.locals.is_empty() => {
                Ok(FrameHandle::Local(self.locals.len() - 1))
            }
            _ => Err(FrameError::UndefinedFrame(tag)),
        }
    }

    fn frame(&self, handle: FrameHandle) -> Option<&Frame> {
        match handle {
            FrameHandle::Global => Some(&self.global),
            FrameHandle::Temporary => self.temporary.as_ref(),
            FrameHandle::Local(i) => self.locals.get(i),
        }
    }

    fn frame_mut(&mut self, handle: FrameHandle) -> Option<&mut Frame> {
        match handle {
            FrameHandle::Global => Some(&mut self.global),
            FrameHandle::Temporary => self.temporary.as_mut(),
            FrameHandle::Local(i) => self.locals.get_mut(i),
        }
    }

    fn resolved(&self, var: &VarRef) -> Result<&Frame, FrameError> {
        let handle = self.resolve(var.frame)?;
        self.frame(handle)
            .ok_or(FrameError::UndefinedFrame(var.frame))
    }

    fn resolved_mut(&mut self, var: &VarRef) -> Result<&mut Frame, FrameError> {
        let handle = self.resolve(var.frame)?;
        self.frame_mut(handle)
            .ok_or(FrameError::UndefinedFrame(var.frame))
    }

    /// Declare `var` as uninitialized. Fails if the name exists in that frame.
    pub fn declare(&mut self, var: &VarRef) -> Result<(), FrameError> {
        let frame = self.resolved_mut(var)?;
        if frame.contains_key(&var.name) {
            return Err(FrameError::Redeclared(var.clone()));
        }
        frame.insert(var.name.clone(), None);
        Ok(())
    }

    /// Current slot of `var`: `None` if declared but never assigned.
    pub fn slot(&self, var: &VarRef) -> Result<Option<&Value>, FrameError> {
        self.resolved(var)?
            .get(&var.name)
            .map(Option::as_ref)
            .ok_or_else(|| FrameError::Undeclared(var.clone()))
    }

    /// Read the value of `var`. Uninitialized reads fail.
    pub fn read(&self, var: &VarRef) -> Result<&Value, FrameError> {
        self.slot(var)?
            .ok_or_else(|| FrameError::Uninitialized(var.clone()))
    }

    /// Overwrite the value of an already declared `var`.
    pub fn write(&mut self, var: &VarRef, value: Value) -> Result<(), FrameError> {
        let slot = self
            .resolved_mut(var)?
            .get_mut(&var.name)
            .ok_or_else(|| FrameError::Undeclared(var.clone()))?;
        *slot = Some(value);
        Ok(())
    }

    /// CREATEFRAME: replace TF with an empty frame.
    pub fn create_temp(&mut self) {
        self.temporary = Some(Frame::new());
    }

    /// PUSHFRAME: move TF onto the local-frame stack, leaving TF undefined.
    pub fn push_temp(&mut self) -> Result<(), FrameError> {
        let frame = self
            .temporary
            .take()
            .ok_or(FrameError::UndefinedFrame(FrameTag::Temporary))?;
        self.locals.push(frame);
        Ok(())
    }

    /// POPFRAME: move the top local frame into TF.
    pub fn pop_temp(&mut self) -> Result<(), FrameError> {
        let frame = self.locals.pop().ok_or(FrameError::EmptyFrameStack)?;
        self.temporary = Some(frame);
        Ok(())
    }

    /// Number of variables across GF, TF and every local frame.
    pub fn live_variable_count(&self) -> usize {
        self.global.len()
            + self.temporary.as_ref().map_or(0, HashMap::len)
            + self.locals.iter().map(HashMap::len).sum::<usize>()
    }

    pub fn global(&self) -> &Frame {
        &self.global
    }

    pub fn temporary(&self) -> Option<&Frame> {
        self.temporary.as_ref()
    }

    /// Local frames, bottom first.
    pub fn locals(&self) -> &[Frame] {
        &self.locals
    }
}
