//! Variable references (`GF@name`, `TF@name`, `LF@name`).

use crate::error::ValueError;
use std::fmt;

/// Which frame role a variable reference names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTag {
    /// `GF`: the global frame.
    Global,
    /// `TF`: the temporary frame.
    Temporary,
    /// `LF`: the top of the local-frame stack.
    Local,
}

impl FrameTag {
    /// Returns the two-letter prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameTag::Global => "GF",
            FrameTag::Temporary => "TF",
            FrameTag::Local => "LF",
        }
    }

    /// Parse a two-letter prefix. Matching is exact.
    pub fn from_prefix(prefix: &str) -> Option<FrameTag> {
        match prefix {
            "GF" => Some(FrameTag::Global),
            "TF" => Some(FrameTag::Temporary),
            "LF" => Some(FrameTag::Local),
            _ => None,
        }
    }
}

impl fmt::Display for FrameTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A parsed `FRAME@name` reference.
///
/// References are resolved against the frame store on every access; nothing
/// is cached between accesses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub frame: FrameTag,
    pub name: String,
}

impl VarRef {
    /// Parse `GF@x`. The name must be non-empty.
    pub fn parse(raw: &str) -> Result<VarRef, ValueError> {
        let malformed = || ValueError::MalformedVariable(raw.to_string());
        let (prefix, name) = raw.trim().split_once('@').ok_or_else(malformed)?;
        let frame = FrameTag::from_prefix(prefix).ok_or_else(malformed)?;
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(malformed());
        }
        Ok(VarRef {
            frame,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame, self.name)
    }
}
