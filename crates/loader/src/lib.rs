//! IPPcode24 loader: validates raw instruction records into a [`Program`].
//!
//! The loader checks a document for well-formedness before execution. It
//! collects every error (not just the first) and returns them; execution
//! never starts on a program that failed to load.
//!
//! # Usage
//!
//! ```
//! use ipp_common::{RawArgument, RawInstruction, RawProgram};
//! use ipp_loader::load;
//!
//! let raw = RawProgram::new(vec![
//!     RawInstruction::new(2, "WRITE", vec![RawArgument::new(1, "string", "world")]),
//!     RawInstruction::new(1, "WRITE", vec![RawArgument::new(1, "string", "hello")]),
//! ]);
//!
//! let program = load(&raw).unwrap();
//! assert_eq!(program.first_order(), Some(1));
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: element names, orders, opcodes, argument shape
//! 2. **Ordering**: index by order, reject duplicate orders
//! 3. **Signature**: operand count and forms, literal and variable syntax
//! 4. **Labels**: label table, reject duplicate labels

pub mod error;
pub mod labels;
pub mod ordering;
pub mod signature;
pub mod structural;

pub use error::LoadError;

use ipp_common::{Program, RawProgram};
use tracing::debug;

/// Load a program document.
///
/// Returns the validated [`Program`], or every [`LoadError`] found. Errors are
/// reported in pass order, so structural errors come before label errors.
pub fn load(raw: &RawProgram) -> Result<Program, Vec<LoadError>> {
    let mut all_errors = Vec::new();

    // Pass 1: Structural
    let (instructions, structural_errors) = structural::check_structural(raw);
    all_errors.extend(structural_errors);

    // Pass 2: Ordering
    let (ordered, ordering_errors) = ordering::order_instructions(instructions);
    all_errors.extend(ordering_errors);

    // Pass 3: Signature
    all_errors.extend(signature::check_signatures(&ordered));

    // Pass 4: Labels
    let (labels, label_errors) = labels::build_label_table(&ordered);
    all_errors.extend(label_errors);

    debug!(
        instructions = ordered.len(),
        labels = labels.len(),
        errors = all_errors.len(),
        "program loaded"
    );

    if all_errors.is_empty() {
        Ok(Program::new(ordered, labels))
    } else {
        Err(all_errors)
    }
}
