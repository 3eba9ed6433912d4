//! Signature pass: operand count and operand forms per opcode.
//!
//! Runs before any instruction executes, so execution handlers can rely on
//! every argument being present and of the right form. Literal values and
//! variable syntax are checked here too.

use crate::error::LoadError;
use ipp_common::{Argument, DataType, Instruction, OperandKind, Value, ValueError};
use std::collections::BTreeMap;

/// Type names accepted by READ.
pub const READABLE_TYPES: [&str; 4] = ["int", "float", "bool", "string"];

/// Run the signature pass over all instructions.
pub fn check_signatures(instructions: &BTreeMap<u32, Instruction>) -> Vec<LoadError> {
    let mut errors = Vec::new();

    for instr in instructions.values() {
        let expected = instr.opcode.operands();
        if instr.args.len() != expected.len() {
            errors.push(LoadError::ArityMismatch {
                at: instr.order,
                opcode: instr.opcode,
                expected: expected.len(),
                found: instr.args.len(),
            });
            continue;
        }

        for (arg, &kind) in instr.args.iter().zip(expected) {
            if let Err(e) = check_operand(instr, arg, kind) {
                errors.push(e);
            }
        }
    }

    errors
}

fn check_operand(instr: &Instruction, arg: &Argument, kind: OperandKind) -> Result<(), LoadError> {
    let at = instr.order;
    let mismatch = || LoadError::OperandMismatch {
        at,
        opcode: instr.opcode,
        position: arg.position,
        expected: kind,
        found: arg.data_type,
    };
    let invalid = |source: ValueError| LoadError::InvalidArgument {
        at,
        position: arg.position,
        source,
    };

    match (kind, arg.data_type) {
        (OperandKind::Var | OperandKind::Symb, DataType::Var) => {
            arg.var_ref().map(|_| ()).map_err(invalid)
        }
        (OperandKind::Symb, dt) if dt.is_literal() => {
            Value::from_literal(dt, &arg.raw).map(|_| ()).map_err(invalid)
        }
        (OperandKind::Label, DataType::Label) => {
            if arg.raw.trim().is_empty() {
                Err(LoadError::EmptyLabel { at })
            } else {
                Ok(())
            }
        }
        (OperandKind::Type, DataType::Type) => {
            if READABLE_TYPES.contains(&arg.raw.trim()) {
                Ok(())
            } else {
                Err(LoadError::UnknownTypeName {
                    at,
                    raw: arg.raw.clone(),
                })
            }
        }
        _ => Err(mismatch()),
    }
}
