//! Label pass: build the label table from the full instruction sequence.
//!
//! Runs once before execution, over every instruction, so forward references
//! resolve.

use crate::error::LoadError;
use ipp_common::{Instruction, Opcode};
use std::collections::{BTreeMap, HashMap};

/// Collect `LABEL` definitions into a name → order table.
///
/// A redefinition is reported wherever it occurs; the first definition wins.
pub fn build_label_table(
    instructions: &BTreeMap<u32, Instruction>,
) -> (HashMap<String, u32>, Vec<LoadError>) {
    let mut errors = Vec::new();
    let mut labels: HashMap<String, u32> = HashMap::new();

    for instr in instructions.values() {
        if instr.opcode != Opcode::Label {
            continue;
        }
        let Some(name) = instr.arg(1).map(|a| a.raw.trim()) else {
            continue;
        };

        match labels.get(name) {
            Some(&first) => errors.push(LoadError::DuplicateLabel {
                label: name.to_string(),
                first,
                at: instr.order,
            }),
            None => {
                labels.insert(name.to_string(), instr.order);
            }
        }
    }

    (labels, errors)
}
