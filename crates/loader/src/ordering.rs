//! Ordering pass: index instructions by order and reject duplicates.

use crate::error::LoadError;
use ipp_common::Instruction;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Index instructions by order.
///
/// The first instruction with a given order is kept; every later one is
/// reported as a duplicate.
pub fn order_instructions(
    instructions: Vec<Instruction>,
) -> (BTreeMap<u32, Instruction>, Vec<LoadError>) {
    let mut errors = Vec::new();
    let mut ordered = BTreeMap::new();

    for instr in instructions {
        match ordered.entry(instr.order) {
            Entry::Vacant(slot) => {
                slot.insert(instr);
            }
            Entry::Occupied(_) => errors.push(LoadError::DuplicateOrder { order: instr.order }),
        }
    }

    (ordered, errors)
}
