//! A loaded program: instructions indexed by order, plus the label table.
//!
//! Orders need not be contiguous. Sequential execution moves to the next
//! existing order, never to `order + 1`.

use crate::instruction::Instruction;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::{Excluded, Unbounded};

/// A validated program ready for execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: BTreeMap<u32, Instruction>,
    labels: HashMap<String, u32>,
}

impl Program {
    /// Assemble a program from already validated parts.
    ///
    /// Each instruction is keyed by its own order; every label must name an
    /// existing order. The loader is the only producer that checks this.
    pub fn new(instructions: BTreeMap<u32, Instruction>, labels: HashMap<String, u32>) -> Self {
        Self {
            instructions,
            labels,
        }
    }

    /// Lowest existing order.
    pub fn first_order(&self) -> Option<u32> {
        self.instructions.keys().next().copied()
    }

    /// Next existing order strictly after `order`.
    pub fn next_order(&self, order: u32) -> Option<u32> {
        self.instructions
            .range((Excluded(order), Unbounded))
            .next()
            .map(|(&o, _)| o)
    }

    /// Instruction at an exact order.
    pub fn get(&self, order: u32) -> Option<&Instruction> {
        self.instructions.get(&order)
    }

    /// Target order of a label.
    pub fn label(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    /// Label table.
    pub fn labels(&self) -> &HashMap<String, u32> {
        &self.labels
    }

    /// Instructions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.values()
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
