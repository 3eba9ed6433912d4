//! Execution counters, readable after every step.

use ipp_common::Opcode;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpcodeCount {
    count: u64,
    lowest_order: u32,
}

/// Counters collected while a program runs.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    executed: u64,
    per_opcode: HashMap<Opcode, OpcodeCount>,
    max_variables: usize,
    max_data_stack: usize,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one executed instruction. LABEL, DPRINT and BREAK are not counted.
    pub fn record(&mut self, opcode: Opcode, order: u32) {
        if matches!(opcode, Opcode::Label | Opcode::DPrint | Opcode::Break) {
            return;
        }
        self.executed += 1;
        self.per_opcode
            .entry(opcode)
            .and_modify(|c| {
                c.count += 1;
                c.lowest_order = c.lowest_order.min(order);
            })
            .or_insert(OpcodeCount {
                count: 1,
                lowest_order: order,
            });
    }

    /// Update the high-water marks.
    pub fn observe(&mut self, live_variables: usize, data_stack: usize) {
        self.max_variables = self.max_variables.max(live_variables);
        self.max_data_stack = self.max_data_stack.max(data_stack);
    }

    /// Number of counted instructions executed.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Times `opcode` was executed.
    pub fn count(&self, opcode: Opcode) -> u64 {
        self.per_opcode.get(&opcode).map_or(0, |c| c.count)
    }

    /// Lowest order of the most executed opcode. Ties go to the opcode whose
    /// lowest order is smaller.
    pub fn hottest_order(&self) -> Option<u32> {
        self.per_opcode
            .values()
            .max_by(|a, b| {
                a.count
                    .cmp(&b.count)
                    .then(b.lowest_order.cmp(&a.lowest_order))
            })
            .map(|c| c.lowest_order)
    }

    /// Highest number of live variables seen.
    pub fn max_variables(&self) -> usize {
        self.max_variables
    }

    /// Deepest data stack seen.
    pub fn max_data_stack(&self) -> usize {
        self.max_data_stack
    }
}
