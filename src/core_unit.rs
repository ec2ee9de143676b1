//! Core: one SRAM1 + one SRAM2 + one MAC array, composed (spec.md §4.1-4.2).
//!
//! Grounded directly on `original_source/core.py`'s `Core`.

use crate::mac_array::MacArray;
use crate::sram1::Sram1;
use crate::sram2::Sram2;

#[derive(Debug)]
pub struct CoreUnit {
    pub sram1: Sram1,
    pub sram2: Sram2,
    pub mac_array: MacArray,

    /// `[row, col]` of the result block currently under calculation.
    pub blocknum_cal: [usize; 2],
}

impl CoreUnit {
    pub fn new(sram1: Sram1, sram2: Sram2, mac_array: MacArray) -> Self {
        CoreUnit {
            sram1,
            sram2,
            mac_array,
            blocknum_cal: [0, 0],
        }
    }

    pub fn sram_ready(&self) -> bool {
        self.sram1.ready() && self.sram2.ready(self.blocknum_cal[1])
    }

    /// SRAM2 has the finer granularity: it advances first, and only tells
    /// SRAM1 to advance when its own subsum cursor bumps.
    pub fn sram_cal_advance(&mut self) {
        if self.sram2.cal_advance(&mut self.blocknum_cal) {
            self.sram1
                .cal_advance(self.blocknum_cal, self.sram2.cal_complete);
        }
    }

    /// Q·Kᵀ variant: the same two-level advance, but SRAM2 walks its
    /// ring-expansion order (spec.md §4.1, §9) instead of row-major order.
    pub fn sram_cal_advance_qk(&mut self) {
        if self.sram2.cal_advance_qk(&mut self.blocknum_cal) {
            self.sram1
                .cal_advance(self.blocknum_cal, self.sram2.cal_complete);
        }
    }

    /// `is_complete` (spec.md §4.1): SRAM1's own `cal_complete` flag is a
    /// near-dead corner of its state machine (it only flips once SRAM2 has
    /// already signalled `sram2_complete` on the final `cal_advance` call,
    /// and the big if/elif chain that could set it has typically already
    /// taken an earlier branch that tick) — SRAM2 exhausting is the
    /// authoritative signal that the whole result matrix has been read.
    pub fn is_complete(&self) -> bool {
        self.sram2.cal_complete
    }

    pub fn reset(&mut self) {
        self.sram1.reset();
        self.sram2.reset();
        self.mac_array.reset();
        self.blocknum_cal = [0, 0];
    }

    pub fn reconfigure(&mut self, block_cnt: usize) {
        self.mac_array.reconfigure(block_cnt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_requires_both_srams_ready() {
        let sram1 = Sram1::new(1, 1, 1, 1);
        let sram2 = Sram2::new(1, 1, 1, 1, 1);
        let mac_array = MacArray::new(1, 1, 1);
        let core = CoreUnit::new(sram1, sram2, mac_array);
        assert!(core.sram_ready());
    }

    #[test]
    fn is_complete_once_sram2_exhausts() {
        let sram1 = Sram1::new(1, 1, 1, 1);
        let sram2 = Sram2::new(1, 1, 1, 1, 1);
        let mac_array = MacArray::new(1, 1, 1);
        let mut core = CoreUnit::new(sram1, sram2, mac_array);
        assert!(!core.is_complete());
        core.sram_cal_advance();
        assert!(core.is_complete());
    }
}
