//! Softmax unit: a row-granular state machine with a single latency timer
//! and at most one row in flight (spec.md §4.4).
//!
//! Grounded on `original_source/softmax.py`'s `Softmax`, which inherits
//! `BaseUnit`'s `latency_count`/`latency_counter` pair, re-expressed with
//! `SfuTag` (spec.md §9) in place of the source's `NULL`/`A`/`A_SOFTMAX`
//! integers. `tick` mirrors the source's module-level `softmax_cal` driver.

use crate::tags::SfuTag;

#[derive(Debug)]
pub struct Softmax {
    state: Vec<SfuTag>,
    blocknum_col: usize,

    latency_count: u64,
    latency_counter: u64,

    /// Buffer full / calculating / not yet drained back to the global
    /// buffer: while true, GB->Softmax transfer is forbidden.
    pub busy: bool,
    /// This row has finished its softmax calculation.
    pub done: bool,
}

impl Softmax {
    pub fn new(blocknum_col: usize, latency_count: u64) -> Self {
        Softmax {
            state: vec![SfuTag::Null; blocknum_col],
            blocknum_col,
            latency_count,
            latency_counter: 0,
            busy: false,
            done: false,
        }
    }

    pub fn blocknum_col(&self) -> usize {
        self.blocknum_col
    }

    /// `softmax_cal` (`original_source/main.py`): ticks the latency counter
    /// while a full row is ready, flipping to `Done` once `latency_count`
    /// ticks have elapsed. Returns whether this tick completed the row.
    pub fn tick(&mut self) -> bool {
        if self.calculation() {
            self.latency_counter += 1;
            if self.latency_counter == self.latency_count {
                self.latency_counter = 0;
                self.update_to_asoftmax();
                return true;
            }
        }
        false
    }

    /// Marks `[start, end]` as delivered-and-awaiting-calculation; once the
    /// whole row has arrived, the unit goes busy.
    pub fn update_to_a(&mut self, start: usize, end: usize) {
        for i in start..=end {
            self.state[i] = SfuTag::DataReady;
        }
        if end + 1 == self.blocknum_col {
            self.busy = true;
        }
    }

    /// Marks `[start, end]` drained back out; once the whole row has left,
    /// the unit is free for the next row.
    pub fn update_to_null(&mut self, start: usize, end: usize) {
        for i in start..=end {
            self.state[i] = SfuTag::Null;
        }
        if end + 1 == self.blocknum_col {
            self.busy = false;
            self.done = false;
        }
    }

    /// Marks the whole row's calculation complete.
    pub fn update_to_asoftmax(&mut self) {
        for s in self.state.iter_mut() {
            *s = SfuTag::Done;
        }
        self.done = true;
    }

    /// Whether the whole row has arrived and calculation can start.
    pub fn calculation(&self) -> bool {
        self.state.iter().all(|s| *s == SfuTag::DataReady)
    }

    #[cfg(test)]
    pub fn cell(&self, idx: usize) -> SfuTag {
        self.state[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filling_whole_row_goes_busy_and_calculation_ready() {
        let mut sm = Softmax::new(3, 1);
        sm.update_to_a(0, 1);
        assert!(!sm.busy);
        assert!(!sm.calculation());
        sm.update_to_a(2, 2);
        assert!(sm.busy);
        assert!(sm.calculation());
    }

    #[test]
    fn asoftmax_marks_done() {
        let mut sm = Softmax::new(2, 1);
        sm.update_to_a(0, 1);
        sm.update_to_asoftmax();
        assert!(sm.done);
        assert_eq!(sm.cell(0), SfuTag::Done);
    }

    #[test]
    fn draining_whole_row_clears_busy_and_done() {
        let mut sm = Softmax::new(2, 1);
        sm.update_to_a(0, 1);
        sm.update_to_asoftmax();
        sm.update_to_null(0, 1);
        assert!(!sm.busy);
        assert!(!sm.done);
    }

    #[test]
    fn tick_waits_for_latency_count_then_completes_row() {
        let mut sm = Softmax::new(2, 3);
        sm.update_to_a(0, 1);
        assert!(!sm.tick());
        assert!(!sm.tick());
        assert!(sm.tick());
        assert!(sm.done);
    }
}
