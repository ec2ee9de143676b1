//! LayerNorm unit: a row state machine tied to GB6, bandwidth-shaped output
//! to the next core's SRAM1 (spec.md §4.5).
//!
//! Grounded on `original_source/layernorm.py`'s `LayerNorm`, which inherits
//! `BaseUnit`'s `latency_count`/`latency_counter` pair, re-expressed with
//! `SfuTag` (spec.md §9) in place of the source's raw integer states. `tick`
//! mirrors the source's module-level `layernorm_cal` driver.

use crate::tags::SfuTag;

#[derive(Debug)]
pub struct LayerNorm {
    state: Vec<SfuTag>,
    blocknum_col: usize,
    to_sram_bandwidth: usize,

    latency_count: u64,
    latency_counter: u64,

    remove_start: usize,
    remove_end: usize,

    /// From the start of LN calculation to the end of transferring the
    /// whole row out: while true, GB<->LN transfer is forbidden.
    pub busy: bool,
    /// Some data is mid-transfer from LN to the next core's SRAM.
    pub partial_removing_to_core_busy: bool,
    /// A whole row hasn't finished transferring to the next core's SRAM.
    pub removing_to_core_busy: bool,
    /// Normalization has finished and the row is awaiting/mid drain; stays
    /// true across every removing band of the row, unlike `ln_complete()`
    /// which goes false the instant the first band leaves `Done`.
    pub done: bool,

    /// Which row of the normalized result is currently in flight; only
    /// bumps once the whole row has left for the next core's SRAM.
    pub row_idx: usize,
}

impl LayerNorm {
    pub fn new(blocknum_col: usize, to_sram_bandwidth: usize, latency_count: u64) -> Self {
        LayerNorm {
            state: vec![SfuTag::Null; blocknum_col],
            blocknum_col,
            to_sram_bandwidth,
            latency_count,
            latency_counter: 0,
            remove_start: 0,
            remove_end: to_sram_bandwidth - 1,
            busy: false,
            partial_removing_to_core_busy: false,
            removing_to_core_busy: false,
            done: false,
            row_idx: 0,
        }
    }

    pub fn blocknum_col(&self) -> usize {
        self.blocknum_col
    }

    /// `layernorm_cal` (`original_source/main.py`): ticks the latency
    /// counter while a full row is ready, flipping to normalized once
    /// `latency_count` ticks have elapsed.
    pub fn tick(&mut self) -> bool {
        if self.calculation() {
            self.latency_counter += 1;
            if self.latency_counter == self.latency_count {
                self.latency_counter = 0;
                self.update_to_xlayernorm();
                return true;
            }
        }
        false
    }

    pub fn update_to_ready(&mut self, start: usize, end: usize) {
        for i in start..=end {
            self.state[i] = SfuTag::DataReady;
        }
    }

    pub fn update_to_xlayernorm(&mut self) {
        for s in self.state.iter_mut() {
            *s = SfuTag::Done;
        }
        self.done = true;
    }

    pub fn update_to_null(&mut self, start: usize, end: usize) {
        for i in start..=end {
            self.state[i] = SfuTag::Null;
        }
        if end + 1 == self.state.len() {
            self.row_idx += 1;
            self.removing_to_core_busy = false;
            self.busy = false;
            self.done = false;
        }
        self.partial_removing_to_core_busy = false;
    }

    /// Whether the whole row has arrived and normalization can start.
    pub fn calculation(&self) -> bool {
        self.state[..self.blocknum_col]
            .iter()
            .all(|s| *s == SfuTag::DataReady)
    }

    /// Whether normalization is complete and the row can be transferred to
    /// the next core's SRAM.
    pub fn ln_complete(&self) -> bool {
        self.state[..self.blocknum_col]
            .iter()
            .all(|s| *s == SfuTag::Done)
    }

    /// `find_removing_target` (spec.md §4.5): marks the next
    /// `to_sram_bandwidth`-wide band `Removing` and returns its `[start, end]`
    /// bounds; wraps the window back to the start of the row once the end
    /// of the row is reached.
    pub fn find_removing_target(&mut self) -> (usize, usize) {
        let (start, end);
        if self.remove_end < self.blocknum_col - 1 {
            for i in self.remove_start..=self.remove_end {
                self.state[i] = SfuTag::Removing;
            }
            start = self.remove_start;
            end = self.remove_end;
            self.remove_start = self.remove_end + 1;
            self.remove_end = self.remove_start + self.to_sram_bandwidth - 1;
        } else {
            for i in self.remove_start..self.state.len() {
                self.state[i] = SfuTag::Removing;
            }
            start = self.remove_start;
            end = self.state.len() - 1;
            self.remove_start = 0;
            self.remove_end = self.to_sram_bandwidth - 1;
        }

        self.removing_to_core_busy = true;
        self.partial_removing_to_core_busy = true;

        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculation_waits_for_whole_row() {
        let mut ln = LayerNorm::new(4, 2, 1);
        ln.update_to_ready(0, 1);
        assert!(!ln.calculation());
        ln.update_to_ready(2, 3);
        assert!(ln.calculation());
    }

    #[test]
    fn tick_waits_for_latency_count_then_normalizes() {
        let mut ln = LayerNorm::new(2, 2, 2);
        ln.update_to_ready(0, 1);
        assert!(!ln.tick());
        assert!(ln.tick());
        assert!(ln.ln_complete());
    }

    #[test]
    fn find_removing_target_walks_bandwidth_windows_then_wraps() {
        let mut ln = LayerNorm::new(4, 2, 1);
        ln.update_to_ready(0, 3);
        ln.update_to_xlayernorm();
        assert!(ln.ln_complete());

        let (s0, e0) = ln.find_removing_target();
        assert_eq!((s0, e0), (0, 1));
        ln.update_to_null(s0, e0);
        assert_eq!(ln.row_idx, 0);

        let (s1, e1) = ln.find_removing_target();
        assert_eq!((s1, e1), (2, 3));
        ln.update_to_null(s1, e1);
        assert_eq!(ln.row_idx, 1);
        assert!(!ln.busy);
    }
}
