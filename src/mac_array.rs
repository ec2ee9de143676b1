//! The MAC array and its accumulator (spec.md §4.2).
//!
//! One `mac_lane`-wide row of accumulator slots; each slot accumulates
//! `subsum_cnt` partial sums before becoming a complete block result.
//! Grounded directly on `original_source/calculator_and_array.py`'s
//! `CalculatorAndArray`, re-expressed with `ArrayTag` in place of the
//! source's raw `NULL`/`SUBSUM`/`COMPLETESUM`/`REMOVING` integers.

use crate::tags::ArrayTag;

#[derive(Debug)]
pub struct MacArray {
    mac_lane: usize,
    #[allow(dead_code)]
    mac_num: usize,

    state: Vec<ArrayTag>,

    array_idx_cal: usize,
    subsum_counter: usize,
    subsum_cnt: usize,

    block_cnt: usize,
    block_counter: usize,

    pub complete: bool,
}

impl MacArray {
    pub fn new(mac_lane: usize, mac_num: usize, block_cnt: usize) -> Self {
        MacArray {
            mac_lane,
            mac_num,
            state: vec![ArrayTag::Null; mac_lane],
            array_idx_cal: 0,
            subsum_counter: 0,
            subsum_cnt: 0,
            block_cnt,
            block_counter: 0,
            complete: false,
        }
    }

    /// `add_mapping` (spec.md §4.2): how many subsums accumulate into one
    /// complete mac_lane*mac_lane block.
    pub fn add_mapping(&mut self, subsum_cnt: usize) {
        self.subsum_cnt = subsum_cnt;
    }

    pub fn reconfigure(&mut self, block_cnt: usize) {
        self.block_cnt = block_cnt;
    }

    /// Whether the next round of calculation can start: a fresh subsum
    /// pass needs a `Null` slot, a continuing pass needs `Subsum`.
    pub fn ready(&self) -> bool {
        if self.subsum_counter == 0 {
            self.state[self.array_idx_cal] == ArrayTag::Null
        } else {
            self.state[self.array_idx_cal] == ArrayTag::Subsum
        }
    }

    pub fn update_to_removing(&mut self, array_idx: usize) {
        self.state[array_idx] = ArrayTag::Removing;
    }

    pub fn update_to_null(&mut self, array_idx: usize) {
        self.state[array_idx] = ArrayTag::Null;
    }

    /// `update_array` (spec.md §4.2): advances the write cursor one MAC
    /// cycle's worth, tagging slots `Subsum`/`CompleteSum` as each
    /// mac_lane sweep and subsum round completes.
    pub fn update_array(&mut self) {
        if self.array_idx_cal + 1 < self.mac_lane {
            if self.subsum_counter == 0 {
                self.state[self.array_idx_cal] = ArrayTag::Subsum;
            }
            if self.subsum_counter == self.subsum_cnt - 1 {
                self.state[self.array_idx_cal] = ArrayTag::CompleteSum;
            }
            self.array_idx_cal += 1;
        } else {
            if self.subsum_counter == 0 {
                self.state[self.array_idx_cal] = ArrayTag::Subsum;
            }
            self.subsum_counter += 1;

            if self.subsum_counter == self.subsum_cnt {
                self.subsum_counter = 0;
                self.block_counter += 1;
                self.state[self.array_idx_cal] = ArrayTag::CompleteSum;
            }

            self.array_idx_cal = 0;

            if self.block_counter == self.block_cnt {
                self.complete = true;
            }
        }
    }

    pub fn reset(&mut self) {
        self.complete = false;
        self.array_idx_cal = 0;
        self.subsum_counter = 0;
        self.block_counter = 0;
    }

    pub fn slot(&self, idx: usize) -> ArrayTag {
        self.state[idx]
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_needs_null_before_first_subsum_round() {
        let array = MacArray::new(2, 4, 1);
        assert!(array.ready());
    }

    #[test]
    fn single_subsum_single_block_completes_in_mac_lane_ticks() {
        let mut array = MacArray::new(2, 4, 1);
        array.add_mapping(1);
        array.update_array();
        assert_eq!(array.slot(0), ArrayTag::CompleteSum);
        array.update_array();
        assert_eq!(array.slot(1), ArrayTag::CompleteSum);
        assert!(array.complete);
    }

    #[test]
    fn multi_subsum_round_marks_subsum_before_completesum() {
        let mut array = MacArray::new(1, 4, 1);
        array.add_mapping(2);
        array.update_array();
        assert_eq!(array.slot(0), ArrayTag::Subsum);
        assert!(!array.complete);
        array.update_array();
        assert_eq!(array.slot(0), ArrayTag::CompleteSum);
        assert!(array.complete);
    }

    #[test]
    fn reconfigure_changes_block_target() {
        let mut array = MacArray::new(1, 4, 5);
        array.reconfigure(1);
        array.add_mapping(1);
        array.update_array();
        assert!(array.complete);
    }
}
