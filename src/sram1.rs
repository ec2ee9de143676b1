//! SRAM1: the left-operand bank (spec.md §4.1, §3).
//!
//! Each sub-bank row holds one block-row of subsums; logical shape is
//! `blocknum_row_sram x subsum_cnt`. Grounded on `original_source/sram.py`'s
//! `SRAM1`, re-expressed with a closed `SramTag` state matrix instead of
//! raw integers (spec.md §9).

use ndarray::Array2;

use crate::tags::SramTag;

#[derive(Debug)]
pub struct Sram1 {
    state: Array2<SramTag>,

    blocknum_row_std: usize,
    blocknum_col_std: usize,
    subsum_cnt_std: usize,
    blocknum_row_sram_std: usize,

    row_cal: usize,
    sub_cal: usize,

    /// Sticky once the whole result matrix has been consumed.
    pub cal_complete: bool,
    /// Set once an upstream write pass (array/softmax/layernorm feed) has
    /// delivered its last band (spec.md §4.1).
    pub write_complete: bool,
}

impl Sram1 {
    /// `add_mapping` (spec.md §4.1): formulates the mapping strategy and
    /// (re)initializes the state matrix to all-`Ready`.
    pub fn new(
        blocknum_row_std: usize,
        blocknum_col_std: usize,
        subsum_cnt_std: usize,
        blocknum_row_sram_std: usize,
    ) -> Self {
        Sram1 {
            state: Array2::from_elem((blocknum_row_sram_std, subsum_cnt_std), SramTag::Ready),
            blocknum_row_std,
            blocknum_col_std,
            subsum_cnt_std,
            blocknum_row_sram_std,
            row_cal: 0,
            sub_cal: 0,
            cal_complete: false,
            write_complete: false,
        }
    }

    pub fn blocknum_row_sram_std(&self) -> usize {
        self.blocknum_row_sram_std
    }

    pub fn subsum_cnt_std(&self) -> usize {
        self.subsum_cnt_std
    }

    pub fn ready(&self) -> bool {
        self.state[[self.row_cal, self.sub_cal]] == SramTag::Ready
    }

    fn mark_row_remove(&mut self, row: usize) {
        for c in 0..self.subsum_cnt_std {
            self.state[[row, c]] = SramTag::Remove;
        }
    }

    /// `cal_advance` (spec.md §4.1): advances the calculation cursor
    /// `(row_cal, sub_cal)`, taking `blocknum_cal = [block_row, block_col]`
    /// of the owning core and whether SRAM2 has already completed.
    pub fn cal_advance(&mut self, blocknum_cal: [usize; 2], sram2_complete: bool) {
        if !self.cal_complete {
            if self.sub_cal + 1 < self.subsum_cnt_std {
                self.sub_cal += 1;
            } else if blocknum_cal[1] != 0 {
                self.sub_cal = 0;
            } else if self.row_cal + 1 < self.blocknum_row_sram_std {
                self.sub_cal = 0;
                self.mark_row_remove(self.row_cal);
                self.row_cal += 1;
            } else if blocknum_cal[0] + 1 < self.blocknum_row_std {
                self.sub_cal = 0;
                self.mark_row_remove(self.row_cal);
                self.row_cal = 0;
            } else {
                self.mark_row_remove(self.row_cal);
                self.cal_complete = true;
            }
        }
        if sram2_complete {
            self.mark_row_remove(self.row_cal);
        }
    }

    /// Toggle a contiguous band of cells (row-major, wrapping across rows)
    /// to `Ready`, bounded by `band` length (GB bandwidth, spec.md §4.3).
    pub fn update_to_ready(&mut self, start_flat: usize, len: usize) {
        self.for_band(start_flat, len, SramTag::Ready);
    }

    pub fn update_to_removing(&mut self, start_flat: usize, len: usize) {
        self.for_band(start_flat, len, SramTag::Removing);
    }

    fn for_band(&mut self, start_flat: usize, len: usize, tag: SramTag) {
        let total = self.blocknum_row_sram_std * self.subsum_cnt_std;
        for i in 0..len {
            let flat = (start_flat + i) % total;
            let row = flat / self.subsum_cnt_std;
            let col = flat % self.subsum_cnt_std;
            self.state[[row, col]] = tag;
        }
    }

    /// Accepts a band written directly from LayerNorm's output
    /// (spec.md §4.1 `update_to_ready_from_ln`); `row_idx` is modulo the
    /// sub-bank's row capacity. `write_complete` is set once `row_idx`
    /// reaches `sram_row_std` (the last logical row of the incoming matrix).
    pub fn update_to_ready_from_ln(
        &mut self,
        row_idx: usize,
        sram_row_std: usize,
        start: usize,
        end: usize,
    ) {
        let row = row_idx % self.blocknum_row_sram_std;
        for c in start..=end {
            self.state[[row, c % self.subsum_cnt_std]] = SramTag::Ready;
        }
        if row_idx + 1 == sram_row_std {
            self.write_complete = true;
        }
    }

    /// Accepts softmax output writes: each mac_lane-block of softmax output
    /// populates two consecutive SRAM1 cells at row `a_row`
    /// (spec.md §4.1 `update_to_ready_from_softmax`).
    pub fn update_to_ready_from_softmax(&mut self, a_row: usize, start: usize, end: usize) {
        let row = a_row % self.blocknum_row_sram_std;
        for c in start..=end {
            self.state[[row, c % self.subsum_cnt_std]] = SramTag::Ready;
        }
    }

    /// Accepts writes directly from a previous core's array: every second
    /// block written into a mac_lane-pair of SRAM1 cells transitions the
    /// pair to Ready; on reaching `block_cnt`, sets `write_complete`
    /// (spec.md §4.1 `update_to_ready_from_array_av`).
    pub fn update_to_ready_from_array_av(&mut self, block_row_idx: usize, block_cnt: usize) {
        let row = (block_row_idx / 2) % self.blocknum_row_sram_std;
        let col = block_row_idx % 2;
        self.state[[row, col]] = SramTag::Ready;
        if block_row_idx + 1 == block_cnt {
            self.write_complete = true;
        }
    }

    /// The `_abrupt` variant (spec.md §4.1): same write-layout as
    /// `update_to_ready_from_array_av` but without a paired second write
    /// (used when the upstream side hands off single cells, e.g. GB5/GB7's
    /// direct array->SRAM1 pass-through channel).
    pub fn update_to_ready_from_array_abrupt(&mut self, block_row_idx: usize, block_cnt: usize) {
        let row = block_row_idx % self.blocknum_row_sram_std;
        self.state[[row, 0]] = SramTag::Ready;
        if block_row_idx + 1 == block_cnt {
            self.write_complete = true;
        }
    }

    pub fn reset(&mut self) {
        self.cal_complete = false;
        self.write_complete = false;
        self.row_cal = 0;
        self.sub_cal = 0;
        self.state.fill(SramTag::Ready);
    }

    /// Read used by the global buffer's `find_sram_target` (spec.md §4.3).
    pub fn flat_cell(&self, row: usize, col: usize) -> SramTag {
        self.state[[row, col]]
    }

    pub fn mark_removing(&mut self, row: usize, col: usize) {
        self.state[[row, col]] = SramTag::Removing;
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, col: usize) -> SramTag {
        self.state[[row, col]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_starts_true() {
        let sram = Sram1::new(4, 2, 3, 4);
        assert!(sram.ready());
    }

    #[test]
    fn cal_advance_walks_subsum_then_row_then_marks_remove() {
        let mut sram = Sram1::new(1, 1, 2, 1);
        // subsum dim 0 -> 1
        sram.cal_advance([0, 0], false);
        assert_eq!(sram.cell(0, 0), SramTag::Ready);
        // last subsum, last col, last sram row but not last result row: wrap, mark remove
        sram.cal_advance([0, 0], false);
        assert_eq!(sram.cell(0, 0), SramTag::Remove);
        assert!(sram.cal_complete);
    }

    #[test]
    fn band_update_wraps_and_toggles() {
        let mut sram = Sram1::new(2, 1, 2, 2);
        sram.update_to_removing(0, 4);
        assert_eq!(sram.cell(0, 0), SramTag::Removing);
        assert_eq!(sram.cell(1, 1), SramTag::Removing);
        sram.update_to_ready(3, 2);
        assert_eq!(sram.cell(1, 1), SramTag::Ready);
        assert_eq!(sram.cell(0, 0), SramTag::Ready);
    }

    #[test]
    fn write_complete_from_array_av() {
        let mut sram = Sram1::new(2, 1, 2, 2);
        sram.update_to_ready_from_array_av(0, 2);
        assert!(!sram.write_complete);
        sram.update_to_ready_from_array_av(1, 2);
        assert!(sram.write_complete);
    }
}
