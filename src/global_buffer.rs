//! Global buffer of a cluster: six concurrent transfer channels between a
//! core's SRAM1/SRAM2/array and the next stage's SRAM1, plus the A-state
//! matrix that drives softmax/layernorm hand-off (spec.md §4.3).
//!
//! Grounded directly on `original_source/global_buffer.py`'s
//! `GlobalBuffer`, re-expressed with `AStateTag` (spec.md §9) in place of
//! the source's `A`/`A_CAL`/`A_SOFTMAX`/`REMOVING` integers.

use ndarray::Array2;

use crate::mac_array::MacArray;
use crate::sram1::Sram1;
use crate::sram2::Sram2;
use crate::tags::AStateTag;

#[derive(Debug)]
pub struct GlobalBuffer {
    pub sram1_busy: bool,
    pub sram2_busy: bool,
    pub array_busy: bool,
    pub softmax_busy: bool,

    /// `[sram1, sram2]` transfer cursors.
    row: [usize; 2],
    col: [usize; 2],
    colnum2: usize,
    colnum2_sram: usize,
    rownum2: usize,
    rownum1: usize,
    array_idx_rm: usize,
    pub a_row: usize,
    softmax_start: usize,
    softmax_end: usize,

    blocknum_row_cnt: usize,
    array_data_cnt: usize,
    sram_subsum_cnt: usize,
    sram1_rownum_cnt: usize,
    sram2_colnum_cnt: usize,
    sram2_sram_colnum_cnt: usize,

    pub sram1_complete1: bool,
    pub sram1_complete2: bool,
    pub sram2_complete1: bool,
    pub sram2_complete2: bool,
    pub array_complete1: bool,
    pub array_complete2: bool,

    array_data_counter: usize,

    softmax_bandwidth: usize,

    a_state_matrix: Option<Array2<AStateTag>>,
}

impl GlobalBuffer {
    pub fn new(softmax_bandwidth: usize) -> Self {
        GlobalBuffer {
            sram1_busy: false,
            sram2_busy: false,
            array_busy: false,
            softmax_busy: false,
            row: [0, 0],
            col: [0, 0],
            colnum2: 1,
            colnum2_sram: 1,
            rownum2: 0,
            rownum1: 1,
            array_idx_rm: 0,
            a_row: 0,
            softmax_start: 0,
            softmax_end: softmax_bandwidth.saturating_sub(1),
            blocknum_row_cnt: 0,
            array_data_cnt: 0,
            sram_subsum_cnt: 0,
            sram1_rownum_cnt: 0,
            sram2_colnum_cnt: 0,
            sram2_sram_colnum_cnt: 0,
            sram1_complete1: false,
            sram1_complete2: false,
            sram2_complete1: false,
            sram2_complete2: false,
            array_complete1: false,
            array_complete2: false,
            array_data_counter: 0,
            softmax_bandwidth,
            a_state_matrix: None,
        }
    }

    /// `add_mapping` (spec.md §4.3). `with_a_state` allocates the A-state
    /// matrix for channels routed through softmax/layernorm (GB4/GB6).
    #[allow(clippy::too_many_arguments)]
    pub fn add_mapping(
        &mut self,
        blocknum_row_cnt: usize,
        array_data_cnt: usize,
        sram_subsum_cnt: usize,
        sram1_rownum_cnt: usize,
        sram2_colnum_cnt: usize,
        sram2_sram_colnum_cnt: usize,
        with_a_state: bool,
    ) {
        self.blocknum_row_cnt = blocknum_row_cnt;
        self.array_data_cnt = array_data_cnt;
        self.sram_subsum_cnt = sram_subsum_cnt;
        self.sram1_rownum_cnt = sram1_rownum_cnt;
        self.sram2_colnum_cnt = sram2_colnum_cnt;
        self.sram2_sram_colnum_cnt = sram2_sram_colnum_cnt;

        if with_a_state {
            let cols = array_data_cnt / blocknum_row_cnt;
            self.a_state_matrix = Some(Array2::from_elem(
                (blocknum_row_cnt, cols),
                AStateTag::Null,
            ));
        }
    }

    fn a_state(&mut self) -> &mut Array2<AStateTag> {
        self.a_state_matrix
            .as_mut()
            .expect("A-state matrix not configured for this channel")
    }

    pub fn update_to_a1(&mut self, block_counter: usize) {
        if block_counter > 0 {
            let cols = self.a_state_matrix.as_ref().unwrap().ncols();
            let row = (block_counter - 1) / cols;
            let col = block_counter - 1 - row * cols;
            self.a_state()[[row, col]] = AStateTag::Ready;
        }
    }

    pub fn update_to_a2(&mut self, row: usize, col: usize) {
        self.a_state()[[row, col]] = AStateTag::Ready;
    }

    pub fn update_to_cal(&mut self, start: usize, end: usize) {
        let a_row = self.a_row;
        let state = self.a_state();
        for i in start..=end {
            state[[a_row, i]] = AStateTag::Cal;
        }
    }

    pub fn update_to_asoftmax(&mut self, start: usize, end: usize) {
        let a_row = self.a_row;
        let last_col = self.a_state_matrix.as_ref().unwrap().ncols() - 1;
        let state = self.a_state();
        for i in start..=end {
            state[[a_row, i]] = AStateTag::Done;
        }
        if end == last_col {
            self.a_row += 1;
        }
    }

    /// `rowcol_advance1` (spec.md §4.3): SRAM1 transfer cursor.
    pub fn rowcol_advance1(&mut self) {
        if self.col[0] + 1 < self.sram_subsum_cnt {
            self.col[0] += 1;
        } else if self.row[0] + 1 < self.sram1_rownum_cnt
            && self.row[0] + (self.rownum1 - 1) * self.sram1_rownum_cnt + 1 < self.blocknum_row_cnt
        {
            self.row[0] += 1;
            self.col[0] = 0;
        } else if self.row[0] + (self.rownum1 - 1) * self.sram1_rownum_cnt + 1
            < self.blocknum_row_cnt
        {
            self.row[0] = 0;
            self.col[0] = 0;
            self.rownum1 += 1;
        } else {
            self.sram1_complete1 = true;
        }
    }

    /// `rowcol_advance2` (spec.md §4.3): SRAM2 transfer cursor. `flag` is
    /// the `Fits` mode (whole logical matrix resident in physical SRAM2).
    pub fn rowcol_advance2(&mut self, mac_lane: usize, flag: bool) {
        if flag {
            if self.col[1] + 1 < self.colnum2 * mac_lane {
                self.col[1] += 1;
            } else if self.row[1] + 1 < self.sram_subsum_cnt {
                self.row[1] += 1;
                self.col[1] = (self.colnum2 - 1) * mac_lane;
            } else if self.col[1] + 1 < self.sram2_colnum_cnt {
                self.col[1] += 1;
                self.row[1] = 0;
                self.colnum2 += 1;
            } else {
                self.sram2_complete1 = true;
            }
        } else if self.col[1] + 1 < self.colnum2_sram * mac_lane {
            self.col[1] += 1;
        } else if self.row[1] + 1 < self.sram_subsum_cnt {
            self.row[1] += 1;
            self.col[1] = (self.colnum2_sram - 1) * mac_lane;
        } else if self.col[1] + 1 < self.sram2_sram_colnum_cnt {
            self.col[1] += 1;
            self.row[1] = 0;
            self.colnum2 += 1;
            self.colnum2_sram += 1;
        } else if self.col[1] + self.colnum2 * mac_lane - self.sram2_sram_colnum_cnt + 1
            < self.sram2_colnum_cnt
        {
            self.col[1] = 0;
            self.colnum2_sram = 1;
            self.colnum2 += 1;
            self.row[1] = 0;
        } else if self.rownum2 + 1 < self.blocknum_row_cnt {
            self.col[1] = 0;
            self.colnum2_sram = 1;
            self.colnum2 += 1;
            self.row[1] = 0;
            self.rownum2 += 1;
        } else {
            self.sram2_complete1 = true;
        }
    }

    fn array_idx_advance(&mut self, num_data: usize) {
        if self.array_idx_rm + 1 < num_data {
            self.array_idx_rm += 1;
        } else {
            self.array_idx_rm = 0;
            self.array_data_counter += 1;
            if self.array_data_counter == self.array_data_cnt {
                self.array_complete1 = true;
            }
        }
    }

    /// `find_sram_target` for SRAM1 (spec.md §4.3): looks for a cell tagged
    /// `Remove`, marks it `Removing` if found, and returns its `(row, col)`.
    /// Returns `None` when nothing is ready this tick.
    pub fn find_sram1_target(&mut self, sram1: &mut Sram1) -> Option<(usize, usize)> {
        if sram1.flat_cell(self.row[0], self.col[0]) == crate::tags::SramTag::Remove {
            let target = (self.row[0], self.col[0]);
            self.sram1_busy = true;
            self.rowcol_advance1();
            Some(target)
        } else {
            None
        }
    }

    /// `find_sram_target` for SRAM2 (spec.md §4.3); `flag` mirrors
    /// `rowcol_advance2`'s fits/streams distinction.
    pub fn find_sram2_target(
        &mut self,
        sram2: &mut Sram2,
        mac_lane: usize,
    ) -> Option<(usize, usize)> {
        let flag = self.sram2_colnum_cnt <= self.sram2_sram_colnum_cnt;
        if sram2.flat_cell(self.row[1], self.col[1]) == crate::tags::SramTag::Remove {
            let target = (self.row[1], self.col[1]);
            self.sram2_busy = true;
            self.rowcol_advance2(mac_lane, flag);
            Some(target)
        } else {
            None
        }
    }

    fn check_a(&self, row: usize, col: usize, sram1_rownum_cnt: usize) -> bool {
        let a_row = row + (self.rownum1 - 1) * sram1_rownum_cnt;
        let state = self.a_state_matrix.as_ref().unwrap();
        state[[a_row, col * 2]] == AStateTag::Done && state[[a_row, col * 2 + 1]] == AStateTag::Done
    }

    /// `find_sram_target_a` (spec.md §4.3): like `find_sram1_target`, but
    /// additionally requires that the GB-side A-state (softmax/layernorm
    /// output) already has the corresponding pair ready.
    pub fn find_sram1_target_a(
        &mut self,
        sram1: &mut Sram1,
        sram1_rownum_cnt: usize,
    ) -> Option<(usize, usize)> {
        if sram1.flat_cell(self.row[0], self.col[0]) == crate::tags::SramTag::Remove {
            let row = self.row[0];
            let col = self.col[0];
            if self.check_a(row, col, sram1_rownum_cnt) {
                self.sram1_busy = true;
                self.rowcol_advance1();
                return Some((row, col));
            }
        }
        None
    }

    /// `find_array_target` (spec.md §4.3): looks for a `CompleteSum` slot
    /// in the core's MAC array and marks it removing.
    pub fn find_array_target(&mut self, array: &mut MacArray) -> Option<usize> {
        if array.slot(self.array_idx_rm) == crate::tags::ArrayTag::CompleteSum {
            let idx = self.array_idx_rm;
            self.array_busy = true;
            self.array_idx_advance(array.len());
            Some(idx)
        } else {
            None
        }
    }

    /// `find_softmax_null_target` (spec.md §4.3, §4.4): finds the next
    /// bandwidth-wide band of the current softmax row ready to hand off,
    /// wrapping the window at the end of the row.
    pub fn find_softmax_null_target(&mut self) -> Option<(usize, usize)> {
        if self.a_row >= self.blocknum_row_cnt {
            return None;
        }
        let a_row = self.a_row;
        let last_col = self.a_state_matrix.as_ref().unwrap().ncols() - 1;

        if self.softmax_end < last_col {
            if self.a_state_matrix.as_ref().unwrap()[[a_row, self.softmax_end]] == AStateTag::Ready
            {
                let (start, end) = (self.softmax_start, self.softmax_end);
                let state = self.a_state();
                for i in start..=end {
                    state[[a_row, i]] = AStateTag::Removing;
                }
                self.softmax_start = end + 1;
                self.softmax_end = self.softmax_start + self.softmax_bandwidth - 1;
                self.softmax_busy = true;
                return Some((start, end));
            }
        } else if self.a_state_matrix.as_ref().unwrap()[[a_row, last_col]] == AStateTag::Ready {
            let start = self.softmax_start;
            let state = self.a_state();
            for i in start..=last_col {
                state[[a_row, i]] = AStateTag::Removing;
            }
            self.softmax_start = 0;
            self.softmax_end = self.softmax_bandwidth - 1;
            self.softmax_busy = true;
            return Some((start, last_col));
        }
        None
    }

    /// `find_softmax_res_target` (spec.md §4.4): transfers the softmax
    /// result back into the A-state matrix, bandwidth-wide band at a time.
    pub fn find_softmax_res_target(&mut self) -> (usize, usize) {
        let a_row = self.a_row;
        let last_col = self.a_state_matrix.as_ref().unwrap().ncols() - 1;
        let (start, end);
        if self.softmax_end < last_col {
            start = self.softmax_start;
            end = self.softmax_end;
            let state = self.a_state();
            for i in start..=end {
                state[[a_row, i]] = AStateTag::Removing;
            }
            self.softmax_start = end + 1;
            self.softmax_end = self.softmax_start + self.softmax_bandwidth - 1;
        } else {
            start = self.softmax_start;
            end = last_col;
            let state = self.a_state();
            for i in start..=end {
                state[[a_row, i]] = AStateTag::Removing;
            }
            self.softmax_start = 0;
            self.softmax_end = self.softmax_bandwidth - 1;
        }
        self.softmax_busy = true;
        (start, end)
    }

    pub fn softmax_complete(&self) -> bool {
        let state = self.a_state_matrix.as_ref().unwrap();
        state[[state.nrows() - 1, state.ncols() - 1]] == AStateTag::Done
    }

    pub fn transfer_to_softmax_complete(&self) -> bool {
        let state = self.a_state_matrix.as_ref().unwrap();
        state[[state.nrows() - 1, state.ncols() - 1]] == AStateTag::Cal
    }

    /// Column count of the A-state matrix, if configured. Lets a consumer
    /// stage check `find_sram1_target_a`'s `check_a` indexing bound
    /// (`col * 2 + 1`) before calling it.
    pub fn a_state_cols(&self) -> Option<usize> {
        self.a_state_matrix.as_ref().map(|m| m.ncols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rowcol_advance1_walks_subsum_then_row_then_completes() {
        let mut gb = GlobalBuffer::new(2);
        gb.add_mapping(1, 1, 2, 1, 1, 1, false);
        gb.rowcol_advance1();
        assert_eq!(gb.col[0], 1);
        gb.rowcol_advance1();
        assert!(gb.sram1_complete1);
    }

    #[test]
    fn a_state_round_trip_ready_cal_done() {
        let mut gb = GlobalBuffer::new(2);
        gb.add_mapping(1, 2, 1, 1, 2, 2, true);
        gb.update_to_a2(0, 0);
        gb.update_to_a2(0, 1);
        assert_eq!(gb.a_state_matrix.as_ref().unwrap()[[0, 0]], AStateTag::Ready);
        gb.update_to_cal(0, 1);
        assert_eq!(gb.a_state_matrix.as_ref().unwrap()[[0, 0]], AStateTag::Cal);
        gb.update_to_asoftmax(0, 1);
        assert!(gb.softmax_complete());
        assert_eq!(gb.a_row, 1);
    }

    #[test]
    fn find_array_target_requires_completesum() {
        let mut gb = GlobalBuffer::new(1);
        let mut array = MacArray::new(2, 4, 1);
        assert!(gb.find_array_target(&mut array).is_none());
        array.add_mapping(1);
        array.update_array();
        array.update_array();
        assert_eq!(gb.find_array_target(&mut array), Some(0));
        assert!(gb.array_busy);
    }
}
