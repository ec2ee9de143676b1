//! SRAM2: the right-operand bank (spec.md §4.1, §3).
//!
//! Two modes selected once at `add_mapping` time by whether the whole
//! logical matrix fits in the physical bank (`Fits`) or must be streamed in
//! logical sub-columns (`Streams`). Grounded on `original_source/sram.py`'s
//! `SRAM2.cal_advance` for the `Fits` path; the `Streams` path and the
//! ring-order Q·Kᵀ variant are specified only in prose by spec.md §4.1 (no
//! streaming SRAM2 survived in the single retained `sram.py` snapshot) and
//! are implemented directly from that text.

use ndarray::Array2;

use crate::tags::SramTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Fits,
    Streams,
}

#[derive(Debug)]
pub struct Sram2 {
    state: Array2<SramTag>,
    mode: Mode,

    mac_lane: usize,
    blocknum_row_std: usize,
    blocknum_col_std: usize,
    subsum_cnt_std: usize,
    /// Physical sub-column capacity, in blocks, when streaming.
    blocknum_col_sram_std: usize,

    block_col_cal: usize,
    subsum_cal: usize,
    /// Which logical sub-column (of width `blocknum_col_sram_std`) is
    /// currently resident, when streaming.
    logical_col_idx: usize,
    /// How many distinct physical sub-columns have been visited for the
    /// current logical sub-column's sweep (streaming mode only).
    physical_cols_visited: usize,

    /// Q·Kᵀ ring-expansion block visit order, when configured (spec.md
    /// §4.1 `cal_advance_qk`); `None` for every other stage.
    ring_order: Option<Vec<(usize, usize)>>,
    ring_idx: usize,

    pub cal_complete: bool,
}

impl Sram2 {
    pub fn new(
        mac_lane: usize,
        blocknum_row_std: usize,
        blocknum_col_std: usize,
        subsum_cnt_std: usize,
        blocknum_col_sram_std: usize,
    ) -> Self {
        let mode = if blocknum_col_std <= blocknum_col_sram_std {
            Mode::Fits
        } else {
            Mode::Streams
        };
        let phys_cols = blocknum_col_sram_std.min(blocknum_col_std);
        Sram2 {
            state: Array2::from_elem((subsum_cnt_std, phys_cols * mac_lane), SramTag::Ready),
            mode,
            mac_lane,
            blocknum_row_std,
            blocknum_col_std,
            subsum_cnt_std,
            blocknum_col_sram_std: phys_cols,
            block_col_cal: 0,
            subsum_cal: 0,
            logical_col_idx: 0,
            physical_cols_visited: 0,
            ring_order: None,
            ring_idx: 0,
            cal_complete: false,
        }
    }

    /// Selects the ring-expansion visit order for Q·Kᵀ (spec.md §4.1,
    /// §9), over the square result matrix (`blocknum_col_std` blocks on a
    /// side — the attention matrix is `seq_length x seq_length`).
    pub fn with_qk_ring(mut self) -> Self {
        let n = self.blocknum_col_std;
        let mut order = Vec::with_capacity(n * n);
        for ring in 0..(2 * n - 1) {
            for row in 0..n {
                let col = ring as isize - row as isize;
                if col >= 0 && (col as usize) < n {
                    order.push((row, col as usize));
                }
            }
        }
        self.ring_order = Some(order);
        self
    }

    fn physical_col(&self) -> usize {
        self.logical_col_idx * self.blocknum_col_sram_std * self.mac_lane
            + self.block_col_cal % (self.blocknum_col_sram_std * self.mac_lane)
    }

    pub fn ready(&self, blocknum_col_cal: usize) -> bool {
        let col = blocknum_col_cal * self.mac_lane + self.block_col_cal;
        let col = col % self.state.ncols();
        self.state[[self.subsum_cal, col]] == SramTag::Ready
    }

    fn mark_remove(&mut self, blocknum_col: usize, block_col_idx: usize) {
        let col = (blocknum_col * self.mac_lane + block_col_idx) % self.state.ncols();
        self.state[[self.subsum_cal, col]] = SramTag::Remove;
    }

    /// `cal_advance` (spec.md §4.1, `Fits` mode and the base of `Streams`):
    /// sweeps mac_lane width, then subsum, then result column, then result
    /// row; marks REMOVE only on the final row sweep; returns
    /// `is_sram1_advance` whenever the subsum cursor bumps.
    pub fn cal_advance(&mut self, blocknum_cal: &mut [usize; 2]) -> bool {
        match self.mode {
            Mode::Fits => self.cal_advance_fits(blocknum_cal),
            Mode::Streams => self.cal_advance_streams(blocknum_cal),
        }
    }

    fn cal_advance_fits(&mut self, blocknum_cal: &mut [usize; 2]) -> bool {
        let mut is_sram1_advance = false;
        if self.cal_complete {
            return is_sram1_advance;
        }
        let is_last_row_sweep = blocknum_cal[0] + 1 == self.blocknum_row_std;

        if self.block_col_cal + 1 < self.mac_lane {
            if is_last_row_sweep {
                self.mark_remove(blocknum_cal[1], self.block_col_cal);
            }
            self.block_col_cal += 1;
        } else if self.subsum_cal + 1 < self.subsum_cnt_std {
            if is_last_row_sweep {
                self.mark_remove(blocknum_cal[1], self.block_col_cal);
            }
            self.block_col_cal = 0;
            self.subsum_cal += 1;
            is_sram1_advance = true;
        } else if blocknum_cal[1] + 1 < self.blocknum_col_std {
            if is_last_row_sweep {
                self.mark_remove(blocknum_cal[1], self.block_col_cal);
            }
            blocknum_cal[1] += 1;
            self.block_col_cal = 0;
            self.subsum_cal = 0;
            is_sram1_advance = true;
        } else if blocknum_cal[0] + 1 < self.blocknum_row_std {
            blocknum_cal[1] = 0;
            blocknum_cal[0] += 1;
            self.block_col_cal = 0;
            self.subsum_cal = 0;
            is_sram1_advance = true;
        } else {
            self.mark_remove(blocknum_cal[1], self.block_col_cal);
            self.cal_complete = true;
            is_sram1_advance = true;
        }
        is_sram1_advance
    }

    /// Streaming variant (spec.md §4.1): an extra wrap level restarts the
    /// physical SRAM at the next logical sub-column; the outer result row
    /// only bumps after every logical sub-column has been visited.
    fn cal_advance_streams(&mut self, blocknum_cal: &mut [usize; 2]) -> bool {
        let mut is_sram1_advance = false;
        if self.cal_complete {
            return is_sram1_advance;
        }
        let physical_width = self.blocknum_col_sram_std * self.mac_lane;
        let is_last_row_sweep = blocknum_cal[0] + 1 == self.blocknum_row_std;
        let col_in_block = self.physical_col() % physical_width;

        if self.block_col_cal + 1 < self.mac_lane {
            if is_last_row_sweep {
                self.state[[self.subsum_cal, col_in_block]] = SramTag::Remove;
            }
            self.block_col_cal += 1;
        } else if self.subsum_cal + 1 < self.subsum_cnt_std {
            if is_last_row_sweep {
                self.state[[self.subsum_cal, col_in_block]] = SramTag::Remove;
            }
            self.block_col_cal = 0;
            self.subsum_cal += 1;
            is_sram1_advance = true;
        } else if blocknum_cal[1] + 1 < self.blocknum_col_std
            && (self.physical_cols_visited + 1) < self.blocknum_col_sram_std.max(1)
        {
            if is_last_row_sweep {
                self.state[[self.subsum_cal, col_in_block]] = SramTag::Remove;
            }
            blocknum_cal[1] += 1;
            self.physical_cols_visited += 1;
            self.block_col_cal = 0;
            self.subsum_cal = 0;
            is_sram1_advance = true;
        } else if blocknum_cal[1] + 1 < self.blocknum_col_std {
            // physical sub-SRAM exhausted: move to the next logical sub-column
            if is_last_row_sweep {
                self.state[[self.subsum_cal, col_in_block]] = SramTag::Remove;
            }
            blocknum_cal[1] += 1;
            self.logical_col_idx += 1;
            self.physical_cols_visited = 0;
            self.block_col_cal = 0;
            self.subsum_cal = 0;
            self.state.fill(SramTag::Ready);
            is_sram1_advance = true;
        } else if blocknum_cal[0] + 1 < self.blocknum_row_std {
            blocknum_cal[1] = 0;
            blocknum_cal[0] += 1;
            self.logical_col_idx = 0;
            self.physical_cols_visited = 0;
            self.block_col_cal = 0;
            self.subsum_cal = 0;
            self.state.fill(SramTag::Ready);
            is_sram1_advance = true;
        } else {
            self.state[[self.subsum_cal, col_in_block]] = SramTag::Remove;
            self.cal_complete = true;
            is_sram1_advance = true;
        }
        is_sram1_advance
    }

    /// Ring-order advance used exclusively for Q·Kᵀ (spec.md §4.1, §9):
    /// same mac_lane/subsum sweep underneath, but the outer (row, col)
    /// block transition follows `ring_order` rather than row-major order.
    /// Every row in the ring revisits every column, so (unlike row-major
    /// `cal_advance_fits`) no single block transition is "the last read" of
    /// a given column — the resident K block only gets released once the
    /// whole ring is walked.
    pub fn cal_advance_qk(&mut self, blocknum_cal: &mut [usize; 2]) -> bool {
        let order = self
            .ring_order
            .clone()
            .expect("cal_advance_qk requires with_qk_ring()");
        let mut is_sram1_advance = false;
        if self.cal_complete {
            return is_sram1_advance;
        }
        let is_last_block = self.ring_idx + 1 == order.len();

        if self.block_col_cal + 1 < self.mac_lane {
            self.block_col_cal += 1;
        } else if self.subsum_cal + 1 < self.subsum_cnt_std {
            self.block_col_cal = 0;
            self.subsum_cal += 1;
            is_sram1_advance = true;
        } else if !is_last_block {
            self.ring_idx += 1;
            let (row, col) = order[self.ring_idx];
            blocknum_cal[0] = row;
            blocknum_cal[1] = col;
            self.block_col_cal = 0;
            self.subsum_cal = 0;
            is_sram1_advance = true;
        } else {
            self.state.fill(SramTag::Remove);
            self.cal_complete = true;
            is_sram1_advance = true;
        }
        is_sram1_advance
    }

    /// Accepts writes from a previous core's array for K/V activations
    /// (spec.md §4.1 `update_to_ready_from_array`): attention K uses
    /// `row = ceil(pair_counter / 2) mod 2`-style pairing across the
    /// mac_lane sweep, `col = pair sweep`; V uses `row = pair index`,
    /// `col = block sweep within a sub-column`.
    pub fn update_to_ready_from_array_k(&mut self, pair_counter: usize, col_sweep: usize) {
        let row = (pair_counter / 2) % self.state.nrows();
        let col = col_sweep % self.state.ncols();
        self.state[[row, col]] = SramTag::Ready;
    }

    pub fn update_to_ready_from_array_v(&mut self, pair_idx: usize, block_sweep: usize) {
        let row = pair_idx % self.state.nrows();
        let col = block_sweep % self.state.ncols();
        self.state[[row, col]] = SramTag::Ready;
    }

    pub fn reset(&mut self) {
        self.cal_complete = false;
        self.block_col_cal = 0;
        self.subsum_cal = 0;
        self.logical_col_idx = 0;
        self.physical_cols_visited = 0;
        self.ring_idx = 0;
        self.state.fill(SramTag::Ready);
    }

    pub fn is_streaming(&self) -> bool {
        self.mode == Mode::Streams
    }

    /// Read used by the global buffer's `find_sram_target` (spec.md §4.3);
    /// logical row/col wrap into the physically-resident sub-column.
    pub fn flat_cell(&self, logical_row: usize, logical_col: usize) -> SramTag {
        let r = logical_row % self.state.nrows();
        let c = logical_col % self.state.ncols();
        self.state[[r, c]]
    }

    pub fn mark_removing(&mut self, logical_row: usize, logical_col: usize) {
        let r = logical_row % self.state.nrows();
        let c = logical_col % self.state.ncols();
        self.state[[r, c]] = SramTag::Removing;
    }

    #[cfg(test)]
    pub fn logical_col_idx(&self) -> usize {
        self.logical_col_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_mode_when_logical_fits_physical() {
        let sram = Sram2::new(4, 2, 2, 3, 4);
        assert!(!sram.is_streaming());
    }

    #[test]
    fn streams_mode_when_logical_exceeds_physical() {
        let sram = Sram2::new(4, 2, 8, 3, 2);
        assert!(sram.is_streaming());
    }

    #[test]
    fn cal_advance_sweeps_mac_lane_then_completes() {
        let mut sram = Sram2::new(2, 1, 1, 1, 1);
        let mut blocknum_cal = [0usize, 0usize];
        // mac_lane=2: first advance reaches the last lane, second completes.
        assert!(!sram.cal_advance(&mut blocknum_cal));
        assert!(sram.cal_advance(&mut blocknum_cal));
        assert!(sram.cal_complete);
    }

    #[test]
    fn streams_mode_revisits_same_physical_subcolumn_twice() {
        // blocknum_col_std=4, blocknum_col_sram_std=1: 4 logical columns share
        // one physical sub-column, so the physical bank must be reused >= twice.
        let mut sram = Sram2::new(1, 1, 4, 1, 1);
        let mut blocknum_cal = [0usize, 0usize];
        let mut visited_logical_cols = vec![sram.logical_col_idx()];
        for _ in 0..8 {
            if sram.cal_complete {
                break;
            }
            sram.cal_advance(&mut blocknum_cal);
            visited_logical_cols.push(sram.logical_col_idx());
        }
        assert!(visited_logical_cols.iter().filter(|&&c| c == 0).count() >= 1);
        assert!(sram.logical_col_idx() >= 2);
    }

    #[test]
    fn qk_ring_order_visits_every_block() {
        let sram = Sram2::new(2, 3, 3, 1, 3).with_qk_ring();
        let order = sram.ring_order.clone().unwrap();
        assert_eq!(order.len(), 9);
        let mut seen: Vec<_> = order.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 9);
    }
}
