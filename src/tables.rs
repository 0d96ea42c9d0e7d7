//! Precomputed lookup tables keyed by local-board encoding.
//!
//! Every table here is built once, lazily, behind a [`OnceLock`].
//! Everything downstream (`board`, `movegen`, `playout`, `mcts`) looks things
//! up in O(1) instead of recomputing them, which is the whole performance
//! budget of this engine: playout throughput lives or dies on these tables.

use std::sync::OnceLock;

use crate::constants::{CELLS_PER_BOARD, LOG2_TABLE_SIZE, MINI_STATES, TOTAL_CELLS};

/// Status of one local (3x3) board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiniStatus {
    Undecided,
    XWon,
    OWon,
    Drawn,
}

/// All precomputed tables, built once and shared via [`tables()`].
pub struct Tables {
    /// `state[mini]`: status of the local board encoded as `mini`.
    pub state: Vec<MiniStatus>,
    /// `empty_mask[mini]`: 9-bit mask, bit `j` set iff inner cell `j` is empty.
    pub empty_mask: Vec<u16>,
    /// `empty_count[mini]`: popcount of `empty_mask[mini]`.
    pub empty_count: Vec<u8>,
    /// `empty_cells[mini]`: the inner indices of the empty cells, in
    /// ascending order, padded with zeroes past `empty_count[mini]`.
    pub empty_cells: Vec<[u8; CELLS_PER_BOARD]>,
    /// `outer[mv]`: which local board move `mv` lands in.
    pub outer: [u8; TOTAL_CELLS],
    /// `inner[mv]`: which cell within that local board.
    pub inner: [u8; TOTAL_CELLS],
    /// `move_from_gridbit[g]`: canonical move for "gridbit" `g = board*9 + cell`.
    pub move_from_gridbit: [u8; TOTAL_CELLS],
    /// `popcount9[mask]`: popcount of a 9-bit mask.
    pub popcount9: [u8; 512],
    /// `nth_set_bit9[mask][k]`: index of the k-th set bit of a 9-bit mask.
    pub nth_set_bit9: [[u8; 9]; 512],
    /// `log2_floor[v]`: floor(log2(v)) for v in [1, LOG2_TABLE_SIZE).
    pub log2_floor: [u8; LOG2_TABLE_SIZE],
}

/// Base-3 place values for encoding/decoding a local board.
pub const POW3: [usize; 9] = [1, 3, 9, 27, 81, 243, 729, 2187, 6561];

static TABLES: OnceLock<Tables> = OnceLock::new();

/// Access the shared, lazily-built table set.
pub fn tables() -> &'static Tables {
    TABLES.get_or_init(build_tables)
}

/// Decode a base-3 mini-board encoding into its 9 trits (cell values).
///
/// Cell values: 0 = empty, 1 = X, 2 = O.
pub fn fast_to_slow(mini: usize) -> [u8; 9] {
    let mut out = [0u8; 9];
    let mut m = mini;
    for cell in out.iter_mut() {
        *cell = (m % 3) as u8;
        m /= 3;
    }
    out
}

/// Encode 9 trits back into a base-3 mini-board encoding.
pub fn slow_to_fast(trits: &[u8; 9]) -> usize {
    let mut value = 0usize;
    let mut power = 1usize;
    for &t in trits {
        value += t as usize * power;
        power *= 3;
    }
    value
}

/// The 8 standard 3-in-a-row lines over a 3x3 grid, by cell index.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

fn status_of_trits(trits: &[u8; 9]) -> MiniStatus {
    for line in LINES {
        let [a, b, c] = line;
        if trits[a] != 0 && trits[a] == trits[b] && trits[a] == trits[c] {
            return if trits[a] == 1 {
                MiniStatus::XWon
            } else {
                MiniStatus::OWon
            };
        }
    }
    if trits.iter().all(|&t| t != 0) {
        MiniStatus::Drawn
    } else {
        MiniStatus::Undecided
    }
}

fn build_tables() -> Tables {
    let mut state = Vec::with_capacity(MINI_STATES);
    let mut empty_mask = Vec::with_capacity(MINI_STATES);
    let mut empty_count = Vec::with_capacity(MINI_STATES);
    let mut empty_cells = Vec::with_capacity(MINI_STATES);

    for mini in 0..MINI_STATES {
        let trits = fast_to_slow(mini);
        debug_assert_eq!(slow_to_fast(&trits), mini);

        state.push(status_of_trits(&trits));

        let mut mask: u16 = 0;
        let mut cells = [0u8; CELLS_PER_BOARD];
        let mut count = 0u8;
        for (j, &t) in trits.iter().enumerate() {
            if t == 0 {
                mask |= 1 << j;
                cells[count as usize] = j as u8;
                count += 1;
            }
        }
        empty_mask.push(mask);
        empty_count.push(count);
        empty_cells.push(cells);
    }

    let mut outer = [0u8; TOTAL_CELLS];
    let mut inner = [0u8; TOTAL_CELLS];
    for mv in 0..TOTAL_CELLS {
        let row = mv / 9;
        let col = mv % 9;
        outer[mv] = ((row / 3) * 3 + col / 3) as u8;
        inner[mv] = ((row % 3) * 3 + col % 3) as u8;
    }

    // move_from_gridbit[g] for g = board*9 + cell: invert (outer, inner) -> mv.
    let mut move_from_gridbit = [0u8; TOTAL_CELLS];
    for board in 0..9usize {
        let br = board / 3;
        let bc = board % 3;
        for cell in 0..9usize {
            let kr = cell / 3;
            let kc = cell % 3;
            let row = br * 3 + kr;
            let col = bc * 3 + kc;
            move_from_gridbit[board * 9 + cell] = (row * 9 + col) as u8;
        }
    }

    let mut popcount9 = [0u8; 512];
    let mut nth_set_bit9 = [[0u8; 9]; 512];
    for mask in 0..512usize {
        let mut count = 0u8;
        let mut idx = 0usize;
        for bit in 0..9 {
            if mask & (1 << bit) != 0 {
                nth_set_bit9[mask][idx] = bit as u8;
                idx += 1;
                count += 1;
            }
        }
        popcount9[mask] = count;
    }

    let mut log2_floor = [0u8; LOG2_TABLE_SIZE];
    for (v, slot) in log2_floor.iter_mut().enumerate().skip(1) {
        *slot = (u32::BITS - 1 - (v as u32).leading_zeros()) as u8;
    }

    Tables {
        state,
        empty_mask,
        empty_count,
        empty_cells,
        outer,
        inner,
        move_from_gridbit,
        popcount9,
        nth_set_bit9,
        log2_floor,
    }
}

/// floor(log2(v)) for v >= 1, using the table for small values and a
/// bit-trick fallback (see `constants::LOG2_TABLE_SIZE`) for larger ones.
#[inline]
pub fn log2_floor(v: u32) -> u32 {
    if (v as usize) < LOG2_TABLE_SIZE {
        tables().log2_floor[v as usize] as u32
    } else {
        31 - v.leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_encodings() {
        for mini in 0..MINI_STATES {
            let trits = fast_to_slow(mini);
            assert_eq!(slow_to_fast(&trits), mini);
        }
    }

    #[test]
    fn state_matches_direct_check() {
        for mini in 0..MINI_STATES {
            let trits = fast_to_slow(mini);
            assert_eq!(tables().state[mini], status_of_trits(&trits));
        }
    }

    #[test]
    fn x_wins_top_row() {
        // Cells {0,1,2} = X: encoding = 1 + 3 + 9 = 13.
        let mini = 13;
        assert_eq!(tables().state[mini], MiniStatus::XWon);
        assert_eq!(tables().empty_mask[mini], 0b1_1111_1000);
        assert_eq!(tables().empty_count[mini], 6);
    }

    #[test]
    fn empty_board_is_undecided_and_full() {
        assert_eq!(tables().state[0], MiniStatus::Undecided);
        assert_eq!(tables().empty_mask[0], 0b1_1111_1111);
        assert_eq!(tables().empty_count[0], 9);
    }

    #[test]
    fn popcount_matches_count_ones() {
        for mask in 0..512usize {
            assert_eq!(tables().popcount9[mask] as u32, (mask as u32).count_ones());
        }
    }

    #[test]
    fn nth_set_bit_is_consistent() {
        for mask in 0..512usize {
            let count = tables().popcount9[mask] as usize;
            let mut expected = Vec::new();
            for bit in 0..9 {
                if mask & (1 << bit) != 0 {
                    expected.push(bit as u8);
                }
            }
            assert_eq!(&tables().nth_set_bit9[mask][..count], &expected[..]);
        }
    }

    #[test]
    fn log2_floor_matches_ilog2() {
        for v in 1u32..5000 {
            assert_eq!(log2_floor(v), 31 - v.leading_zeros());
        }
    }
}
