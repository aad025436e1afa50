//! Granular flow: one bottom-up pass moving each grain down, or diagonally down
//! when the cell below is taken.

use crate::board::Board;
use crate::random::Randomness;

/// Advances every settled grain by at most one cell.
///
/// Rows run from `rows - 2` up to 0, columns left to right. A grain falls
/// straight down if it can; otherwise it slides to an open lower diagonal,
/// and when both are open `rng.coin()` picks left. Grains that moved land on
/// an already-visited row, so nothing moves twice in one pass.
///
/// Returns whether any grain moved.
pub fn step<R: Randomness + ?Sized>(board: &mut Board, rng: &mut R) -> bool {
    let cols = board.cols();
    let rows = board.rows();
    if rows < 2 {
        return false;
    }
    let mut moved = false;
    for row in (0..rows - 1).rev() {
        for col in 0..cols {
            let here = board.index(col, row);
            if board.at(here).is_empty() {
                continue;
            }
            let below = here + cols;
            if board.at(below).is_empty() {
                board.shift(here, below);
                moved = true;
                continue;
            }
            let can_left = col > 0 && board.at(below - 1).is_empty();
            let can_right = col + 1 < cols && board.at(below + 1).is_empty();
            let target = match (can_left, can_right) {
                (true, true) => {
                    if rng.coin() {
                        below - 1
                    } else {
                        below + 1
                    }
                }
                (true, false) => below - 1,
                (false, true) => below + 1,
                (false, false) => continue,
            };
            board.shift(here, target);
            moved = true;
        }
    }
    moved
}
