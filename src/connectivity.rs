//! Wall-to-wall clears: a same-colour region seeded on the left wall that
//! reaches the right wall is removed.

use crate::board::{Board, Cell};
use std::collections::VecDeque;

/// Breadth-first bridge finder. Scratch buffers are kept between calls.
#[derive(Debug, Default, Clone)]
pub struct ConnectivityResolver {
    visited: Vec<bool>,
    queue: VecDeque<usize>,
    component: Vec<usize>,
    cleared: Vec<usize>,
    bridges: usize,
}

impl ConnectivityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explores every unvisited grain in column 0 (top to bottom) over
    /// 4-connected same-colour neighbours, then empties each component that
    /// reached column `cols - 1`. Returns the number of cells removed.
    ///
    /// Regions that never touch column 0 are not explored.
    pub fn resolve(&mut self, board: &mut Board) -> usize {
        let cols = board.cols();
        let rows = board.rows();
        self.visited.clear();
        self.visited.resize(cols * rows, false);
        self.cleared.clear();
        self.bridges = 0;
        if cols == 0 {
            return 0;
        }

        for row in 0..rows {
            let seed = board.index(0, row);
            let color = match board.at(seed) {
                Cell::Sand(c) if !self.visited[seed] => c,
                _ => continue,
            };

            self.component.clear();
            self.queue.clear();
            self.queue.push_back(seed);
            self.visited[seed] = true;
            let mut reached_right = false;

            while let Some(i) = self.queue.pop_front() {
                self.component.push(i);
                let (x, y) = (i % cols, i / cols);
                if x == cols - 1 {
                    reached_right = true;
                }
                let neighbours = [
                    (y > 0).then(|| i - cols),
                    (y + 1 < rows).then(|| i + cols),
                    (x > 0).then(|| i - 1),
                    (x + 1 < cols).then(|| i + 1),
                ];
                for n in neighbours.into_iter().flatten() {
                    if !self.visited[n] && board.at(n) == Cell::Sand(color) {
                        self.visited[n] = true;
                        self.queue.push_back(n);
                    }
                }
            }

            if reached_right {
                self.bridges += 1;
                self.cleared.extend_from_slice(&self.component);
            }
        }

        for &i in &self.cleared {
            board.set_at(i, Cell::Empty);
        }
        self.cleared.len()
    }

    /// Flat board indices emptied by the last `resolve`.
    pub fn last_cleared(&self) -> &[usize] {
        &self.cleared
    }

    /// Number of bridging components removed by the last `resolve`.
    pub fn last_bridges(&self) -> usize {
        self.bridges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SandColor;

    #[test]
    fn test_gap_blocks_bridge_then_fill_clears() {
        let mut b = Board::from_rows(&[".....", ".....", ".....", "RR.RR"]);
        let mut r = ConnectivityResolver::new();
        assert_eq!(r.resolve(&mut b), 0);
        assert_eq!(b.grain_count(), 4);

        b.set(2, 3, Cell::Sand(SandColor::Red));
        assert_eq!(r.resolve(&mut b), 5);
        assert_eq!(b.grain_count(), 0);
        assert_eq!(r.last_bridges(), 1);
        assert_eq!(r.last_cleared().len(), 5);
    }

    #[test]
    fn test_right_wall_blob_without_left_member_stays() {
        let mut b = Board::from_rows(&["..RRR", "..RRR", "Y...."]);
        let mut r = ConnectivityResolver::new();
        assert_eq!(r.resolve(&mut b), 0);
        assert_eq!(b.grain_count(), 7);
    }

    #[test]
    fn test_other_colour_does_not_connect() {
        // Red touches both walls only through a yellow cell.
        let mut b = Board::from_rows(&["RRYRR"]);
        assert_eq!(ConnectivityResolver::new().resolve(&mut b), 0);
    }

    #[test]
    fn test_diagonal_contact_does_not_connect() {
        let mut b = Board::from_rows(&["RR...", "..RRR"]);
        assert_eq!(ConnectivityResolver::new().resolve(&mut b), 0);
    }

    #[test]
    fn test_whole_component_is_cleared_including_overhangs() {
        // The bridge is row 2; the column of R above column 3 joins it.
        let mut b = Board::from_rows(&["...R.", "...R.", "RRRRR", "CCCC."]);
        let mut r = ConnectivityResolver::new();
        assert_eq!(r.resolve(&mut b), 7);
        assert_eq!(b, Board::from_rows(&[".....", ".....", ".....", "CCCC."]));
    }

    #[test]
    fn test_multiple_bridges_sum_their_sizes() {
        let mut b = Board::from_rows(&["CCCCC", "YYYYY", "RRRRR", "RP..."]);
        let mut r = ConnectivityResolver::new();
        // Cyan 5 + yellow 5 + red 6 (row 2 plus (0,3)).
        assert_eq!(r.resolve(&mut b), 16);
        assert_eq!(r.last_bridges(), 3);
        assert_eq!(b, Board::from_rows(&[".....", ".....", ".....", ".P..."]));
    }

    #[test]
    fn test_component_seeded_once_even_with_many_left_cells() {
        let mut b = Board::from_rows(&["KKK", "K.K", "KKK"]);
        let mut r = ConnectivityResolver::new();
        assert_eq!(r.resolve(&mut b), 8);
        assert_eq!(r.last_bridges(), 1);
    }

    #[test]
    fn test_resolve_on_empty_board() {
        let mut b = Board::new(6, 4);
        let mut r = ConnectivityResolver::new();
        assert_eq!(r.resolve(&mut b), 0);
        assert!(r.last_cleared().is_empty());
    }

    #[test]
    fn test_visited_state_resets_between_calls() {
        let mut r = ConnectivityResolver::new();
        let mut b = Board::from_rows(&["RR.", "..."]);
        assert_eq!(r.resolve(&mut b), 0);
        b.set(2, 0, Cell::Sand(SandColor::Red));
        assert_eq!(r.resolve(&mut b), 3);
    }
}
