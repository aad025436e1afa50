//! Piece placement test against board bounds and settled sand.

use crate::board::Board;
use crate::piece::Piece;

/// True if `piece`, shifted by `(d_col, d_row)`, would leave the side or bottom
/// walls or overlap sand. Cells above row 0 only get the wall checks: pieces
/// spawn partly above the visible board.
pub fn collides(board: &Board, piece: &Piece, d_col: i32, d_row: i32) -> bool {
    let cols = board.cols() as i32;
    let rows = board.rows() as i32;
    piece.cells().any(|(c, r)| {
        let col = c + d_col;
        let row = r + d_row;
        if col < 0 || col >= cols || row >= rows {
            return true;
        }
        row >= 0 && !board.get(col as usize, row as usize).is_empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, SandColor};
    use crate::piece::{BLOCK_SCALE, TetrominoKind};

    fn o_piece(col: i32, row: i32) -> Piece {
        let mut p = Piece::new(TetrominoKind::O, SandColor::Red, 60);
        p.col = col;
        p.row = row;
        p
    }

    #[test]
    fn test_free_space_does_not_collide() {
        let board = Board::new(60, 100);
        assert!(!collides(&board, &o_piece(10, 10), 0, 0));
        assert!(!collides(&board, &o_piece(10, 10), 1, 1));
    }

    #[test]
    fn test_side_walls_collide() {
        let board = Board::new(60, 100);
        let size = 2 * BLOCK_SCALE as i32;
        assert!(collides(&board, &o_piece(0, 10), -1, 0));
        assert!(!collides(&board, &o_piece(60 - size, 10), 0, 0));
        assert!(collides(&board, &o_piece(60 - size, 10), 1, 0));
    }

    #[test]
    fn test_floor_collides() {
        let board = Board::new(60, 100);
        let size = 2 * BLOCK_SCALE as i32;
        assert!(!collides(&board, &o_piece(5, 100 - size), 0, 0));
        assert!(collides(&board, &o_piece(5, 100 - size), 0, 1));
    }

    #[test]
    fn test_cells_above_top_skip_occupancy_only() {
        let mut board = Board::new(60, 100);
        board.set(5, 0, Cell::Sand(SandColor::Cyan));
        // Entirely above the board: no occupancy check, so no hit.
        assert!(!collides(&board, &o_piece(5, -20), 0, 0));
        // Still walled in horizontally while above the top.
        assert!(collides(&board, &o_piece(-1, -20), 0, 0));
        // Overlapping row 0 hits the sand.
        assert!(collides(&board, &o_piece(5, -11), 0, 0));
    }

    #[test]
    fn test_sand_collides_only_under_occupied_mask_cells() {
        let mut board = Board::new(60, 100);
        // I piece: occupied rows are BLOCK_SCALE..2*BLOCK_SCALE of its mask.
        let mut i = Piece::new(TetrominoKind::I, SandColor::Red, 60);
        i.row = 20;
        board.set(i.col as usize, 20, Cell::Sand(SandColor::Pink));
        assert!(!collides(&board, &i, 0, 0), "top rows of the I mask are empty");
        board.set(i.col as usize, 20 + BLOCK_SCALE, Cell::Sand(SandColor::Pink));
        assert!(collides(&board, &i, 0, 0));
    }
}
