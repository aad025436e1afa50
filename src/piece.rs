//! Falling pieces: scaled tetromino masks, clockwise rotation, random spawning.

use crate::board::{PALETTE, SandColor};
use crate::random::Randomness;

/// Each tetromino block is BLOCK_SCALE x BLOCK_SCALE grains.
pub const BLOCK_SCALE: usize = 6;

/// Largest side of any scaled shape (the I piece's 4x4 box).
pub const MAX_SHAPE_DIM: usize = 4 * BLOCK_SCALE;

const I_BLOCKS: &[&[u8]] = &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]];
const J_BLOCKS: &[&[u8]] = &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]];
const L_BLOCKS: &[&[u8]] = &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]];
const O_BLOCKS: &[&[u8]] = &[&[1, 1], &[1, 1]];
const S_BLOCKS: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]];
const T_BLOCKS: &[&[u8]] = &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]];
const Z_BLOCKS: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]];

/// Tetromino kinds (I, J, L, O, S, T, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [Self::I, Self::J, Self::L, Self::O, Self::S, Self::T, Self::Z];

    /// Unscaled occupancy, row by row, in its spawn orientation.
    pub fn blocks(self) -> &'static [&'static [u8]] {
        match self {
            Self::I => I_BLOCKS,
            Self::J => J_BLOCKS,
            Self::L => L_BLOCKS,
            Self::O => O_BLOCKS,
            Self::S => S_BLOCKS,
            Self::T => T_BLOCKS,
            Self::Z => Z_BLOCKS,
        }
    }

    /// Spawn-orientation mask with every block expanded to BLOCK_SCALE grains.
    pub fn scaled_shape(self) -> Shape {
        Shape::scaled(self.blocks(), BLOCK_SCALE)
    }
}

/// Fixed-capacity occupancy mask; `width`/`height` bound the live region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

impl Shape {
    pub fn empty(width: usize, height: usize) -> Self {
        assert!(
            width <= MAX_SHAPE_DIM && height <= MAX_SHAPE_DIM,
            "shape {width}x{height} exceeds {MAX_SHAPE_DIM}"
        );
        Self {
            width,
            height,
            cells: [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
        }
    }

    /// Expands a block mask so each set entry covers `scale x scale` cells.
    pub fn scaled(blocks: &[&[u8]], scale: usize) -> Self {
        let h = blocks.len();
        let w = blocks.first().map_or(0, |r| r.len());
        let mut shape = Self::empty(w * scale, h * scale);
        for (y, row) in blocks.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        shape.cells[y * scale + dy][x * scale + dx] = true;
                    }
                }
            }
        }
        shape
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row][col]
    }

    /// Occupied cells as `(row, col)` within the mask.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |r| {
            (0..self.width)
                .filter(move |&c| self.cells[r][c])
                .map(move |c| (r, c))
        })
    }

    pub fn count(&self) -> usize {
        self.occupied().count()
    }

    /// 90° clockwise: an N-row, M-column mask becomes M rows by N columns
    /// with `new[c][N - 1 - r] = old[r][c]`.
    pub fn rotated_cw(&self) -> Self {
        let n = self.height;
        let mut out = Self::empty(n, self.width);
        for r in 0..n {
            for c in 0..self.width {
                out.cells[c][n - 1 - r] = self.cells[r][c];
            }
        }
        out
    }
}

/// Active falling piece. `col`/`row` anchor the mask's top-left corner on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub color: SandColor,
    pub shape: Shape,
    pub col: i32,
    pub row: i32,
}

impl Piece {
    pub fn new(kind: TetrominoKind, color: SandColor, board_cols: usize) -> Self {
        let shape = kind.scaled_shape();
        Self {
            kind,
            color,
            col: spawn_col(board_cols, shape.width()),
            row: 0,
            shape,
        }
    }

    /// Board positions of occupied cells as `(col, row)`; may be out of bounds.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(move |(r, c)| (self.col + c as i32, self.row + r as i32))
    }

    /// Horizontally centred at the top of a board `board_cols` wide.
    pub fn respawned(&self, board_cols: usize) -> Self {
        Self {
            col: spawn_col(board_cols, self.shape.width()),
            row: 0,
            ..self.clone()
        }
    }
}

/// `floor((cols - width) / 2)`.
fn spawn_col(board_cols: usize, width: usize) -> i32 {
    (board_cols as i32 - width as i32).div_euclid(2)
}

/// Produces uniformly random pieces centred on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceFactory {
    cols: usize,
}

impl PieceFactory {
    pub fn new(board_cols: usize) -> Self {
        Self { cols: board_cols }
    }

    /// Shape first, then colour, each uniform.
    pub fn next<R: Randomness + ?Sized>(&self, rng: &mut R) -> Piece {
        let kind = TetrominoKind::ALL[rng.below(TetrominoKind::ALL.len())];
        let color = PALETTE[rng.below(PALETTE.len())];
        Piece::new(kind, color, self.cols)
    }
}
