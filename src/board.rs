//! Board: dense grid of sand grains, indexed `row * cols + col`, row 0 at the top.

/// Grain colours. Only equality matters to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SandColor {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

/// Colours pieces are drawn from. Kept small so bridges are reachable.
pub const PALETTE: [SandColor; 5] = [
    SandColor::Red,
    SandColor::Yellow,
    SandColor::Cyan,
    SandColor::Purple,
    SandColor::Pink,
];

impl SandColor {
    /// Display colour as (r, g, b).
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Red => (0xff, 0x4d, 0x4d),
            Self::Orange => (0xff, 0x9f, 0x43),
            Self::Yellow => (0xfe, 0xca, 0x57),
            Self::Green => (0x1d, 0xd1, 0xa1),
            Self::Cyan => (0x48, 0xdb, 0xfb),
            Self::Blue => (0x54, 0xa0, 0xff),
            Self::Purple => (0xa2, 0x9b, 0xfe),
            Self::Pink => (0xff, 0x9f, 0xf3),
        }
    }
}

/// Single cell: either empty or one grain of one colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Sand(SandColor),
}

impl Cell {
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub const fn color(self) -> Option<SandColor> {
        match self {
            Self::Empty => None,
            Self::Sand(c) => Some(c),
        }
    }
}

/// Settled sand. Callers pass in-bounds coordinates; bounds are checked in
/// debug builds only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        debug_assert!(
            col < self.cols && row < self.rows,
            "({col}, {row}) outside {}x{} board",
            self.cols,
            self.rows
        );
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Cell {
        self.cells[self.index(col, row)]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, cell: Cell) {
        let i = self.index(col, row);
        self.cells[i] = cell;
    }

    /// Cell by flat index.
    #[inline]
    pub fn at(&self, index: usize) -> Cell {
        self.cells[index]
    }

    #[inline]
    pub fn set_at(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Moves the grain at `from` into `to`, leaving `from` empty.
    #[inline]
    pub(crate) fn shift(&mut self, from: usize, to: usize) {
        self.cells[to] = self.cells[from];
        self.cells[from] = Cell::Empty;
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Row-major iteration as `(col, row, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i % cols, i / cols, c))
    }

    /// Number of occupied cells.
    pub fn grain_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Parses rows of characters (one string per row): `.` is empty,
    /// `R O Y G C B P K` map to the colours in declaration order.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut board = Self::new(cols, rows.len());
        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.len(), cols, "ragged row {row}");
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '.' => Cell::Empty,
                    'R' => Cell::Sand(SandColor::Red),
                    'O' => Cell::Sand(SandColor::Orange),
                    'Y' => Cell::Sand(SandColor::Yellow),
                    'G' => Cell::Sand(SandColor::Green),
                    'C' => Cell::Sand(SandColor::Cyan),
                    'B' => Cell::Sand(SandColor::Blue),
                    'P' => Cell::Sand(SandColor::Purple),
                    'K' => Cell::Sand(SandColor::Pink),
                    other => panic!("unknown cell {other:?}"),
                };
                board.set(col, row, cell);
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let b = Board::new(7, 5);
        assert_eq!((b.cols(), b.rows()), (7, 5));
        assert!(b.iter().all(|(_, _, c)| c == Cell::Empty));
        assert_eq!(b.grain_count(), 0);
    }

    #[test]
    fn test_set_get_row_major_layout() {
        let mut b = Board::new(4, 3);
        b.set(3, 1, Cell::Sand(SandColor::Cyan));
        assert_eq!(b.get(3, 1), Cell::Sand(SandColor::Cyan));
        assert_eq!(b.at(7), Cell::Sand(SandColor::Cyan));
        assert_eq!(b.index(3, 1), 7);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut b = Board::from_rows(&["RY", "CP"]);
        assert_eq!(b.grain_count(), 4);
        b.clear();
        assert_eq!(b.grain_count(), 0);
    }

    #[test]
    fn test_iter_reports_coordinates() {
        let b = Board::from_rows(&["..", ".K"]);
        let occupied: Vec<_> = b.iter().filter(|(_, _, c)| !c.is_empty()).collect();
        assert_eq!(occupied, vec![(1, 1, Cell::Sand(SandColor::Pink))]);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_access_panics() {
        let b = Board::new(3, 3);
        let _ = b.get(0, 3);
    }

    #[test]
    fn test_palette_colours_are_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in &PALETTE[i + 1..] {
                assert_ne!(a, b);
                assert_ne!(a.rgb(), b.rgb());
            }
        }
    }
}
