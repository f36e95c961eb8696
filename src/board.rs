//! Board model: a fixed-size grid of cells stored row-major.
//!
//! Points are `(x, y)` pairs where `x` is the column and `y` the row counted
//! from the top edge. Human-facing names follow the Go convention: columns
//! `A`..`T` skipping `I`, rows numbered from the bottom edge (`A1` is the
//! lower-left corner).

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-character marker used in board serialization.
    pub fn symbol(self) -> char {
        match self {
            Color::Black => 'X',
            Color::White => 'O',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("black"),
            Color::White => f.write_str("white"),
        }
    }
}

pub type Point = (usize, usize);

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            cells: self.cells.clone(),
        }
    }

    // Playouts copy boards every step; reuse the existing allocation.
    fn clone_from(&mut self, source: &Self) {
        self.size = source.size;
        self.cells.clone_from(&source.cells);
    }
}

impl Board {
    /// Create an empty `size`×`size` board.
    ///
    /// Games only use the sizes in [`crate::constants::SUPPORTED_SIZES`]; the
    /// board itself accepts any positive size.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from rows of `.`, `X` (black) and `O` (white).
    ///
    /// Returns `None` unless the rows form a square of known symbols.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        if size == 0 {
            return None;
        }
        let mut board = Board::new(size);
        for (y, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != size {
                return None;
            }
            for (x, ch) in symbols.into_iter().enumerate() {
                let cell = match ch {
                    '.' => None,
                    'X' => Some(Color::Black),
                    'O' => Some(Color::White),
                    _ => return None,
                };
                board.set((x, y), cell);
            }
        }
        Some(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of points on the board.
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, (x, y): Point) -> bool {
        x < self.size && y < self.size
    }

    /// Cell id of a point (`y * size + x`).
    #[inline]
    pub fn index(&self, (x, y): Point) -> usize {
        y * self.size + x
    }

    #[inline]
    pub fn point(&self, index: usize) -> Point {
        (index % self.size, index / self.size)
    }

    /// Stone at a point; `None` for empty or off-board points.
    #[inline]
    pub fn get(&self, p: Point) -> Option<Color> {
        if !self.contains(p) {
            return None;
        }
        self.cells[self.index(p)]
    }

    pub fn is_empty_at(&self, p: Point) -> bool {
        self.contains(p) && self.cells[self.index(p)].is_none()
    }

    /// Overwrite a cell without any rule checks. Off-board points are ignored.
    pub fn set(&mut self, p: Point, cell: Option<Color>) {
        if self.contains(p) {
            let i = self.index(p);
            self.cells[i] = cell;
        }
    }

    /// Orthogonal neighbors of a point that lie on the board.
    pub fn neighbors(&self, (x, y): Point) -> impl Iterator<Item = Point> + use<> {
        let s = self.size;
        [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ]
        .into_iter()
        .filter(move |&(nx, ny)| nx < s && ny < s)
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let s = self.size;
        (0..s * s).map(move |i| (i % s, i / s))
    }

    pub fn cells(&self) -> &[Option<Color>] {
        &self.cells
    }

    pub fn count_stones(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Empty points in row-major order, appended to `out` after clearing it.
    pub fn empty_points_into(&self, out: &mut Vec<Point>) {
        out.clear();
        out.extend(
            self.cells
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_none())
                .map(|(i, _)| (i % self.size, i / self.size)),
        );
    }

    /// One character per cell, row-major: `.` empty, `X` black, `O` white.
    pub fn serialize(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.map_or('.', Color::symbol))
            .collect()
    }
}

/// Column letters, skipping `I` (Go convention to avoid confusion with `J`).
const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Parse a point name such as `D4` on a board of the given size.
pub fn parse_point(s: &str, size: usize) -> Option<Point> {
    let s = s.trim();
    let mut chars = s.chars();
    let col_char = chars.next()?.to_ascii_uppercase();
    let x = COLUMNS.iter().position(|&c| c as char == col_char)?;
    let row: usize = chars.as_str().parse().ok()?;
    if row == 0 || row > size || x >= size {
        return None;
    }
    Some((x, size - row))
}

/// Name of a point, e.g. `D4`.
pub fn point_name((x, y): Point, size: usize) -> String {
    let col = COLUMNS.get(x).map_or('?', |&c| c as char);
    format!("{col}{}", size.saturating_sub(y))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..self.size {
            let col = COLUMNS.get(x).map_or('?', |&c| c as char);
            write!(f, "{col} ")?;
        }
        writeln!(f)?;
        for y in 0..self.size {
            write!(f, "{:>2} ", self.size - y)?;
            for x in 0..self.size {
                let ch = self.get((x, y)).map_or('.', Color::symbol);
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(9);
        assert_eq!(board.area(), 81);
        assert_eq!(board.count_empty(), 81);
        assert_eq!(board.serialize(), ".".repeat(81));
    }

    #[test]
    fn test_neighbors_at_corner_and_center() {
        let board = Board::new(9);
        let corner: Vec<Point> = board.neighbors((0, 0)).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        assert_eq!(board.neighbors((4, 4)).count(), 4);
        assert_eq!(board.neighbors((8, 4)).count(), 3);
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&["X.O", "...", "..X"]).unwrap();
        assert_eq!(board.get((0, 0)), Some(Color::Black));
        assert_eq!(board.get((2, 0)), Some(Color::White));
        assert_eq!(board.get((2, 2)), Some(Color::Black));
        assert_eq!(board.serialize(), "X.O.....X");
        assert!(Board::from_rows(&["X.", "..."]).is_none());
        assert!(Board::from_rows(&["X?", ".."]).is_none());
        assert!(Board::from_rows(&[]).is_none());
    }

    #[test]
    fn test_point_names() {
        assert_eq!(parse_point("A1", 9), Some((0, 8)));
        assert_eq!(parse_point("J9", 9), Some((8, 0)));
        assert_eq!(parse_point("d4", 9), Some((3, 5)));
        assert_eq!(parse_point("I5", 9), None);
        assert_eq!(parse_point("K1", 9), None);
        assert_eq!(parse_point("A10", 9), None);
        assert_eq!(point_name((3, 5), 9), "D4");
        assert_eq!(point_name((8, 0), 9), "J9");
        for p in Board::new(19).points() {
            assert_eq!(parse_point(&point_name(p, 19), 19), Some(p));
        }
    }

    #[test]
    fn test_get_off_board() {
        let board = Board::new(9);
        assert_eq!(board.get((9, 0)), None);
        assert!(!board.is_empty_at((0, 9)));
    }
}
