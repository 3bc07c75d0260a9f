//! Square grid of cell labels.

use crate::classify::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// No rows at all.
    #[error("grid is empty, expected at least 1x1")]
    Empty,
    /// A row's length differs from the number of rows.
    #[error("row {row} has {found} cells, expected {expected} for a {expected}x{expected} grid")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Number of rows.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A coordinate lies past the grid edge.
    #[error("cell {cell} lies outside a {size}x{size} grid")]
    CellOutOfBounds {
        /// The offending coordinate.
        cell: Cell,
        /// Side length of the grid.
        size: usize,
    },
    /// A layout token is not a label name or initial.
    #[error("line {line}: {token:?} is not a color label")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The token as written.
        token: String,
    },
}

/// A grid coordinate, row first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Row index, 0 at the top.
    pub row: usize,
    /// Column index, 0 at the left.
    pub col: usize,
}

impl Cell {
    /// Creates a coordinate.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// `[row, col]`.
    pub fn to_array(self) -> [usize; 2] {
        [self.row, self.col]
    }

    /// True when the two cells share a side.
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// An NxN grid of labels stored row-major.
///
/// Serializes as a list of rows; deserialization goes through
/// [`LabelGrid::from_rows`], so malformed input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Color>>", into = "Vec<Vec<Color>>")]
pub struct LabelGrid {
    size: usize,
    cells: Vec<Color>,
}

impl LabelGrid {
    /// Builds a grid from rows, rejecting empty or non-square input.
    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, labels) in rows.into_iter().enumerate() {
            if labels.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    expected: size,
                    found: labels.len(),
                });
            }
            cells.extend(labels);
        }

        Ok(Self { size, cells })
    }

    /// A grid with every cell set to `color`.
    pub fn filled(size: usize, color: Color) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::Empty);
        }
        Ok(Self {
            size,
            cells: vec![color; size * size],
        })
    }

    /// Wraps an already row-major cell buffer of `size * size` labels.
    pub(crate) fn from_cells(size: usize, cells: Vec<Color>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Label at `cell`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<Color> {
        if cell.row < self.size && cell.col < self.size {
            Some(self.cells[cell.row * self.size + cell.col])
        } else {
            None
        }
    }

    /// Overwrites the label at `cell`.
    pub fn set(&mut self, cell: Cell, color: Color) -> Result<(), BoardError> {
        if cell.row >= self.size || cell.col >= self.size {
            return Err(BoardError::CellOutOfBounds {
                cell,
                size: self.size,
            });
        }
        self.cells[cell.row * self.size + cell.col] = color;
        Ok(())
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.cells.chunks(self.size)
    }

    /// Cells with their labels in row-major scan order.
    pub fn scan(&self) -> impl Iterator<Item = (Cell, Color)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (Cell::new(i / size, i % size), *c))
    }

    /// Number of cells carrying `color`.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|c| **c == color).count()
    }
}

impl TryFrom<Vec<Vec<Color>>> for LabelGrid {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Color>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<LabelGrid> for Vec<Vec<Color>> {
    fn from(grid: LabelGrid) -> Self {
        grid.rows().map(<[Color]>::to_vec).collect()
    }
}

impl fmt::Display for LabelGrid {
    /// One row per line, names separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, color) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for LabelGrid {
    type Err = BoardError;

    /// Parses whitespace-separated labels, one row per non-blank line.
    /// Lines starting with `#` are comments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (i, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<Color>().map_err(|_| BoardError::Parse {
                        line: i + 1,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(LabelGrid::from_rows(vec![]), Err(BoardError::Empty));
        assert_eq!(LabelGrid::filled(0, Color::White), Err(BoardError::Empty));
    }

    #[test]
    fn test_rejects_non_square() {
        let rows = vec![vec![Color::White; 3], vec![Color::White; 2], vec![Color::White; 3]];
        assert_eq!(
            LabelGrid::from_rows(rows),
            Err(BoardError::NotSquare {
                row: 1,
                expected: 3,
                found: 2
            })
        );

        let wide = vec![vec![Color::White; 3], vec![Color::White; 3]];
        assert!(matches!(
            LabelGrid::from_rows(wide),
            Err(BoardError::NotSquare { row: 0, .. })
        ));
    }

    #[test]
    fn test_get_and_set() {
        let mut grid = LabelGrid::filled(3, Color::White).unwrap();
        grid.set(Cell::new(2, 1), Color::Red).unwrap();
        assert_eq!(grid.get(Cell::new(2, 1)), Some(Color::Red));
        assert_eq!(grid.get(Cell::new(3, 0)), None);
        assert_eq!(grid.get(Cell::new(0, 3)), None);
        assert!(grid.set(Cell::new(0, 3), Color::Red).is_err());
        assert_eq!(grid.count(Color::Red), 1);
        assert_eq!(grid.count(Color::White), 8);
    }

    #[test]
    fn test_parse_layout() {
        let grid: LabelGrid = "# board\nR R W\nW W B\n\nW W B\n".parse().unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.get(Cell::new(0, 1)), Some(Color::Red));
        assert_eq!(grid.get(Cell::new(2, 2)), Some(Color::Blue));

        let err = "R W\nW X\n".parse::<LabelGrid>().unwrap_err();
        assert_eq!(
            err,
            BoardError::Parse {
                line: 2,
                token: "X".to_string()
            }
        );
    }

    #[test]
    fn test_display_parses_back() {
        let grid: LabelGrid = "red white\norange white".parse().unwrap();
        assert_eq!(grid.to_string(), "red white\norange white");
        assert_eq!(grid.to_string().parse::<LabelGrid>().unwrap(), grid);
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Layout {
        board: LabelGrid,
    }

    #[test]
    fn test_deserialize_validates_shape() {
        let layout: Layout =
            toml::from_str(r#"board = [["red", "red"], ["white", "blue"]]"#).unwrap();
        assert_eq!(layout.board.get(Cell::new(1, 1)), Some(Color::Blue));
        let text = toml::to_string(&layout).unwrap();
        assert_eq!(toml::from_str::<Layout>(&text).unwrap().board, layout.board);

        let err = toml::from_str::<Layout>(r#"board = [["red", "red"], ["white"]]"#).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 cells"), "{err}");
        assert!(toml::from_str::<Layout>("board = []").is_err());

        // The raw field layout is not accepted either
        assert!(toml::from_str::<Layout>("[board]\nsize = 3\ncells = [\"red\"]").is_err());
        assert!(toml::from_str::<Layout>("[board]\nsize = 0\ncells = [\"red\"]").is_err());
    }

    #[test]
    fn test_scan_is_row_major() {
        let grid = LabelGrid::filled(2, Color::White).unwrap();
        let cells: Vec<_> = grid.scan().map(|(cell, _)| cell).collect();
        assert_eq!(
            cells,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_adjacency() {
        assert!(Cell::new(1, 1).is_adjacent(Cell::new(1, 2)));
        assert!(Cell::new(1, 1).is_adjacent(Cell::new(0, 1)));
        assert!(!Cell::new(1, 1).is_adjacent(Cell::new(2, 2)));
        assert!(!Cell::new(1, 1).is_adjacent(Cell::new(1, 1)));
    }
}
