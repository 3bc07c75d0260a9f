//! Two-cell pieces and the ordered list reconstruction produces.

use super::grid::{BoardError, Cell, LabelGrid};
use crate::classify::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A two-cell placement of one color.
///
/// `anchor` is the first matching cell in scan order; `partner` sits
/// directly right of or below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Label shared by both cells.
    pub color: Color,
    /// First cell of the piece in scan order.
    pub anchor: Cell,
    /// The neighbouring cell.
    pub partner: Cell,
}

impl Piece {
    /// Creates a piece.
    pub fn new(color: Color, anchor: Cell, partner: Cell) -> Self {
        Self {
            color,
            anchor,
            partner,
        }
    }

    /// `[[row1, col1], [row2, col2]]`.
    pub fn coords(&self) -> [[usize; 2]; 2] {
        [self.anchor.to_array(), self.partner.to_array()]
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.anchor, self.partner)
    }
}

/// Pieces in palette order, at most one per color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceList {
    pieces: Vec<Piece>,
}

impl PieceList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// Number of pieces.
    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True when no piece was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Pieces in palette order.
    pub fn iter(&self) -> std::slice::Iter<'_, Piece> {
        self.pieces.iter()
    }

    /// The pieces as a slice.
    pub fn as_slice(&self) -> &[Piece] {
        &self.pieces
    }

    /// The piece reconstructed for `color`, if any.
    pub fn get(&self, color: Color) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.color == color)
    }

    /// Coordinates only, in list order.
    pub fn to_coords(&self) -> Vec<[[usize; 2]; 2]> {
        self.pieces.iter().map(Piece::coords).collect()
    }

    /// Draws every piece in its own color onto an otherwise
    /// `background` board of side `size`.
    pub fn paint(&self, size: usize, background: Color) -> Result<LabelGrid, BoardError> {
        let mut grid = LabelGrid::filled(size, background)?;
        for piece in &self.pieces {
            grid.set(piece.anchor, piece.color)?;
            grid.set(piece.partner, piece.color)?;
        }
        Ok(grid)
    }
}

impl FromIterator<Piece> for PieceList {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PieceList {
    type Item = &'a Piece;
    type IntoIter = std::slice::Iter<'a, Piece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}

impl fmt::Display for PieceList {
    /// `[[[r,c],[r,c]],...]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{piece}")?;
        }
        f.write_str("]")
    }
}
