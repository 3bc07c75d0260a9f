//! Board model and piece reconstruction.
//!
//! A board is a square grid of color labels. Reconstruction scans it once
//! per palette color and reports at most one two-cell piece for each.

mod grid;
mod piece;
mod reconstruct;

pub use grid::{BoardError, Cell, LabelGrid};
pub use piece::{Piece, PieceList};
pub use reconstruct::BoardReconstructor;
