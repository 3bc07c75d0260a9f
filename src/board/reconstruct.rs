//! Piece reconstruction from a labelled board.

use super::grid::{BoardError, Cell, LabelGrid};
use super::piece::{Piece, PieceList};
use crate::classify::{Color, Palette};

/// Turns a label grid into one piece per non-background palette color.
///
/// For each color, in palette order, the anchor is the first cell carrying
/// it in row-major scan order. The partner is the cell to the right of the
/// anchor if it has the same color, otherwise the cell below it. A color
/// with no anchor, or an anchor with neither neighbor matching, yields no
/// piece. Cells of that color elsewhere on the board are never considered,
/// so a color covering more than two cells, or two cells joined only to
/// the left of or above the anchor, is reported at most once or not at all.
#[derive(Debug, Clone, Default)]
pub struct BoardReconstructor {
    palette: Palette,
}

impl BoardReconstructor {
    /// Creates a reconstructor looking for pieces in `palette` order.
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Palette whose non-background labels form pieces.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Reconstructs pieces from a validated grid.
    pub fn reconstruct(&self, grid: &LabelGrid) -> PieceList {
        let mut pieces = PieceList::new();

        for color in self.palette.piece_colors() {
            let Some(anchor) = find_anchor(grid, color) else {
                continue;
            };

            match find_partner(grid, anchor, color) {
                Some(partner) => pieces.push(Piece::new(color, anchor, partner)),
                None => {
                    tracing::debug!(%color, %anchor, "No right or below partner for anchor");
                }
            }
        }

        tracing::trace!(pieces = pieces.len(), "Reconstructed board");
        pieces
    }

    /// Validates raw rows, then reconstructs.
    pub fn reconstruct_rows(&self, rows: &[Vec<Color>]) -> Result<PieceList, BoardError> {
        let grid = LabelGrid::from_rows(rows.to_vec())?;
        Ok(self.reconstruct(&grid))
    }
}

fn find_anchor(grid: &LabelGrid, color: Color) -> Option<Cell> {
    grid.scan().find(|(_, c)| *c == color).map(|(cell, _)| cell)
}

fn find_partner(grid: &LabelGrid, anchor: Cell, color: Color) -> Option<Cell> {
    let right = Cell::new(anchor.row, anchor.col + 1);
    let below = Cell::new(anchor.row + 1, anchor.col);

    [right, below]
        .into_iter()
        .find(|cell| grid.get(*cell) == Some(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board(layout: &str) -> LabelGrid {
        layout.parse().unwrap()
    }

    #[test]
    fn test_horizontal_piece() {
        let grid = board(
            "R R W W W W
             W W W W W W
             W W W W W W
             W W W W W W
             W W W W W W
             W W W W W W",
        );
        let pieces = BoardReconstructor::default().reconstruct(&grid);
        assert_eq!(pieces.to_coords(), vec![[[0, 0], [0, 1]]]);
        assert_eq!(pieces.as_slice()[0].color, Color::Red);
    }

    #[test]
    fn test_vertical_piece_uses_below_rule() {
        let grid = board(
            "W W W W W W
             W W W B W W
             W W W B W W
             W W W W W W
             W W W W W W
             W W W W W W",
        );
        let pieces = BoardReconstructor::default().reconstruct(&grid);
        assert_eq!(pieces.to_coords(), vec![[[1, 3], [2, 3]]]);
    }

    #[test]
    fn test_right_preferred_over_below() {
        let grid = board(
            "G G W
             G W W
             W W W",
        );
        let pieces = BoardReconstructor::default().reconstruct(&grid);
        assert_eq!(pieces.to_coords(), vec![[[0, 0], [0, 1]]]);
    }

    #[test]
    fn test_disconnected_color_omitted() {
        let grid = board(
            "W Y W W
             W W W Y
             Y W W W
             W W Y W",
        );
        assert!(BoardReconstructor::default().reconstruct(&grid).is_empty());
    }

    #[test]
    fn test_partner_left_of_anchor_is_missed() {
        // (1,0)-(1,1) is never considered once (0,1) anchors orange
        let grid = board(
            "W O W
             O O W
             W W W",
        );
        let pieces = BoardReconstructor::default().reconstruct(&grid);
        assert_eq!(pieces.to_coords(), vec![[[0, 1], [1, 1]]]);

        let grid = board(
            "W W O
             W W W
             W O O",
        );
        assert!(BoardReconstructor::default().reconstruct(&grid).is_empty());
    }

    #[test]
    fn test_edges_do_not_wrap() {
        let grid = board(
            "W W R
             R W W
             W W P",
        );
        assert!(BoardReconstructor::default().reconstruct(&grid).is_empty());
    }

    #[test]
    fn test_all_background_is_empty() {
        let grid = LabelGrid::filled(6, Color::White).unwrap();
        assert!(BoardReconstructor::default().reconstruct(&grid).is_empty());
    }

    #[test]
    fn test_output_in_palette_order() {
        let grid = board(
            "B B W W
             W W W W
             W W R W
             W W R W",
        );
        let standard = BoardReconstructor::default().reconstruct(&grid);
        let colors: Vec<_> = standard.iter().map(|p| p.color).collect();
        assert_eq!(colors, vec![Color::Red, Color::Blue]);

        let blue_first = Palette::new(
            vec![Color::Blue, Color::Red, Color::White],
            Color::White,
        )
        .unwrap();
        let reordered = BoardReconstructor::new(blue_first).reconstruct(&grid);
        let colors: Vec<_> = reordered.iter().map(|p| p.color).collect();
        assert_eq!(colors, vec![Color::Blue, Color::Red]);
    }

    #[test]
    fn test_background_choice_changes_output() {
        let grid = board(
            "W W R
             W W R
             Y Y Y",
        );
        let yellow_bg = Palette::new(
            vec![Color::Red, Color::Yellow, Color::White],
            Color::Yellow,
        )
        .unwrap();
        let pieces = BoardReconstructor::new(yellow_bg).reconstruct(&grid);
        assert_eq!(pieces.to_coords(), vec![[[0, 2], [1, 2]], [[0, 0], [0, 1]]]);
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = board("R");
        assert!(BoardReconstructor::default().reconstruct(&grid).is_empty());
    }

    #[test]
    fn test_reconstruct_rows_validates() {
        let reconstructor = BoardReconstructor::default();
        assert_eq!(reconstructor.reconstruct_rows(&[]), Err(BoardError::Empty));
        assert!(matches!(
            reconstructor.reconstruct_rows(&[vec![Color::Red, Color::Red]]),
            Err(BoardError::NotSquare { expected: 1, found: 2, .. })
        ));

        let rows = vec![vec![Color::Red, Color::Red], vec![Color::White, Color::White]];
        assert_eq!(
            reconstructor.reconstruct_rows(&rows).unwrap().to_coords(),
            vec![[[0, 0], [0, 1]]]
        );
    }

    #[test]
    fn test_rush_hour_layout() {
        let grid = board(
            "W R R W W W
             W W W W O W
             Y Y W W O W
             W W W W W W
             G W P P W W
             G W W W B B",
        );
        let pieces = BoardReconstructor::default().reconstruct(&grid);
        assert_eq!(
            pieces.to_string(),
            "[[[0,1],[0,2]],[[1,4],[2,4]],[[2,0],[2,1]],[[4,0],[5,0]],[[5,4],[5,5]],[[4,2],[4,3]]]"
        );
        assert_eq!(pieces.paint(6, Color::White).unwrap(), grid);
    }

    fn any_grid() -> impl Strategy<Value = LabelGrid> {
        (1usize..8).prop_flat_map(|size| {
            proptest::collection::vec(proptest::sample::select(Color::ALL.to_vec()), size * size)
                .prop_map(move |cells| LabelGrid::from_cells(size, cells))
        })
    }

    proptest! {
        #[test]
        fn prop_pieces_are_valid_and_stable(grid in any_grid()) {
            let reconstructor = BoardReconstructor::default();
            let pieces = reconstructor.reconstruct(&grid);

            prop_assert_eq!(&pieces, &reconstructor.reconstruct(&grid));
            prop_assert!(pieces.len() <= 6);

            let mut last_rank = None;
            for piece in &pieces {
                prop_assert!(piece.color != Color::White);
                prop_assert!(piece.anchor.is_adjacent(piece.partner));
                prop_assert!(piece.anchor < piece.partner);
                prop_assert_eq!(grid.get(piece.anchor), Some(piece.color));
                prop_assert_eq!(grid.get(piece.partner), Some(piece.color));

                let rank = Color::ALL.iter().position(|c| *c == piece.color);
                prop_assert!(rank > last_rank);
                last_rank = rank;
            }
        }
    }
}
