//! Board placement within a frame.

use super::SamplingError;

/// Pixel rectangle, half-open on the right and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    /// Left edge, inclusive.
    pub x0: u32,
    /// Top edge, inclusive.
    pub y0: u32,
    /// Right edge, exclusive.
    pub x1: u32,
    /// Bottom edge, exclusive.
    pub y1: u32,
}

impl CellRect {
    /// True when `(x, y)` lies inside the rectangle.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.x1 - self.x0) * u64::from(self.y1 - self.y0)
    }
}

/// Where the board and its cells sit inside a frame.
///
/// The board is the largest square centered in the frame. It is split into
/// `grid_size` equal cells per side by integer division; leftover pixels
/// along the right and bottom edges of the square belong to no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    /// Left edge of the board square.
    pub left: u32,
    /// Top edge of the board square.
    pub top: u32,
    /// Side length of the board square.
    pub side: u32,
    /// Side length of one cell.
    pub cell: u32,
    /// Cells per side.
    pub grid_size: usize,
}

impl BoardGeometry {
    /// Places an NxN board in a `width` x `height` frame.
    pub fn new(width: u32, height: u32, grid_size: usize) -> Result<Self, SamplingError> {
        if grid_size == 0 {
            return Err(SamplingError::ZeroGridSize);
        }

        let side = width.min(height);
        let cell = u32::try_from(grid_size)
            .map(|n| side / n)
            .unwrap_or(0);
        if cell == 0 {
            return Err(SamplingError::FrameTooSmall {
                width,
                height,
                grid_size,
            });
        }

        Ok(Self {
            left: (width - side) / 2,
            top: (height - side) / 2,
            side,
            cell,
            grid_size,
        })
    }

    /// Pixel rectangle covered by cell `(row, col)`.
    pub fn cell_rect(&self, row: usize, col: usize) -> CellRect {
        let x0 = self.left + col as u32 * self.cell;
        let y0 = self.top + row as u32 * self.cell;
        CellRect {
            x0,
            y0,
            x1: x0 + self.cell,
            y1: y0 + self.cell,
        }
    }

    /// True when `(x, y)` lies inside the board square.
    pub fn in_board(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.left + self.side && y >= self.top && y < self.top + self.side
    }

    /// Cell containing `(x, y)`, or `None` in the margin or remainder strip.
    pub fn cell_at(&self, x: u32, y: u32) -> Option<(usize, usize)> {
        if !self.in_board(x, y) {
            return None;
        }
        let col = ((x - self.left) / self.cell) as usize;
        let row = ((y - self.top) / self.cell) as usize;
        (row < self.grid_size && col < self.grid_size).then_some((row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_crop() {
        let geometry = BoardGeometry::new(640, 480, 6).unwrap();
        assert_eq!(geometry.left, 80);
        assert_eq!(geometry.top, 0);
        assert_eq!(geometry.side, 480);
        assert_eq!(geometry.cell, 80);
        assert_eq!(
            geometry.cell_rect(5, 5),
            CellRect {
                x0: 480,
                y0: 400,
                x1: 560,
                y1: 480
            }
        );
    }

    #[test]
    fn test_portrait_crop_with_remainder() {
        let geometry = BoardGeometry::new(100, 131, 6).unwrap();
        assert_eq!(geometry.left, 0);
        assert_eq!(geometry.top, 15);
        assert_eq!(geometry.cell, 16);
        // 6 * 16 = 96, so columns 96..100 are remainder
        assert_eq!(geometry.cell_at(97, 20), None);
        assert_eq!(geometry.cell_at(95, 15), Some((0, 5)));
        assert_eq!(geometry.cell_at(0, 14), None);
    }

    #[test]
    fn test_too_small() {
        assert!(matches!(
            BoardGeometry::new(5, 100, 6),
            Err(SamplingError::FrameTooSmall { .. })
        ));
        assert!(matches!(
            BoardGeometry::new(100, 100, 0),
            Err(SamplingError::ZeroGridSize)
        ));
    }

    #[test]
    fn test_rect_membership() {
        let geometry = BoardGeometry::new(12, 12, 3).unwrap();
        let rect = geometry.cell_rect(1, 2);
        assert_eq!(rect.area(), 16);
        assert!(rect.contains(8, 4));
        assert!(!rect.contains(12, 4));
        assert_eq!(geometry.cell_at(8, 4), Some((1, 2)));
    }
}
