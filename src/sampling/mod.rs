//! Per-cell color sampling.
//!
//! Crops the board square out of a frame, splits it into an NxN grid and
//! averages each cell's pixels into one [`ColorSample`]. The result feeds
//! the classifier.

mod geometry;

pub use geometry::{BoardGeometry, CellRect};

use crate::capture::{Frame, CHANNELS};
use crate::classify::ColorSample;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while sampling a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplingError {
    /// The grid has no cells.
    #[error("grid size must be at least 1")]
    ZeroGridSize,
    /// Cells would be less than one pixel wide.
    #[error("{width}x{height} frame is too small for a {grid_size}x{grid_size} grid")]
    FrameTooSmall {
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
        /// Requested cells per side.
        grid_size: usize,
    },
    /// The pixel buffer does not match the frame dimensions.
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    InvalidFrame {
        /// Bytes implied by the dimensions.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },
    /// A sample grid row does not match the number of rows.
    #[error("sample row {row} has {found} cells, expected {expected}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Number of rows, and so the required row length.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
}

/// An NxN grid of averaged cell colors, row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleGrid {
    size: usize,
    samples: Vec<ColorSample>,
}

impl SampleGrid {
    /// Builds a grid from rows of samples, rejecting empty or non-square input.
    pub fn from_rows(rows: Vec<Vec<ColorSample>>) -> Result<Self, SamplingError> {
        let size = rows.len();
        if size == 0 {
            return Err(SamplingError::ZeroGridSize);
        }

        let mut samples = Vec::with_capacity(size * size);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != size {
                return Err(SamplingError::NotSquare {
                    row,
                    expected: size,
                    found: cells.len(),
                });
            }
            samples.extend(cells);
        }

        Ok(Self { size, samples })
    }

    /// Cells per side.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sample of cell `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<&ColorSample> {
        if row < self.size && col < self.size {
            self.samples.get(row * self.size + col)
        } else {
            None
        }
    }

    /// Samples in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColorSample> {
        self.samples.iter()
    }
}

/// Averages board cells out of frames.
#[derive(Debug, Clone)]
pub struct BoardSampler {
    grid_size: usize,
}

impl BoardSampler {
    /// Creates a sampler for an NxN board with N = `grid_size`.
    pub fn new(grid_size: usize) -> Self {
        Self { grid_size }
    }

    /// Cells per side.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Computes the mean RGB color of every cell.
    pub fn sample(&self, frame: &Frame) -> Result<SampleGrid, SamplingError> {
        if !frame.is_valid() {
            return Err(SamplingError::InvalidFrame {
                expected: Frame::buffer_len(frame.width(), frame.height()),
                actual: frame.pixels().len(),
            });
        }

        let geometry = BoardGeometry::new(frame.width(), frame.height(), self.grid_size)?;
        let order = frame.channel_order();
        let mut samples = Vec::with_capacity(self.grid_size * self.grid_size);

        for row in 0..self.grid_size {
            for col in 0..self.grid_size {
                let rect = geometry.cell_rect(row, col);
                let mut sums = [0u64; 3];

                for y in rect.y0..rect.y1 {
                    let line = frame.row(y);
                    let start = rect.x0 as usize * CHANNELS;
                    let end = rect.x1 as usize * CHANNELS;
                    for px in line[start..end].chunks_exact(CHANNELS) {
                        let [r, g, b] = order.to_rgb([px[0], px[1], px[2]]);
                        sums[0] += u64::from(r);
                        sums[1] += u64::from(g);
                        sums[2] += u64::from(b);
                    }
                }

                let n = rect.area() as f64;
                samples.push(ColorSample::new(
                    sums[0] as f64 / n,
                    sums[1] as f64 / n,
                    sums[2] as f64 / n,
                ));
            }
        }

        tracing::trace!(
            sequence = frame.sequence(),
            cell = geometry.cell,
            left = geometry.left,
            top = geometry.top,
            "Sampled board cells"
        );

        Ok(SampleGrid {
            size: self.grid_size,
            samples,
        })
    }
}
