//! Annotated display frames.

use super::{AnalysisError, BoardAnalysis};
use crate::capture::{Frame, CHANNELS};
use crate::classify::{self, Rgb};
use crate::sampling::{BoardGeometry, CellRect, SamplingError};
use palette::named;

/// Draws the analyzed grid back over the frame it came from.
///
/// Grid lines are drawn along every cell boundary of the board square.
/// Each cell then gets two swatches a tenth of the cell wide (at least one
/// pixel): the averaged cell color in the top-left corner and the assigned
/// label's reference color in the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOverlay {
    /// Grid line color.
    pub line_color: Rgb,
    /// Grid line thickness in pixels.
    pub line_width: u32,
}

impl Default for BoardOverlay {
    fn default() -> Self {
        Self {
            line_color: named::BLACK,
            line_width: 2,
        }
    }
}

impl BoardOverlay {
    /// Returns an annotated copy of `frame`. The copy keeps the frame's
    /// channel order, sequence and timestamp.
    pub fn render(&self, frame: &Frame, analysis: &BoardAnalysis) -> Result<Frame, AnalysisError> {
        let grid_size = analysis.labels.size();
        if analysis.samples.size() != grid_size {
            return Err(AnalysisError::GridSizeMismatch {
                expected: grid_size,
                found: analysis.samples.size(),
            });
        }
        if !frame.is_valid() {
            return Err(SamplingError::InvalidFrame {
                expected: Frame::buffer_len(frame.width(), frame.height()),
                actual: frame.pixels().len(),
            }
            .into());
        }

        let geometry = BoardGeometry::new(frame.width(), frame.height(), grid_size)?;
        let mut out = frame.clone();

        let span = geometry.cell * grid_size as u32;
        for k in 0..=grid_size as u32 {
            let offset = k * geometry.cell;
            // Horizontal, then vertical
            fill(
                &mut out,
                CellRect {
                    x0: geometry.left,
                    y0: geometry.top + offset,
                    x1: geometry.left + span + self.line_width,
                    y1: geometry.top + offset + self.line_width,
                },
                self.line_color,
            );
            fill(
                &mut out,
                CellRect {
                    x0: geometry.left + offset,
                    y0: geometry.top,
                    x1: geometry.left + offset + self.line_width,
                    y1: geometry.top + span + self.line_width,
                },
                self.line_color,
            );
        }

        let swatch = (geometry.cell / 10).max(1);
        let samples = analysis.samples.iter();
        for ((cell, label), sample) in analysis.labels.scan().zip(samples) {
            let rect = geometry.cell_rect(cell.row, cell.col);
            let x0 = rect.x0 + self.line_width;
            let y0 = rect.y0 + self.line_width;

            fill(
                &mut out,
                clip(
                    CellRect {
                        x0,
                        y0,
                        x1: x0 + swatch,
                        y1: y0 + swatch,
                    },
                    rect,
                ),
                sample.truncate()?,
            );
            fill(
                &mut out,
                clip(
                    CellRect {
                        x0,
                        y0: rect.y1.saturating_sub(swatch),
                        x1: x0 + swatch,
                        y1: rect.y1,
                    },
                    rect,
                ),
                label.reference_rgb(),
            );
        }

        Ok(out)
    }
}

/// Intersection of `rect` and `bounds`; empty when they do not overlap.
fn clip(rect: CellRect, bounds: CellRect) -> CellRect {
    let x0 = rect.x0.max(bounds.x0);
    let y0 = rect.y0.max(bounds.y0);
    CellRect {
        x0,
        y0,
        x1: rect.x1.min(bounds.x1).max(x0),
        y1: rect.y1.min(bounds.y1).max(y0),
    }
}

/// Paints `rect`, clipped to the frame, in `color`.
fn fill(frame: &mut Frame, rect: CellRect, color: Rgb) {
    let (width, height) = (frame.width(), frame.height());
    let stored = frame.channel_order().to_stored(classify::to_bytes(color));
    let pixels = frame.pixels_mut();

    for y in rect.y0..rect.y1.min(height) {
        for x in rect.x0..rect.x1.min(width) {
            let i = (y as usize * width as usize + x as usize) * CHANNELS;
            pixels[i..i + CHANNELS].copy_from_slice(&stored);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BoardAnalyzer;
    use crate::board::LabelGrid;
    use crate::capture::{BoardConfig, Camera, CaptureConfig, ChannelOrder, MockCamera};
    use crate::classify::{Color, ColorSample};
    use crate::sampling::SampleGrid;

    fn analyzed(config: CaptureConfig) -> (Frame, BoardAnalysis) {
        let layout: LabelGrid = "R R\nW B".parse().unwrap();
        let mut camera = MockCamera::with_layout(layout);
        camera.open(&config).unwrap();
        let frame = camera.capture().unwrap();

        let board = BoardConfig {
            grid_size: 2,
            ..Default::default()
        };
        let analysis = BoardAnalyzer::new(&board).unwrap().analyze(&frame).unwrap();
        (frame, analysis)
    }

    #[test]
    fn test_draws_grid_and_swatches() {
        // 140x100: board square x 20..120, cells of 50, swatches of 5
        let (frame, analysis) = analyzed(CaptureConfig::with_dimensions(140, 100));
        let out = BoardOverlay::default().render(&frame, &analysis).unwrap();

        // margin untouched
        assert_eq!(out.rgb_at(0, 50), frame.rgb_at(0, 50));
        // boundary lines along the top edge and between the columns
        assert_eq!(out.rgb_at(40, 0), Some([0, 0, 0]));
        assert_eq!(out.rgb_at(71, 30), Some([0, 0, 0]));
        // cell interiors keep their pixels
        assert_eq!(out.rgb_at(45, 25), Some([255, 0, 0]));
        assert_eq!(out.rgb_at(95, 75), Some([0, 0, 255]));

        // top-left swatch of cell (1, 1) carries the averaged color,
        // bottom-left swatch the label's reference color
        assert_eq!(out.rgb_at(73, 53), Some([0, 0, 255]));
        assert_eq!(out.rgb_at(73, 98), Some([0, 0, 255]));
        assert_eq!(out.rgb_at(23, 98), Some([255, 255, 255]));

        assert_eq!(out.sequence(), frame.sequence());
        assert_eq!(out.timestamp(), frame.timestamp());
    }

    #[test]
    fn test_swatches_show_average_and_label_separately() {
        let (frame, mut analysis) = analyzed(CaptureConfig::with_dimensions(100, 100));
        // A muddy sample that still reads as red
        let muddy = ColorSample::new(200.4, 40.0, 30.9);
        let white = ColorSample::from(Color::White.reference_rgb());
        analysis.samples =
            SampleGrid::from_rows(vec![vec![muddy, muddy], vec![white, white]]).unwrap();

        let out = BoardOverlay::default().render(&frame, &analysis).unwrap();
        assert_eq!(out.rgb_at(3, 3), Some([200, 40, 30]));
        assert_eq!(out.rgb_at(3, 48), Some([255, 0, 0]));
    }

    #[test]
    fn test_keeps_bgr_storage() {
        let config = CaptureConfig {
            channel_order: ChannelOrder::Bgr,
            ..CaptureConfig::with_dimensions(100, 100)
        };
        let (frame, analysis) = analyzed(config);
        let out = BoardOverlay::default().render(&frame, &analysis).unwrap();

        assert_eq!(out.channel_order(), ChannelOrder::Bgr);
        // label swatch of cell (0, 0) is red, stored blue-first
        let i = (48 * 100 + 3) * CHANNELS;
        assert_eq!(&out.pixels()[i..i + 3], &[0, 0, 255]);
        assert_eq!(out.rgb_at(3, 48), Some([255, 0, 0]));
    }

    #[test]
    fn test_rejects_mismatched_analysis() {
        let (frame, mut analysis) = analyzed(CaptureConfig::with_dimensions(100, 100));
        analysis.samples = SampleGrid::from_rows(vec![vec![ColorSample::default()]]).unwrap();
        assert!(matches!(
            BoardOverlay::default().render(&frame, &analysis),
            Err(AnalysisError::GridSizeMismatch {
                expected: 2,
                found: 1
            })
        ));

        let truncated = Frame::new(vec![0; 9], 2, 2, 1);
        let (_, analysis) = analyzed(CaptureConfig::with_dimensions(100, 100));
        assert!(matches!(
            BoardOverlay::default().render(&truncated, &analysis),
            Err(AnalysisError::Sampling(SamplingError::InvalidFrame { .. }))
        ));
    }
}
