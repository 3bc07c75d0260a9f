//! Nearest-palette classification of cell colors.

use super::color::{distance_sq, Color, ColorSample, Rgb, SampleError};
use super::named;
use super::palette::Palette;
use crate::board::LabelGrid;
use crate::sampling::SampleGrid;

/// Outcome of classifying one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// CSS3 keyword the sample matched exactly, if any.
    pub exact_name: Option<&'static str>,
    /// Palette label the sample was assigned.
    pub label: Color,
}

/// Maps RGB samples onto palette labels.
///
/// Classification is total: every integer triple yields a label that is a
/// member of the palette. A sample that hits a CSS3 keyword naming a
/// palette label takes that label directly; everything else goes to the
/// entry with the smallest squared RGB distance, the earliest entry in
/// palette order winning ties.
#[derive(Debug, Clone, Default)]
pub struct ColorClassifier {
    palette: Palette,
}

impl ColorClassifier {
    /// Creates a classifier over `palette`.
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Palette the classifier assigns labels from.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Classifies an integer triple.
    pub fn classify(&self, rgb: Rgb) -> Color {
        self.describe(rgb).label
    }

    /// Truncates a fractional sample and classifies it.
    pub fn classify_sample(&self, sample: &ColorSample) -> Result<Color, SampleError> {
        Ok(self.classify(sample.truncate()?))
    }

    /// Classifies and reports the exact keyword match alongside the label.
    pub fn describe(&self, rgb: Rgb) -> Classification {
        let exact_name = named::rgb_to_name(rgb);
        let label = exact_name
            .and_then(Color::from_name)
            .filter(|c| self.palette.contains(*c))
            .or_else(|| self.nearest(rgb))
            .unwrap_or_else(|| self.palette.background());

        tracing::trace!(
            r = rgb.red,
            g = rgb.green,
            b = rgb.blue,
            exact = exact_name.unwrap_or("-"),
            %label,
            "Classified sample"
        );

        Classification { exact_name, label }
    }

    /// Palette entry closest to `rgb`; `None` only for an empty palette.
    fn nearest(&self, rgb: Rgb) -> Option<Color> {
        let mut best: Option<(Color, u32)> = None;
        for (color, reference) in self.palette.entries() {
            let d = distance_sq(rgb, reference);
            // Strict comparison keeps the earlier entry on ties.
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((color, d));
            }
        }
        best.map(|(color, _)| color)
    }

    /// Labels every cell of a sample grid.
    pub fn classify_grid(&self, samples: &SampleGrid) -> Result<LabelGrid, SampleError> {
        let size = samples.size();
        let mut labels = Vec::with_capacity(size * size);
        for sample in samples.iter() {
            labels.push(self.classify_sample(sample)?);
        }
        Ok(LabelGrid::from_cells(size, labels))
    }
}
