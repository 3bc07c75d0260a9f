//! Ordered palette of recognized labels.

use super::color::{Color, Rgb};

/// Palette validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    /// No labels given.
    #[error("palette must contain at least one color")]
    Empty,
    /// A label appears twice.
    #[error("palette lists {0} more than once")]
    Duplicate(Color),
    /// The background label is not listed.
    #[error("background color {0} is not in the palette")]
    MissingBackground(Color),
}

/// An ordered set of labels plus the one that marks an empty cell.
///
/// Order is significant twice over: it breaks distance ties during
/// classification and decides piece order during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    order: Vec<Color>,
    background: Color,
}

impl Palette {
    /// Creates a palette, checking that `order` is non-empty, has no
    /// repeats and contains `background`.
    pub fn new(order: Vec<Color>, background: Color) -> Result<Self, PaletteError> {
        if order.is_empty() {
            return Err(PaletteError::Empty);
        }
        for (i, color) in order.iter().enumerate() {
            if order[..i].contains(color) {
                return Err(PaletteError::Duplicate(*color));
            }
        }
        if !order.contains(&background) {
            return Err(PaletteError::MissingBackground(background));
        }
        Ok(Self { order, background })
    }

    /// Red, orange, yellow, green, blue, purple, white; white is background.
    pub fn standard() -> Self {
        Self {
            order: Color::ALL.to_vec(),
            background: Color::White,
        }
    }

    /// All labels in order, background included.
    pub fn colors(&self) -> &[Color] {
        &self.order
    }

    /// Label of an empty cell.
    pub fn background(&self) -> Color {
        self.background
    }

    /// True when `color` is listed.
    pub fn contains(&self, color: Color) -> bool {
        self.order.contains(&color)
    }

    /// Labels that can form pieces, in order.
    pub fn piece_colors(&self) -> impl Iterator<Item = Color> + '_ {
        let background = self.background;
        self.order.iter().copied().filter(move |c| *c != background)
    }

    /// `(label, reference value)` pairs in order.
    pub fn entries(&self) -> impl Iterator<Item = (Color, Rgb)> + '_ {
        self.order.iter().map(|c| (*c, c.reference_rgb()))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}
