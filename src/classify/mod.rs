//! Cell color classification.
//!
//! Maps averaged cell colors onto a small ordered palette of labels. The
//! classifier never fails on an integer sample: an exact CSS3 keyword that
//! names a palette label is taken as-is, anything else goes to the nearest
//! palette reference in RGB space.

mod classifier;
mod color;
pub mod named;
mod palette;

pub use classifier::{Classification, ColorClassifier};
pub use color::{distance_sq, to_bytes, Channel, Color, ColorSample, Rgb, SampleError, UnknownColor};
pub use palette::{Palette, PaletteError};
