//! Closed set of color labels and the RGB types fed to the classifier.

use palette::{named, Srgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A color label recognized on the board.
///
/// The declaration order matches the standard palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// `#FF0000`
    Red,
    /// `#FFA500`
    Orange,
    /// `#FFFF00`
    Yellow,
    /// `#008000`
    Green,
    /// `#0000FF`
    Blue,
    /// `#800080`
    Purple,
    /// `#FFFFFF`, the usual background.
    White,
}

/// Name, single-letter initial and reference value for every label.
static COLOR_TABLE: [(Color, &str, char, Rgb); 7] = [
    (Color::Red, "red", 'R', named::RED),
    (Color::Orange, "orange", 'O', named::ORANGE),
    (Color::Yellow, "yellow", 'Y', named::YELLOW),
    (Color::Green, "green", 'G', named::GREEN),
    (Color::Blue, "blue", 'B', named::BLUE),
    (Color::Purple, "purple", 'P', named::PURPLE),
    (Color::White, "white", 'W', named::WHITE),
];

impl Color {
    /// All labels in standard palette order.
    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::White,
    ];

    fn entry(self) -> &'static (Color, &'static str, char, Rgb) {
        // Table rows are laid out in discriminant order.
        &COLOR_TABLE[self as usize]
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Single-letter initial used in compact board layouts.
    pub fn initial(self) -> char {
        self.entry().2
    }

    /// Canonical RGB value the classifier measures distance against.
    pub fn reference_rgb(self) -> Rgb {
        self.entry().3
    }

    /// Looks up a label by exact lowercase name.
    pub fn from_name(name: &str) -> Option<Color> {
        COLOR_TABLE
            .iter()
            .find(|(_, n, _, _)| *n == name)
            .map(|(c, _, _, _)| *c)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a known label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color label: {0:?}")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    /// Accepts full names (any case) or single-letter initials.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Some(color) = Color::from_name(&lowered) {
            return Ok(color);
        }

        let mut chars = lowered.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let upper = c.to_ascii_uppercase();
            if let Some(color) = Color::ALL.into_iter().find(|c| c.initial() == upper) {
                return Ok(color);
            }
        }

        Err(UnknownColor(s.to_string()))
    }
}

/// An 8-bit sRGB triple.
pub type Rgb = Srgb<u8>;

/// Squared Euclidean distance between two triples in RGB space.
#[inline]
pub fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    let dr = i32::from(a.red) - i32::from(b.red);
    let dg = i32::from(a.green) - i32::from(b.green);
    let db = i32::from(a.blue) - i32::from(b.blue);
    (dr * dr + dg * dg + db * db) as u32
}

/// Channel bytes of `rgb` in RGB order.
pub fn to_bytes(rgb: Rgb) -> [u8; 3] {
    let (r, g, b) = rgb.into_components();
    [r, g, b]
}

/// Which color channel a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// First channel.
    Red,
    /// Second channel.
    Green,
    /// Third channel.
    Blue,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        })
    }
}

/// Sample validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    /// A channel is negative, NaN or not below 256.
    #[error("{channel} channel value {value} outside [0, 256)")]
    OutOfRange {
        /// Offending channel.
        channel: Channel,
        /// Value as sampled.
        value: f64,
    },
}

/// An averaged cell color, possibly fractional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorSample {
    /// Mean red value.
    pub r: f64,
    /// Mean green value.
    pub g: f64,
    /// Mean blue value.
    pub b: f64,
}

impl ColorSample {
    /// Creates a sample from raw channel means.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Drops the fractional part of each channel.
    ///
    /// Truncates toward zero rather than rounding, so 254.9 becomes 254.
    pub fn truncate(&self) -> Result<Rgb, SampleError> {
        Ok(Rgb::new(
            truncate_channel(Channel::Red, self.r)?,
            truncate_channel(Channel::Green, self.g)?,
            truncate_channel(Channel::Blue, self.b)?,
        ))
    }
}

impl From<Rgb> for ColorSample {
    fn from(rgb: Rgb) -> Self {
        Self::new(f64::from(rgb.red), f64::from(rgb.green), f64::from(rgb.blue))
    }
}

fn truncate_channel(channel: Channel, value: f64) -> Result<u8, SampleError> {
    // NaN fails both comparisons
    if !(0.0..256.0).contains(&value) {
        return Err(SampleError::OutOfRange { channel, value });
    }
    Ok(value.trunc() as u8)
}
