//! Frame type representing a captured color image with metadata.

use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Bytes per pixel in a [`Frame`].
pub const CHANNELS: usize = 3;

/// Byte order of the three channels within a pixel.
///
/// OpenCV-style sources deliver BGR; everything downstream of sampling
/// works in RGB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Blue, green, red.
    Bgr,
}

impl ChannelOrder {
    /// Reorders a stored pixel into RGB.
    #[inline]
    pub fn to_rgb(self, px: [u8; 3]) -> [u8; 3] {
        match self {
            ChannelOrder::Rgb => px,
            ChannelOrder::Bgr => [px[2], px[1], px[0]],
        }
    }

    /// Reorders an RGB pixel into this order. The swap is its own inverse.
    #[inline]
    pub fn to_stored(self, px: [u8; 3]) -> [u8; 3] {
        self.to_rgb(px)
    }
}

/// A single captured frame from the camera.
///
/// Pixels are interleaved 8-bit triples, row-major.
#[derive(Clone)]
pub struct Frame {
    /// Raw pixel data, `width * height * 3` bytes.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Channel order of `pixels`.
    channel_order: ChannelOrder,
    /// Capture timestamp.
    timestamp: DateTime<Utc>,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a new RGB frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            channel_order: ChannelOrder::Rgb,
            timestamp: Utc::now(),
            sequence,
        }
    }

    /// Bytes needed to hold a `width` x `height` frame.
    #[inline]
    pub fn buffer_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * CHANNELS
    }

    /// Declares the channel order of the pixel buffer.
    pub fn with_channel_order(mut self, channel_order: ChannelOrder) -> Self {
        self.channel_order = channel_order;
        self
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the raw pixel data.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel order of the pixel buffer.
    #[inline]
    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// Wall-clock time the frame was captured.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Monotonic sequence number assigned by the camera.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Raw channel bytes of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Pixel at `(x, y)` in RGB order, or `None` outside the frame.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height || !self.is_valid() {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]];
        Some(self.channel_order.to_rgb(px))
    }

    /// Copies the frame into an RGB image, or `None` if the buffer is malformed.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        let pixels = match self.channel_order {
            ChannelOrder::Rgb => self.pixels.clone(),
            ChannelOrder::Bgr => self
                .pixels
                .chunks_exact(CHANNELS)
                .flat_map(|px| ChannelOrder::Bgr.to_rgb([px[0], px[1], px[2]]))
                .collect(),
        };
        RgbImage::from_raw(self.width, self.height, pixels)
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == Self::buffer_len(self.width, self.height)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channel_order", &self.channel_order)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}
