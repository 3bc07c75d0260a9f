//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{CaptureConfig, Frame};
use crate::board::{Cell, LabelGrid};
use crate::classify::{self, Color};
use crate::sampling::BoardGeometry;
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The capture settings were rejected.
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    /// A frame could not be produced.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// `capture` was called before `open`.
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Margin color outside the board square.
const MARGIN_RGB: [u8; 3] = [96, 96, 96];

/// Mock camera that films a synthetic board.
///
/// Each frame shows `layout` centered in the frame with every cell painted
/// in its label's reference color, using the same geometry the sampler
/// reads back. Optional noise perturbs every channel by up to `noise`
/// levels, deterministically per pixel and frame.
#[derive(Debug)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    layout: LabelGrid,
    noise: u8,
    sequence: u64,
}

impl Default for MockCamera {
    fn default() -> Self {
        // A 6x6 board with nothing on it
        Self::with_layout(LabelGrid::from_cells(6, vec![Color::White; 36]))
    }
}

impl MockCamera {
    /// A camera filming an empty 6x6 board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Films the given board.
    pub fn with_layout(layout: LabelGrid) -> Self {
        Self {
            config: None,
            layout,
            noise: 0,
            sequence: 0,
        }
    }

    /// Sets the per-channel noise amplitude.
    pub fn with_noise(mut self, noise: u8) -> Self {
        self.noise = noise;
        self
    }

    fn jitter(&self, value: u8, x: u32, y: u32, channel: usize) -> u8 {
        if self.noise == 0 {
            return value;
        }
        // Integer hash of position, frame and channel
        let mut h = u64::from(x)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ u64::from(y).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ self.sequence.wrapping_mul(0x1656_67B1_9E37_79F9)
            ^ channel as u64;
        h ^= h >> 29;
        let span = u64::from(self.noise) * 2 + 1;
        let offset = (h % span) as i32 - i32::from(self.noise);
        (i32::from(value) + offset).clamp(0, 255) as u8
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        BoardGeometry::new(config.width, config.height, self.layout.size())
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;
        let (width, height, order) = (config.width, config.height, config.channel_order);
        let geometry = BoardGeometry::new(width, height, self.layout.size())
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        self.sequence += 1;

        let mut pixels = Vec::with_capacity(Frame::buffer_len(width, height));
        for y in 0..height {
            for x in 0..width {
                let rgb = match geometry.cell_at(x, y) {
                    Some((row, col)) => {
                        let label = self.layout.get(Cell::new(row, col)).unwrap_or(Color::White);
                        classify::to_bytes(label.reference_rgb())
                    }
                    // Remainder strip inside the square reads as empty board
                    None if geometry.in_board(x, y) => classify::to_bytes(Color::White.reference_rgb()),
                    None => MARGIN_RGB,
                };
                let stored = order.to_stored(rgb);
                for (channel, value) in stored.into_iter().enumerate() {
                    pixels.push(self.jitter(value, x, y, channel));
                }
            }
        }

        Ok(Frame::new(pixels, width, height, self.sequence).with_channel_order(order))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}
