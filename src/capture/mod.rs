//! Camera input and frame handling.
//!
//! This module provides abstractions for capturing color frames of the
//! board and the configuration that fixes frame size, channel order and
//! board layout for a run.

mod camera;
mod config;
mod frame;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::{BoardConfig, CaptureConfig, ConfigError, FileConfig, OutputConfig};
pub use frame::{ChannelOrder, Frame, CHANNELS};
