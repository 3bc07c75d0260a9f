//! Capture and board configuration.
//!
//! The grid size and palette are fixed for a run; nothing here is
//! mutated after startup.

use super::frame::ChannelOrder;
use crate::classify::{Color, Palette, PaletteError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for camera capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
    /// Byte order of delivered pixels.
    pub channel_order: ChannelOrder,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 640,
            height: 480,
            fps: 30,
            channel_order: ChannelOrder::Rgb,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Board layout settings shared by sampling, classification and
/// reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Cells per board side.
    pub grid_size: usize,
    /// Palette labels in priority order.
    pub palette: Vec<Color>,
    /// Label marking an empty cell.
    pub background: Color,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let palette = Palette::standard();
        Self {
            grid_size: 6,
            palette: palette.colors().to_vec(),
            background: palette.background(),
        }
    }
}

impl BoardConfig {
    /// Builds the palette described by this section.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Ok(Palette::new(self.palette.clone(), self.background)?)
    }

    /// Validates the configuration parameters.
    ///
    /// A piece needs two cells, so the grid must be at least 2x2.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        self.palette()?;
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    /// Frame rate outside 1-120.
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    /// Board smaller than 2x2.
    #[error("invalid grid size {0} (must be at least 2)")]
    InvalidGridSize(usize),
    /// Palette section rejected.
    #[error("invalid palette: {0}")]
    Palette(#[from] PaletteError),
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[capture]` section.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// `[board]` section.
    #[serde(default)]
    pub board: BoardConfig,
    /// `[output]` section.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run continuously (true) or process fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
    /// Directory for annotated PNG frames; none are written when unset.
    pub annotate_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 10,
            metrics_port: 9090,
            annotate_dir: None,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        content.parse()
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.board.validate()
    }
}

impl std::str::FromStr for FileConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: FileConfig =
            toml::from_str(s).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.board.grid_size, 6);
        assert_eq!(config.board.palette().unwrap(), Palette::standard());
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = CaptureConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_grid_too_small() {
        let config = BoardConfig {
            grid_size: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGridSize(1))
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config: FileConfig = r#"
            [capture]
            width = 320
            height = 240
            channel_order = "bgr"

            [board]
            grid_size = 4
            palette = ["blue", "red", "white"]

            [output]
            continuous = true
            annotate_dir = "frames"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.capture.width, 320);
        assert_eq!(config.capture.fps, 30);
        assert_eq!(config.capture.channel_order, ChannelOrder::Bgr);
        assert_eq!(config.board.grid_size, 4);
        assert_eq!(config.board.background, Color::White);
        assert_eq!(
            config.board.palette().unwrap().colors(),
            &[Color::Blue, Color::Red, Color::White]
        );
        assert!(config.output.continuous);
        assert_eq!(config.output.frame_count, 10);
        assert_eq!(config.output.annotate_dir, Some(PathBuf::from("frames")));
        assert_eq!(OutputConfig::default().annotate_dir, None);
    }

    #[test]
    fn test_parse_rejects_bad_palette() {
        let result = r#"
            [board]
            palette = ["red", "blue"]
        "#
        .parse::<FileConfig>();
        assert!(matches!(
            result,
            Err(ConfigError::Palette(PaletteError::MissingBackground(Color::White)))
        ));

        let result = r#"
            [board]
            palette = ["red", "magenta", "white"]
        "#
        .parse::<FileConfig>();
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
