//! Board Scan Library
//!
//! Reads camera frames of a grid-based board game, labels every cell with
//! a palette color and reconstructs the two-cell pieces on the board.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → sampling → classify → board
//!     ↓         ↓          ↓        ↓
//!            analysis (per-frame pipeline, overlay) → metrics
//! ```
//!
//! # Design Principles
//!
//! - **Total classification**: every integer sample maps to a palette label
//! - **Explicit order**: the palette order is passed in, never global state
//! - **Deterministic reconstruction**: same board, same pieces, same order
//! - **Fail fast on shape only**: absent or unpaired colors are not errors
//!
//! # Example
//!
//! ```no_run
//! use board_scan::{
//!     analysis::BoardAnalyzer,
//!     capture::{BoardConfig, Camera, CaptureConfig, MockCamera},
//! };
//!
//! let layout = "W R R W W W
//!               W W W W W W
//!               W W W W W W
//!               W W W W W W
//!               W W W W W W
//!               W W W W W W".parse().unwrap();
//!
//! let mut camera = MockCamera::with_layout(layout);
//! camera.open(&CaptureConfig::default()).unwrap();
//!
//! let mut analyzer = BoardAnalyzer::new(&BoardConfig::default()).unwrap();
//! let analysis = analyzer.analyze(&camera.capture().unwrap()).unwrap();
//!
//! assert_eq!(analysis.pieces.to_string(), "[[[0,1],[0,2]]]");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod board;
pub mod capture;
pub mod classify;
pub mod metrics;
pub mod sampling;

// Re-export commonly used types at crate root
pub use analysis::{BoardAnalysis, BoardAnalyzer, BoardOverlay};
pub use board::{BoardReconstructor, Cell, LabelGrid, Piece, PieceList};
pub use capture::{BoardConfig, Camera, CaptureConfig, Frame, MockCamera};
pub use classify::{Color, ColorClassifier, ColorSample, Palette, Rgb};
pub use sampling::{BoardSampler, SampleGrid};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
