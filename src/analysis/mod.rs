//! Frame-to-pieces analysis.
//!
//! Ties sampling, classification and reconstruction together for one
//! frame at a time and keeps running totals for monitoring. Results can be
//! drawn back over their frame for display.

mod analyzer;
mod overlay;

pub use analyzer::{AnalyzerStats, BoardAnalysis, BoardAnalyzer};
pub use overlay::BoardOverlay;

use crate::capture::ConfigError;
use crate::classify::SampleError;
use crate::sampling::SamplingError;
use thiserror::Error;

/// Errors that can occur while analyzing a frame.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The board settings are invalid.
    #[error("invalid board configuration: {0}")]
    Config(#[from] ConfigError),
    /// The frame could not be sampled.
    #[error("sampling failed: {0}")]
    Sampling(#[from] SamplingError),
    /// A cell average fell outside the channel range.
    #[error("invalid cell sample: {0}")]
    Sample(#[from] SampleError),
    /// Samples and board disagree on the grid size.
    #[error("sample grid is {found}x{found}, expected {expected}x{expected}")]
    GridSizeMismatch {
        /// Cells per side the board expects.
        expected: usize,
        /// Cells per side actually supplied.
        found: usize,
    },
}
