//! Prometheus metrics exporter for board monitoring.
//!
//! # Metrics Exposed
//!
//! - `board_scan_frames_total` - Frames analyzed successfully
//! - `board_scan_failures_total` - Frames rejected by sampling or classification
//! - `board_scan_pieces` - Pieces reconstructed from the latest board
//! - `board_scan_cells{color}` - Cells per color on the latest board
//!
//! # Example
//!
//! ```no_run
//! use board_scan::metrics::{MetricsRegistry, MetricsSnapshot};
//! use board_scan::classify::Color;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     frames_analyzed: 100,
//!     failures: 1,
//!     pieces: 5,
//!     cells_by_color: vec![(Color::Red, 2), (Color::White, 26)],
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError, SharedMetrics};
