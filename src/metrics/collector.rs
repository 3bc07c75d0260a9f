//! Metrics collection and registry.

use crate::analysis::{AnalyzerStats, BoardAnalysis};
use crate::classify::Color;
use prometheus::{Encoder, IntCounter, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of analyzer state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Frames analyzed successfully.
    pub frames_analyzed: u64,
    /// Frames that failed analysis.
    pub failures: u64,
    /// Pieces on the latest board.
    pub pieces: usize,
    /// Cells per label on the latest board.
    pub cells_by_color: Vec<(Color, usize)>,
}

/// Prometheus metrics registry for board monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    frames_total: IntCounter,
    failures_total: IntCounter,
    pieces: IntGauge,
    cells: IntGaugeVec,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all board metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_total = IntCounter::new(
            "board_scan_frames_total",
            "Total number of frames analyzed",
        )?;
        let failures_total = IntCounter::new(
            "board_scan_failures_total",
            "Total number of frames that failed analysis",
        )?;
        let pieces = IntGauge::new(
            "board_scan_pieces",
            "Pieces reconstructed from the latest board",
        )?;
        let cells = IntGaugeVec::new(
            Opts::new("board_scan_cells", "Cells per color on the latest board"),
            &["color"],
        )?;

        registry.register(Box::new(frames_total.clone()))?;
        registry.register(Box::new(failures_total.clone()))?;
        registry.register(Box::new(pieces.clone()))?;
        registry.register(Box::new(cells.clone()))?;

        Ok(Self {
            registry,
            frames_total,
            failures_total,
            pieces,
            cells,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward, so add the difference
        let current_frames = self.frames_total.get();
        if snapshot.frames_analyzed > current_frames {
            self.frames_total.inc_by(snapshot.frames_analyzed - current_frames);
        }
        let current_failures = self.failures_total.get();
        if snapshot.failures > current_failures {
            self.failures_total.inc_by(snapshot.failures - current_failures);
        }

        self.pieces.set(snapshot.pieces as i64);
        for (color, count) in &snapshot.cells_by_color {
            self.cells
                .with_label_values(&[color.name()])
                .set(*count as i64);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from analyzer totals and the latest board, if any.
    pub fn from_components(
        stats: &AnalyzerStats,
        latest: Option<&BoardAnalysis>,
        colors: &[Color],
    ) -> Self {
        let cells_by_color = latest
            .map(|analysis| analysis.cell_counts(colors).collect())
            .unwrap_or_default();

        Self {
            frames_analyzed: stats.frames_analyzed,
            failures: stats.failures,
            pieces: stats.last_piece_count,
            cells_by_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            frames_analyzed: 10,
            failures: 2,
            pieces: 4,
            cells_by_color: vec![(Color::Red, 2), (Color::White, 28)],
        };

        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("board_scan_frames_total 10"));
        assert!(output.contains("board_scan_failures_total 2"));
        assert!(output.contains("board_scan_pieces 4"));
        assert!(output.contains("board_scan_cells{color=\"red\"} 2"));
        assert!(output.contains("board_scan_cells{color=\"white\"} 28"));
    }

    #[test]
    fn test_counters_do_not_go_backwards() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            frames_analyzed: 5,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            frames_analyzed: 3,
            ..Default::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("board_scan_frames_total 5"));
    }

    #[test]
    fn test_snapshot_without_board() {
        let stats = AnalyzerStats {
            frames_analyzed: 1,
            failures: 0,
            last_piece_count: 3,
            last_error: None,
        };
        let snapshot = MetricsSnapshot::from_components(&stats, None, &Color::ALL);
        assert_eq!(snapshot.pieces, 3);
        assert!(snapshot.cells_by_color.is_empty());
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        assert!(output.contains("board_scan_frames_total"));
        assert!(output.contains("board_scan_pieces"));
    }
}
