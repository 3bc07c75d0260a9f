//! Per-frame board analysis.

use super::{AnalysisError, BoardOverlay};
use crate::board::{BoardReconstructor, LabelGrid, PieceList};
use crate::capture::{BoardConfig, Frame};
use crate::classify::{Color, ColorClassifier};
use crate::sampling::{BoardSampler, SampleGrid};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of analyzing one frame.
#[derive(Debug, Clone, Serialize)]
pub struct BoardAnalysis {
    /// Sequence number of the source frame.
    pub sequence: u64,
    /// Wall-clock time the source frame was captured.
    pub captured_at: DateTime<Utc>,
    /// Label of every cell.
    pub labels: LabelGrid,
    /// Averaged color of every cell, as classified.
    pub samples: SampleGrid,
    /// Pieces reconstructed from `labels`.
    pub pieces: PieceList,
}

impl BoardAnalysis {
    /// Number of cells per label, in palette order.
    pub fn cell_counts<'a>(
        &'a self,
        colors: &'a [Color],
    ) -> impl Iterator<Item = (Color, usize)> + 'a {
        colors.iter().map(|c| (*c, self.labels.count(*c)))
    }
}

/// Running totals kept by the analyzer.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerStats {
    /// Frames analyzed successfully.
    pub frames_analyzed: u64,
    /// Frames rejected by sampling or classification.
    pub failures: u64,
    /// Pieces found on the most recent board.
    pub last_piece_count: usize,
    /// Most recent failure, if any.
    pub last_error: Option<String>,
}

/// Runs sampling, classification and reconstruction over frames.
pub struct BoardAnalyzer {
    sampler: BoardSampler,
    classifier: ColorClassifier,
    reconstructor: BoardReconstructor,
    overlay: BoardOverlay,
    stats: AnalyzerStats,
}

impl BoardAnalyzer {
    /// Builds the pipeline from board settings.
    pub fn new(config: &BoardConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let palette = config.palette()?;

        Ok(Self {
            sampler: BoardSampler::new(config.grid_size),
            classifier: ColorClassifier::new(palette.clone()),
            reconstructor: BoardReconstructor::new(palette),
            overlay: BoardOverlay::default(),
            stats: AnalyzerStats::default(),
        })
    }

    /// Replaces the overlay style used by [`annotate`](Self::annotate).
    pub fn with_overlay(mut self, overlay: BoardOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    /// Samples, classifies and reconstructs one frame.
    pub fn analyze(&mut self, frame: &Frame) -> Result<BoardAnalysis, AnalysisError> {
        let result = self
            .sampler
            .sample(frame)
            .map_err(AnalysisError::from)
            .and_then(|samples| self.run(samples, frame.sequence(), frame.timestamp()));
        self.record(result)
    }

    /// Draws `analysis` over the frame it was computed from.
    pub fn annotate(&self, frame: &Frame, analysis: &BoardAnalysis) -> Result<Frame, AnalysisError> {
        self.overlay.render(frame, analysis)
    }

    /// Classifies and reconstructs externally sampled cells, stamped with
    /// the current time.
    pub fn analyze_samples(
        &mut self,
        samples: &SampleGrid,
        sequence: u64,
    ) -> Result<BoardAnalysis, AnalysisError> {
        if samples.size() != self.sampler.grid_size() {
            let err = AnalysisError::GridSizeMismatch {
                expected: self.sampler.grid_size(),
                found: samples.size(),
            };
            return self.record(Err(err));
        }
        let result = self.run(samples.clone(), sequence, Utc::now());
        self.record(result)
    }

    fn run(
        &self,
        samples: SampleGrid,
        sequence: u64,
        captured_at: DateTime<Utc>,
    ) -> Result<BoardAnalysis, AnalysisError> {
        let labels = self.classifier.classify_grid(&samples)?;
        let pieces = self.reconstructor.reconstruct(&labels);

        tracing::debug!(sequence, "Board labels:\n{}", labels);

        Ok(BoardAnalysis {
            sequence,
            captured_at,
            labels,
            samples,
            pieces,
        })
    }

    fn record(
        &mut self,
        result: Result<BoardAnalysis, AnalysisError>,
    ) -> Result<BoardAnalysis, AnalysisError> {
        match &result {
            Ok(analysis) => {
                self.stats.frames_analyzed += 1;
                if analysis.pieces.len() != self.stats.last_piece_count {
                    tracing::info!(
                        sequence = analysis.sequence,
                        pieces = analysis.pieces.len(),
                        "Piece count changed"
                    );
                }
                self.stats.last_piece_count = analysis.pieces.len();
            }
            Err(e) => {
                self.stats.failures += 1;
                self.stats.last_error = Some(e.to_string());
                tracing::warn!(error = %e, "Frame analysis failed");
            }
        }
        result
    }

    /// Palette labels in priority order.
    pub fn colors(&self) -> &[Color] {
        self.classifier.palette().colors()
    }

    /// Running totals since creation or the last [`reset`](Self::reset).
    pub fn stats(&self) -> &AnalyzerStats {
        &self.stats
    }

    /// Clears the running totals.
    pub fn reset(&mut self) {
        self.stats = AnalyzerStats::default();
        tracing::info!("Analyzer stats reset");
    }
}
