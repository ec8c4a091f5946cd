// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report types shared by the transform and the batch driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the final contourlet coefficients came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoefficientSource {
    /// Averaged combined responses of the directional filter bank.
    Directional,
    /// No pyramid level produced a response; the grayscale original was used.
    GrayscaleFallback,
}

/// Diagnostics for a transform that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceReport {
    /// Pyramid levels built (may be fewer than configured for small images).
    pub pyramid_levels: usize,
    /// Levels whose filter bank and combiner produced a usable response.
    pub valid_levels: usize,
    /// Valid levels that shared the first level's shape and were averaged.
    pub averaged_levels: usize,
    /// Directions skipped across all levels because filtering failed.
    pub skipped_directions: usize,
    /// Levels whose dynamic range was flat and were replaced by mid-gray.
    pub flat_levels: usize,
    pub coefficient_source: CoefficientSource,
}

/// Why an image was handed back unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassthroughReason {
    /// Zero width or height.
    EmptyImage,
    /// The pyramid builder produced no levels.
    EmptyPyramid,
    /// The pixel layout is not an 8-bit gray or colour layout.
    UnsupportedPixelFormat(String),
    /// Any other error raised inside the pipeline.
    Failure(String),
}

impl std::fmt::Display for PassthroughReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyImage => write!(f, "empty image"),
            Self::EmptyPyramid => write!(f, "empty pyramid"),
            Self::UnsupportedPixelFormat(layout) => write!(f, "unsupported pixel layout {layout}"),
            Self::Failure(msg) => write!(f, "transform failed: {msg}"),
        }
    }
}

/// Outcome of one transform call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnhanceStatus {
    Enhanced(EnhanceReport),
    Passthrough(PassthroughReason),
}

impl EnhanceStatus {
    pub fn is_enhanced(&self) -> bool {
        matches!(self, Self::Enhanced(_))
    }
}

/// Result of backing up a directory before an in-place pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackupOutcome {
    Created { files: usize },
    /// A backup was already present; nothing was copied.
    AlreadyExists,
}

/// Statistics for one directory pass of the batch driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Image files discovered.
    pub total: usize,
    /// Files read, transformed, and written (passthrough included).
    pub processed: usize,
    pub failed: usize,
    pub failed_files: Vec<String>,
    /// Processed files whose transform degraded to passthrough.
    pub passthrough_files: Vec<String>,
    pub backup: Option<BackupOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_distinguishes_passthrough() {
        let enhanced = EnhanceStatus::Enhanced(EnhanceReport {
            pyramid_levels: 2,
            valid_levels: 2,
            averaged_levels: 1,
            skipped_directions: 0,
            flat_levels: 0,
            coefficient_source: CoefficientSource::Directional,
        });
        assert!(enhanced.is_enhanced());
        assert!(!EnhanceStatus::Passthrough(PassthroughReason::EmptyImage).is_enhanced());
    }

    #[test]
    fn summary_json_roundtrip() {
        let now = Utc::now();
        let summary = BatchSummary {
            total: 4,
            processed: 3,
            failed: 1,
            failed_files: vec!["broken.png".into()],
            passthrough_files: vec![],
            backup: Some(BackupOutcome::AlreadyExists),
            started_at: now,
            finished_at: now,
        };
        let json = serde_json::to_string(&summary).expect("serialize");
        let back: BatchSummary = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, summary);
    }
}
