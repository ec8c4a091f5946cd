// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the contourlet pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all contourlet operations.
#[derive(Debug, Error)]
pub enum ContourletError {
    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Transform errors --
    #[error("image has no pixels")]
    EmptyImage,

    #[error("unsupported pixel layout: {0}")]
    UnsupportedPixelFormat(String),

    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("directional kernel {direction} is degenerate (L1 norm {norm})")]
    DegenerateKernel { direction: usize, norm: f32 },

    // -- Image codec --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("input directory does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("backup to {} failed: {reason}", .target.display())]
    BackupFailed { target: PathBuf, reason: String },

    #[error("worker pool could not be started: {0}")]
    WorkerPool(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ContourletError>;
