// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contourlet: core types, configuration, and error definitions shared across
// the filter and batch crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BatchConfig, TransformConfig};
pub use error::{ContourletError, Result};
pub use types::*;
