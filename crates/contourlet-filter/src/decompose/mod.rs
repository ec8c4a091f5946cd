// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-scale, multi-directional decomposition: reduction pyramid,
// directional filter bank, and per-level response fusion.

pub mod combine;
pub mod directional;
pub mod pyramid;

pub use combine::{Fusion, combine_responses, fuse_responses};
pub use directional::{BankOutput, DirectionalFilterBank, DirectionalKernel};
pub use pyramid::build_pyramid;
