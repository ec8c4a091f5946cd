// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// contourlet-filter: the numeric core of the contourlet enhancement pipeline.
//
// Provides the reduction pyramid, the oriented filter bank and response
// fusion, the Sobel edge map, the compositor that recombines them with the
// original image, and file helpers for single-image use.

pub mod color;
pub mod decompose;
pub mod edge;
pub mod io;
pub mod plane;
pub mod transform;

// Re-export the primary items so callers can use `contourlet_filter::ContourletTransform` etc.
pub use io::{enhance_file, open_color_image, open_image, save_image};
pub use plane::Plane;
pub use transform::{ContourletTransform, Enhancement};
