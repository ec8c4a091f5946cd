// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directional filter bank: oriented Gabor-like kernels and the per-level
// filtering that produces one non-negative response per orientation.

use std::f64::consts::PI;

use contourlet_core::error::{ContourletError, Result};
use tracing::{debug, warn};

use crate::plane::{Plane, correlate, is_empty};

/// Kernel side length.
pub const KERNEL_SIZE: usize = 15;

/// Envelope standard deviation along the carrier (rotated x) axis.
const SIGMA_X: f64 = 3.0;
/// Envelope standard deviation across the carrier.
const SIGMA_Y: f64 = 1.0;
/// Carrier wavelength in pixels.
const WAVELENGTH: f64 = 5.0;

/// First and last sample coordinate of the kernel grid. The grid is
/// `KERNEL_SIZE` points spanning [-8, 7], so it sits half a step off centre.
const GRID_START: f64 = -((KERNEL_SIZE / 2 + 1) as f64);
const GRID_END: f64 = (KERNEL_SIZE / 2) as f64;

/// One oriented, L1-normalized kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalKernel {
    direction: usize,
    angle: f64,
    /// Row-major `KERNEL_SIZE x KERNEL_SIZE` taps.
    taps: Vec<f32>,
}

impl DirectionalKernel {
    /// Build the kernel for `direction` out of `num_directions`, oriented at
    /// `direction / num_directions * pi`.
    ///
    /// Anisotropic Gaussian envelope (sigma 3 along, 1 across) times a cosine
    /// carrier of wavelength 5 along the rotated x axis, scaled so the
    /// absolute taps sum to 1.
    pub fn new(direction: usize, num_directions: usize) -> Result<Self> {
        if num_directions == 0 || direction >= num_directions {
            return Err(ContourletError::InvalidConfig(format!(
                "direction {direction} out of range for {num_directions} directions"
            )));
        }

        let angle = direction as f64 / num_directions as f64 * PI;
        let (sin, cos) = angle.sin_cos();
        let step = (GRID_END - GRID_START) / (KERNEL_SIZE - 1) as f64;

        let mut raw = Vec::with_capacity(KERNEL_SIZE * KERNEL_SIZE);
        for row in 0..KERNEL_SIZE {
            let y = GRID_START + row as f64 * step;
            for col in 0..KERNEL_SIZE {
                let x = GRID_START + col as f64 * step;
                let xr = x * cos + y * sin;
                let yr = -x * sin + y * cos;
                let envelope = (-(xr * xr / (2.0 * SIGMA_X * SIGMA_X)
                    + yr * yr / (2.0 * SIGMA_Y * SIGMA_Y)))
                    .exp();
                raw.push(envelope * (2.0 * PI * xr / WAVELENGTH).cos());
            }
        }

        let norm: f64 = raw.iter().map(|v| v.abs()).sum();
        if !norm.is_finite() || norm <= f64::EPSILON {
            return Err(ContourletError::DegenerateKernel {
                direction,
                norm: norm as f32,
            });
        }

        Ok(Self {
            direction,
            angle,
            taps: raw.into_iter().map(|v| (v / norm) as f32).collect(),
        })
    }

    pub fn direction(&self) -> usize {
        self.direction
    }

    /// Orientation in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Absolute value of the kernel correlated with `plane` (same shape).
    pub fn respond(&self, plane: &Plane) -> Result<Plane> {
        let mut response = correlate(plane, &self.taps, KERNEL_SIZE);
        for v in response.iter_mut() {
            if !v.is_finite() {
                return Err(ContourletError::ImageError(format!(
                    "direction {} produced a non-finite response",
                    self.direction
                )));
            }
            *v = v.abs();
        }
        Ok(response)
    }
}

/// Responses of one filter bank pass.
#[derive(Debug, Clone, Default)]
pub struct BankOutput {
    /// One response per direction that filtered successfully, in direction
    /// order.
    pub responses: Vec<Plane>,
    /// Directions that were skipped (bad kernel or failed filtering).
    pub skipped: usize,
}

/// A fixed set of [`DirectionalKernel`]s, built once and reused for every
/// plane.
#[derive(Debug, Clone)]
pub struct DirectionalFilterBank {
    num_directions: usize,
    kernels: Vec<DirectionalKernel>,
}

impl DirectionalFilterBank {
    /// Build all `num_directions` kernels. A direction whose kernel cannot be
    /// built is dropped from the bank and counted as skipped on every pass.
    pub fn new(num_directions: usize) -> Self {
        let kernels = (0..num_directions)
            .filter_map(|d| match DirectionalKernel::new(d, num_directions) {
                Ok(kernel) => Some(kernel),
                Err(err) => {
                    warn!(direction = d, error = %err, "dropping directional kernel");
                    None
                }
            })
            .collect();
        Self {
            num_directions,
            kernels,
        }
    }

    pub fn num_directions(&self) -> usize {
        self.num_directions
    }

    pub fn kernels(&self) -> &[DirectionalKernel] {
        &self.kernels
    }

    /// Filter `plane` with every kernel.
    ///
    /// An empty plane yields no responses. A direction whose filtering fails
    /// is skipped; the rest of the bank still runs.
    pub fn filter(&self, plane: &Plane) -> BankOutput {
        if is_empty(plane) {
            return BankOutput::default();
        }

        let mut output = BankOutput {
            responses: Vec::with_capacity(self.kernels.len()),
            skipped: self.num_directions - self.kernels.len(),
        };
        for kernel in &self.kernels {
            match kernel.respond(plane) {
                Ok(response) => output.responses.push(response),
                Err(err) => {
                    debug!(direction = kernel.direction(), error = %err, "direction skipped");
                    output.skipped += 1;
                }
            }
        }
        output
    }
}
