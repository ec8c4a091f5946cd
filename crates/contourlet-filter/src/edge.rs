// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge enhancer: Sobel gradient magnitude of the full-resolution grayscale
// image.

use crate::plane::{Plane, correlate_separable};

const DERIVATIVE: [f32; 3] = [-1.0, 0.0, 1.0];
const SMOOTH: [f32; 3] = [1.0, 2.0, 1.0];

/// 3x3 Sobel derivative along x (columns).
pub fn sobel_x(plane: &Plane) -> Plane {
    correlate_separable(plane, &DERIVATIVE, &SMOOTH)
}

/// 3x3 Sobel derivative along y (rows).
pub fn sobel_y(plane: &Plane) -> Plane {
    correlate_separable(plane, &SMOOTH, &DERIVATIVE)
}

/// `sqrt(gx^2 + gy^2)` per pixel. Not normalized.
pub fn gradient_magnitude(plane: &Plane) -> Plane {
    let mut gx = sobel_x(plane);
    let gy = sobel_y(plane);
    for (x, &y) in gx.iter_mut().zip(gy.iter()) {
        *x = x.hypot(y);
    }
    gx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::filled;
    use image::{ImageBuffer, Luma};

    #[test]
    fn constant_plane_has_no_edges() {
        let magnitude = gradient_magnitude(&filled(9, 6, 0.7));
        assert!(magnitude.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn horizontal_ramp_has_constant_interior_gradient() {
        let plane: Plane = ImageBuffer::from_fn(8, 5, |x, _| Luma([x as f32 * 0.1]));
        let gx = sobel_x(&plane);
        let gy = sobel_y(&plane);
        // (f(x+1) - f(x-1)) * (1 + 2 + 1)
        for x in 1..7 {
            assert!((gx.get_pixel(x, 2).0[0] - 0.8).abs() < 1e-5);
        }
        // Reflect-101 mirrors the border column, so the derivative vanishes.
        assert_eq!(gx.get_pixel(0, 2).0[0], 0.0);
        assert!(gy.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn magnitude_combines_both_axes() {
        let plane: Plane = ImageBuffer::from_fn(7, 7, |x, y| Luma([(x + y) as f32]));
        let magnitude = gradient_magnitude(&plane);
        let want = (8.0f32 * 8.0 + 8.0 * 8.0).sqrt();
        assert!((magnitude.get_pixel(3, 3).0[0] - want).abs() < 1e-4);
    }

    #[test]
    fn single_pixel_is_handled() {
        let magnitude = gradient_magnitude(&filled(1, 1, 0.3));
        assert_eq!(magnitude.dimensions(), (1, 1));
        assert_eq!(magnitude.get_pixel(0, 0).0[0], 0.0);
    }
}
