// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Response fusion: collapses the per-direction responses of one level into a
// single array with a weighted max/mean rule.

use tracing::debug;

use crate::plane::{Plane, filled};

/// Weight of the element-wise maximum.
pub const MAX_WEIGHT: f32 = 0.6;
/// Weight of the element-wise mean.
pub const MEAN_WEIGHT: f32 = 0.4;

/// Result of [`fuse_responses`].
#[derive(Debug, Clone)]
pub struct Fusion {
    pub combined: Plane,
    /// Responses that entered the max/mean, the first included.
    pub fused: usize,
    /// Responses dropped because their shape differed from the first.
    pub skipped_mismatched: usize,
}

/// `0.6 * max + 0.4 * mean` over `responses`.
///
/// The first response fixes the shape. Later responses with a different
/// shape do not take part in either the max or the mean, and are reported in
/// [`Fusion::skipped_mismatched`]; the mean divides by the number of
/// responses actually fused. An empty input yields a 1x1 zero plane.
pub fn fuse_responses(responses: &[Plane]) -> Fusion {
    let Some((first, rest)) = responses.split_first() else {
        return Fusion {
            combined: filled(1, 1, 0.0),
            fused: 0,
            skipped_mismatched: 0,
        };
    };

    let mut max = first.clone();
    let mut sum = first.clone();
    let mut fused = 1usize;
    let mut skipped_mismatched = 0usize;

    for response in rest {
        if response.dimensions() != first.dimensions() {
            debug!(
                expected = ?first.dimensions(),
                actual = ?response.dimensions(),
                "skipping response with mismatched shape"
            );
            skipped_mismatched += 1;
            continue;
        }
        for ((m, s), &v) in max.iter_mut().zip(sum.iter_mut()).zip(response.iter()) {
            *m = m.max(v);
            *s += v;
        }
        fused += 1;
    }

    let inv = 1.0 / fused as f32;
    for (s, &m) in sum.iter_mut().zip(max.iter()) {
        *s = MAX_WEIGHT * m + MEAN_WEIGHT * (*s * inv);
    }

    Fusion {
        combined: sum,
        fused,
        skipped_mismatched,
    }
}

/// [`fuse_responses`] without the bookkeeping.
pub fn combine_responses(responses: &[Plane]) -> Plane {
    fuse_responses(responses).combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    fn ramp(width: u32, height: u32, offset: f32) -> Plane {
        ImageBuffer::from_fn(width, height, |x, y| Luma([offset + (x + 3 * y) as f32 * 0.01]))
    }

    #[test]
    fn identical_responses_collapse_to_themselves() {
        let response = ramp(9, 7, 0.2);
        for n in [1usize, 2, 5] {
            let responses = vec![response.clone(); n];
            let combined = combine_responses(&responses);
            for (&got, &want) in combined.iter().zip(response.iter()) {
                assert!((got - want).abs() < 1e-6, "n = {n}: {got} vs {want}");
            }
        }
    }

    #[test]
    fn weights_max_and_mean() {
        let a = filled(2, 2, 0.0);
        let b = filled(2, 2, 1.0);
        let combined = combine_responses(&[a, b]);
        // 0.6 * 1.0 + 0.4 * 0.5
        assert!(combined.iter().all(|&v| (v - 0.8).abs() < 1e-6));
    }

    #[test]
    fn mismatched_shapes_are_skipped_and_counted() {
        let a = filled(4, 4, 0.2);
        let odd = filled(3, 4, 9.0);
        let b = filled(4, 4, 0.4);
        let fusion = fuse_responses(&[a, odd, b]);
        assert_eq!(fusion.fused, 2);
        assert_eq!(fusion.skipped_mismatched, 1);
        assert_eq!(fusion.combined.dimensions(), (4, 4));
        // max 0.4, mean 0.3 over the two fused responses.
        let want = 0.6 * 0.4 + 0.4 * 0.3;
        assert!(fusion.combined.iter().all(|&v| (v - want).abs() < 1e-6));
    }

    #[test]
    fn empty_input_is_a_single_zero() {
        let fusion = fuse_responses(&[]);
        assert_eq!(fusion.combined.dimensions(), (1, 1));
        assert_eq!(fusion.combined.as_raw(), &vec![0.0]);
        assert_eq!(fusion.fused, 0);
    }
}
